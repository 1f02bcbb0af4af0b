use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular file formats.
///
/// Each implementor fixes the in-memory representation it produces and consumes
/// (`Data`), any auxiliary information carried alongside it (`Metadata`, such as
/// header remarks), and its error type.
pub trait MolecularFile {
    /// The primary payload of the format.
    type Data;

    /// The auxiliary information associated with the file format.
    type Metadata;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads the payload and metadata from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the underlying source fails.
    fn read_from(reader: &mut impl BufRead) -> Result<(Self::Data, Self::Metadata), Self::Error>;

    /// Writes the payload and metadata to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or I/O operations encounter issues.
    fn write_to(
        data: &Self::Data,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads the payload and metadata from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or reading fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(Self::Data, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes the payload and metadata to a file path, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        data: &Self::Data,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(data, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
