use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::bounds::BoundingBox;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

const DEFAULT_RESIDUE_NAME: &str = "UNK";
const DEFAULT_ATOM_NAME: &str = "X";
const REMARK_SEPARATOR: &str = "--------------------------------";

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Header information read from, or written to, a PDB file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Text of the `REMARK` records preceding the first coordinate record, with the
    /// record name and leading whitespace stripped.
    pub remarks: Vec<String>,
    /// Bounding box of all coordinate records, or `None` if there were none.
    pub bounds: Option<BoundingBox>,
}

impl PdbMetadata {
    pub fn with_remarks(remarks: Vec<String>) -> Self {
        Self {
            remarks,
            bounds: None,
        }
    }
}

fn column(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn is_coordinate_record(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM")
}

fn remark_text(line: &str) -> Option<&str> {
    line.strip_prefix("REMARK")
        .map(|rest| rest.trim_start_matches([' ', '\t']))
}

/// Reads the `REMARK` lines that precede the first coordinate record and stops
/// there, without parsing any atoms.
pub fn extract_remarks(reader: &mut impl BufRead) -> Result<Vec<String>, PdbError> {
    let mut remarks = Vec::new();
    for line_res in reader.lines() {
        let line = line_res?;
        if is_coordinate_record(&line) {
            break;
        }
        if let Some(text) = remark_text(&line) {
            remarks.push(text.to_string());
        }
    }
    Ok(remarks)
}

struct AtomRecord {
    atom: Atom,
    residue_seq: Option<i32>,
}

fn finite_column(line: &str, start: usize, end: usize) -> Option<f64> {
    column(line, start, end)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_coordinates(line: &str, line_num: usize) -> Point3<f64> {
    let parsed = (
        finite_column(line, 30, 38),
        finite_column(line, 38, 46),
        finite_column(line, 46, 54),
    );
    match parsed {
        (Some(x), Some(y), Some(z)) => Point3::new(x, y, z),
        _ => {
            warn!(
                line = line_num,
                "Unreadable or non-finite coordinates in columns 31-54; using the origin."
            );
            Point3::origin()
        }
    }
}

fn parse_atom_record(line: &str, line_num: usize) -> AtomRecord {
    let (residue_name, atom_name) = if line.len() > 20 {
        (column(line, 17, 20), column(line, 12, 16))
    } else {
        (DEFAULT_RESIDUE_NAME, DEFAULT_ATOM_NAME)
    };
    let position = parse_coordinates(line, line_num);

    let mut atom = Atom::new(residue_name, atom_name, position);
    if let Ok(b_factor) = column(line, 60, 66).parse::<f64>() {
        atom.temperature_factor = Some(b_factor);
    }

    AtomRecord {
        atom,
        residue_seq: column(line, 22, 26).parse::<i32>().ok(),
    }
}

fn read_records(
    reader: &mut impl BufRead,
) -> Result<(Vec<AtomRecord>, Vec<String>), PdbError> {
    let mut records = Vec::new();
    let mut remarks = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        if is_coordinate_record(&line) {
            records.push(parse_atom_record(&line, line_num));
        } else if records.is_empty() {
            if let Some(text) = remark_text(&line) {
                remarks.push(text.to_string());
            }
        }
    }

    debug!(
        atoms = records.len(),
        remarks = remarks.len(),
        "Parsed PDB records."
    );
    Ok((records, remarks))
}

fn build_metadata<'a>(
    remarks: Vec<String>,
    positions: impl IntoIterator<Item = &'a Point3<f64>>,
) -> PdbMetadata {
    PdbMetadata {
        remarks,
        bounds: BoundingBox::from_points(positions),
    }
}

fn write_remarks(metadata: &PdbMetadata, writer: &mut impl Write) -> io::Result<()> {
    for remark in &metadata.remarks {
        writeln!(writer, "REMARK    {}", remark)?;
    }
    Ok(())
}

fn write_hetatm(
    writer: &mut impl Write,
    serial: usize,
    residue_seq: usize,
    atom: &Atom,
) -> io::Result<()> {
    let element: String = atom.atom_name.chars().take(1).collect();
    writeln!(
        writer,
        "HETATM{:>5}  {:<3} {:>3} A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00{:>6.2}          {}",
        serial % 100_000,
        atom.atom_name,
        atom.residue_name,
        residue_seq,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.temperature_factor.unwrap_or(0.0),
        element
    )
}

/// A structure file: every `ATOM`/`HETATM` record as one [`Atom`].
///
/// Reading never drops a coordinate record. Unreadable coordinates become the
/// origin, missing names fall back to `UNK`/`X`, and a missing temperature factor
/// is left unset. Writing emits one `HETATM` record per atom, numbering residues
/// sequentially.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Data = Vec<Atom>;
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Self::Data, Self::Metadata), Self::Error> {
        let (records, remarks) = read_records(reader)?;
        let atoms: Vec<Atom> = records.into_iter().map(|r| r.atom).collect();
        let metadata = build_metadata(remarks, atoms.iter().map(|a| &a.position));
        Ok((atoms, metadata))
    }

    fn write_to(
        data: &Self::Data,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        write_remarks(metadata, writer)?;
        for (i, atom) in data.iter().enumerate() {
            write_hetatm(writer, i + 1, (i % 9999) + 1, atom)?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

/// Clustered solvent sites: each cluster is written as one residue.
///
/// Residue sequence numbers are the cluster index plus one, wrapping after 9999;
/// atom serials run globally and wrap at 100000. When reading, consecutive records
/// sharing a residue sequence number form one cluster.
pub struct ClusteredPdbFile;

impl MolecularFile for ClusteredPdbFile {
    type Data = Vec<Vec<Atom>>;
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Self::Data, Self::Metadata), Self::Error> {
        let (records, remarks) = read_records(reader)?;

        let mut clusters: Vec<Vec<Atom>> = Vec::new();
        let mut current_seq: Option<Option<i32>> = None;
        for record in records {
            if current_seq != Some(record.residue_seq) {
                current_seq = Some(record.residue_seq);
                clusters.push(Vec::new());
            }
            if let Some(cluster) = clusters.last_mut() {
                cluster.push(record.atom);
            }
        }

        let remarks = remarks
            .into_iter()
            .filter(|r| r != REMARK_SEPARATOR)
            .collect();
        let metadata = build_metadata(remarks, clusters.iter().flatten().map(|a| &a.position));
        Ok((clusters, metadata))
    }

    fn write_to(
        data: &Self::Data,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        write_remarks(metadata, writer)?;
        writeln!(writer, "REMARK    {}", REMARK_SEPARATOR)?;

        let mut serial = 1;
        for (cluster_idx, cluster) in data.iter().enumerate() {
            let residue_seq = (cluster_idx % 9999) + 1;
            for atom in cluster {
                write_hetatm(writer, serial, residue_seq, atom)?;
                serial += 1;
            }
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

/// Bare lattice points written as water oxygens (`OW`/`HOH`).
///
/// Non-finite points are skipped. Serial and residue numbers wrap to stay within
/// their fixed-width columns.
pub struct WaterPdbFile;

fn wrap_index(value: usize, modulus: usize) -> usize {
    let wrapped = if value >= modulus {
        value % modulus
    } else {
        value
    };
    if wrapped == 0 { 1 } else { wrapped }
}

impl MolecularFile for WaterPdbFile {
    type Data = Vec<Point3<f64>>;
    type Metadata = ();
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Self::Data, Self::Metadata), Self::Error> {
        let (records, _) = read_records(reader)?;
        Ok((records.into_iter().map(|r| r.atom.position).collect(), ()))
    }

    fn write_to(
        data: &Self::Data,
        _metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "REMARK    GENERATED BY DOWSE")?;
        writeln!(
            writer,
            "REMARK    THIS FILE CONTAINS {} WATER MOLECULES",
            data.len()
        )?;

        let mut counter = 1;
        for point in data {
            if !point.iter().all(|c| c.is_finite()) {
                continue;
            }
            writeln!(
                writer,
                "ATOM  {:>5}  OW  HOH A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           O  ",
                wrap_index(counter, 100_000),
                wrap_index(counter, 10_000),
                point.x,
                point.y,
                point.z
            )?;
            counter += 1;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
