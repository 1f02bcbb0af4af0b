use crate::core::io::traits::MolecularFile;
use crate::core::models::surface::SurfaceVertex;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

const HEADER_LINES: usize = 3;
const REQUIRED_FIELDS: usize = 6;

#[derive(Debug, Error)]
pub enum VertError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Triangulated surface vertices with outward normals.
///
/// The first three lines are a free-form header. Every following non-blank line
/// holds at least six whitespace-separated numbers: `x y z nx ny nz`. Further
/// columns (sphere and face indices written by some tools) are ignored. Missing
/// or unreadable fields are read as zero and the vertex is kept.
pub struct VertFile;

fn parse_vertex(line: &str, line_num: usize) -> SurfaceVertex {
    let mut fields = [0.0; REQUIRED_FIELDS];
    let mut malformed = false;
    let mut tokens = line.split_whitespace();

    for field in fields.iter_mut() {
        match tokens.next().map(str::parse::<f64>) {
            Some(Ok(value)) if value.is_finite() => *field = value,
            _ => malformed = true,
        }
    }
    if malformed {
        warn!(
            line = line_num,
            "Malformed surface vertex record; missing or non-finite fields read as zero."
        );
    }

    SurfaceVertex::new(
        Point3::new(fields[0], fields[1], fields[2]),
        Vector3::new(fields[3], fields[4], fields[5]),
    )
}

impl MolecularFile for VertFile {
    type Data = Vec<SurfaceVertex>;
    type Metadata = Vec<String>;
    type Error = VertError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Self::Data, Self::Metadata), Self::Error> {
        let mut vertices = Vec::new();
        let mut header = Vec::with_capacity(HEADER_LINES);

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            if line_num < HEADER_LINES {
                header.push(line);
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            vertices.push(parse_vertex(&line, line_num + 1));
        }

        debug!(vertices = vertices.len(), "Parsed surface vertices.");
        Ok((vertices, header))
    }

    fn write_to(
        data: &Self::Data,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for i in 0..HEADER_LINES {
            writeln!(writer, "{}", metadata.get(i).map(String::as_str).unwrap_or("#"))?;
        }
        for v in data {
            writeln!(
                writer,
                "{:9.3} {:9.3} {:9.3} {:7.3} {:7.3} {:7.3}",
                v.position.x, v.position.y, v.position.z, v.normal.x, v.normal.y, v.normal.z
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};
    use tempfile::tempdir;

    const SAMPLE: &str = "\
# header line one
# header line two
   1203    600  1.40  3.00
   1.000    2.000    3.000   0.000   0.000   1.000       0       1  2

  -1.500    0.250    4.000   1.000   0.000   0.000       0       2  2
   7.000    8.000
";

    fn read_sample() -> (Vec<SurfaceVertex>, Vec<String>) {
        let mut reader = BufReader::new(Cursor::new(SAMPLE));
        VertFile::read_from(&mut reader).unwrap()
    }

    #[test]
    fn read_skips_three_header_lines_and_blank_lines() {
        let (vertices, header) = read_sample();
        assert_eq!(vertices.len(), 3);
        assert_eq!(header.len(), 3);
        assert_eq!(header[0], "# header line one");
    }

    #[test]
    fn read_parses_position_and_normal_ignoring_extra_columns() {
        let (vertices, _) = read_sample();
        assert_eq!(vertices[0].position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(vertices[0].normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(vertices[1].position, Point3::new(-1.5, 0.25, 4.0));
    }

    #[test]
    fn read_keeps_short_records_with_zero_fields() {
        let (vertices, _) = read_sample();
        assert_eq!(vertices[2].position, Point3::new(7.0, 8.0, 0.0));
        assert_eq!(vertices[2].normal, Vector3::zeros());
    }

    #[test]
    fn read_zeroes_non_finite_fields() {
        let text = "h\nh\nh\ninf 2.0 NaN 0.0 1e400 1.0\n";
        let mut reader = BufReader::new(Cursor::new(text));
        let (vertices, _) = VertFile::read_from(&mut reader).unwrap();
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].position, Point3::new(0.0, 2.0, 0.0));
        assert_eq!(vertices[0].normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn file_with_only_header_has_no_vertices() {
        let mut reader = BufReader::new(Cursor::new("a\nb\nc\n"));
        let (vertices, _) = VertFile::read_from(&mut reader).unwrap();
        assert!(vertices.is_empty());
    }

    #[test]
    fn written_file_reads_back_the_same_vertices() {
        let (vertices, header) = read_sample();
        let dir = tempdir().unwrap();
        let path = dir.path().join("surface.vert");
        VertFile::write_to_path(&vertices, &header, &path).unwrap();

        let (read_back, read_header) = VertFile::read_from_path(&path).unwrap();
        assert_eq!(read_back, vertices);
        assert_eq!(read_header, header);
    }
}
