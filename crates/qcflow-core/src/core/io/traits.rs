use super::error::GeometryError;
use crate::core::models::geometry::{CoordinateRecord, MoleculeGeometry};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading one raw molecular-geometry format.
///
/// Implementors only decide, line by line, whether a line is an atom record and how to
/// extract it. Lines that are not atom records (headers, counts, bond blocks, short or
/// malformed lines) yield `None` and are skipped; they are never errors.
pub trait GeometryFile {
    /// File extension (without the dot) that identifies the format.
    const EXTENSION: &'static str;

    /// Extracts an atom record from a single line, if the line holds one.
    ///
    /// # Arguments
    ///
    /// * `line` - One line of the file, without its terminator.
    fn parse_line(line: &str) -> Option<CoordinateRecord>;

    /// Reads every atom record from a buffered reader, preserving file order.
    ///
    /// A source with no recognized atom lines yields an empty geometry.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading from the source fails.
    fn read_from(reader: &mut impl BufRead) -> Result<MoleculeGeometry, GeometryError> {
        let mut geometry = MoleculeGeometry::new();
        for line in reader.lines() {
            if let Some(record) = Self::parse_line(&line?) {
                geometry.push(record);
            }
        }
        Ok(geometry)
    }

    /// Reads every atom record from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<MoleculeGeometry, GeometryError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
