use super::traits::GeometryFile;
use crate::core::models::geometry::{CoordinateRecord, parse_xyz_triple};
use std::ops::Range;
use tracing::trace;

/// Column holding the flag that marks an atom line.
const FLAG_COLUMN: usize = 35;
const FLAG_SENTINEL: u8 = b'0';
const ELEMENT_COLUMNS: Range<usize> = 31..33;
const COORDINATE_COLUMNS: Range<usize> = 1..30;

/// Fixed-column tabular geometry format (MDL molfile atom block).
///
/// A line is an atom record only when the character at the flag column is `'0'`.
/// The element symbol and the coordinate text are cut from fixed column ranges.
pub struct MolFile;

impl GeometryFile for MolFile {
    const EXTENSION: &'static str = "mol";

    fn parse_line(line: &str) -> Option<CoordinateRecord> {
        if line.as_bytes().get(FLAG_COLUMN) != Some(&FLAG_SENTINEL) {
            return None;
        }
        let element = line.get(ELEMENT_COLUMNS)?.trim();
        let coordinates = line.get(COORDINATE_COLUMNS)?.trim();
        if element.is_empty() {
            return None;
        }
        let Some(position) = parse_xyz_triple(coordinates) else {
            trace!("Flagged line without numeric coordinates skipped: {:?}", line);
            return None;
        };
        Some(CoordinateRecord::with_raw_coordinates(
            element,
            position,
            coordinates,
        ))
    }
}
