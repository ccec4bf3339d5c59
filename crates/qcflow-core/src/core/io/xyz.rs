use super::traits::GeometryFile;
use crate::core::models::geometry::CoordinateRecord;
use nalgebra::Point3;
use tracing::trace;

/// Whitespace-delimited XYZ geometry format.
///
/// A line is an atom record when its first character is alphabetic: the first token is
/// the element symbol and the next three tokens are the Cartesian coordinates. Count
/// lines never start with a letter. Comment lines that do, but carry no coordinate
/// triple, are skipped.
pub struct XyzFile;

impl GeometryFile for XyzFile {
    const EXTENSION: &'static str = "xyz";

    fn parse_line(line: &str) -> Option<CoordinateRecord> {
        if !line.chars().next().is_some_and(char::is_alphabetic) {
            return None;
        }
        let element = line.split_whitespace().next()?;
        let coordinates = line[element.len()..].trim();

        let mut fields = coordinates.split_whitespace().map(str::parse::<f64>);
        let position = match (fields.next(), fields.next(), fields.next()) {
            (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => Point3::new(x, y, z),
            _ => {
                trace!("Alphabetic line without coordinates skipped: {:?}", line);
                return None;
            }
        };

        Some(CoordinateRecord::with_raw_coordinates(
            element,
            position,
            coordinates,
        ))
    }
}
