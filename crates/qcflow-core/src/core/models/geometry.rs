use nalgebra::Point3;

/// A single atom of a molecule as it appears in a raw geometry file.
///
/// The parsed position is kept alongside the original coordinate text so that a
/// synthesized input document reproduces the coordinates exactly as written in the
/// source file, without reformatting the numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRecord {
    pub element: String,
    pub position: Point3<f64>,
    coordinates: String,
}

impl CoordinateRecord {
    /// Creates a record from numeric coordinates.
    ///
    /// The coordinate text is rendered with the shortest `Display` form of each value,
    /// separated by single spaces (`0.0` renders as `0`, `1.5` as `1.5`).
    pub fn new(element: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            element: element.into(),
            position: Point3::new(x, y, z),
            coordinates: format!("{} {} {}", x, y, z),
        }
    }

    /// Creates a record that keeps the raw coordinate text from a source file.
    pub fn with_raw_coordinates(
        element: impl Into<String>,
        position: Point3<f64>,
        coordinates: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            position,
            coordinates: coordinates.into(),
        }
    }

    pub fn coordinates(&self) -> &str {
        &self.coordinates
    }

    /// Renders the record as one input-document line (without line terminator).
    pub fn to_input_line(&self) -> String {
        format!("{}   {}", self.element, self.coordinates)
    }
}

/// The ordered atoms parsed from exactly one raw geometry file.
///
/// Atom order always matches the order of the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoleculeGeometry {
    records: Vec<CoordinateRecord>,
}

impl MoleculeGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CoordinateRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[CoordinateRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoordinateRecord> {
        self.records.iter()
    }
}

impl FromIterator<CoordinateRecord> for MoleculeGeometry {
    fn from_iter<I: IntoIterator<Item = CoordinateRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Parses a whitespace-separated `x y z` triple.
///
/// Returns `None` unless the text holds exactly three parseable floats.
pub(crate) fn parse_xyz_triple(text: &str) -> Option<Point3<f64>> {
    let mut fields = text.split_whitespace().map(str::parse::<f64>);
    let x = fields.next()?.ok()?;
    let y = fields.next()?.ok()?;
    let z = fields.next()?.ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(Point3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_record_renders_shortest_form() {
        let record = CoordinateRecord::new("C", 0.0, 0.0, 0.0);
        assert_eq!(record.to_input_line(), "C   0 0 0");

        let record = CoordinateRecord::new("H", 1.0, -0.5, 2.25);
        assert_eq!(record.to_input_line(), "H   1 -0.5 2.25");
    }

    #[test]
    fn raw_record_keeps_source_text() {
        let record = CoordinateRecord::with_raw_coordinates(
            "N",
            Point3::new(1.0, 2.0, 3.0),
            "1.0000    2.0000    3.0000",
        );
        assert_eq!(record.to_input_line(), "N   1.0000    2.0000    3.0000");
        assert_eq!(record.position.y, 2.0);
    }

    #[test]
    fn geometry_preserves_insertion_order() {
        let geometry: MoleculeGeometry = ["O", "H", "H"]
            .iter()
            .map(|e| CoordinateRecord::new(*e, 0.0, 0.0, 0.0))
            .collect();
        let elements: Vec<_> = geometry.iter().map(|r| r.element.as_str()).collect();
        assert_eq!(elements, vec!["O", "H", "H"]);
        assert_eq!(geometry.len(), 3);
        assert!(!geometry.is_empty());
    }

    #[test]
    fn parse_xyz_triple_requires_exactly_three_floats() {
        assert_eq!(
            parse_xyz_triple(" 1.5  -2.0 3 "),
            Some(Point3::new(1.5, -2.0, 3.0))
        );
        assert_eq!(parse_xyz_triple("1.0 2.0"), None);
        assert_eq!(parse_xyz_triple("1.0 2.0 3.0 4.0"), None);
        assert_eq!(parse_xyz_triple("1.0 abc 3.0"), None);
    }
}
