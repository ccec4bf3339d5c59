use super::error::GeometryError;
use super::mol::MolFile;
use super::traits::GeometryFile;
use super::xyz::XyzFile;
use crate::core::models::geometry::MoleculeGeometry;
use std::path::Path;

/// The recognized raw geometry formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    Mol,
    Xyz,
}

impl GeometryFormat {
    /// Detects the format from the file extension (case-sensitive, as written by the
    /// upstream tools).
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnsupportedFormat`] for any other extension.
    pub fn detect(path: &Path) -> Result<Self, GeometryError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(MolFile::EXTENSION) => Ok(GeometryFormat::Mol),
            Some(XyzFile::EXTENSION) => Ok(GeometryFormat::Xyz),
            _ => Err(GeometryError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn read_from_path(self, path: &Path) -> Result<MoleculeGeometry, GeometryError> {
        match self {
            GeometryFormat::Mol => MolFile::read_from_path(path),
            GeometryFormat::Xyz => XyzFile::read_from_path(path),
        }
    }
}

/// Detects the format of `path` and parses it.
pub fn read_geometry(path: &Path) -> Result<MoleculeGeometry, GeometryError> {
    GeometryFormat::detect(path)?.read_from_path(path)
}
