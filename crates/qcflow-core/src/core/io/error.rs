use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unsupported geometry format: '{}' (expected a .mol or .xyz file)", path.display())]
    UnsupportedFormat { path: PathBuf },
}
