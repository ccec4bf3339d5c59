use super::config::ConfigError;
use super::context::ContextError;
use crate::core::io::error::GeometryError;
use crate::core::models::template::TemplateError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid job group context: {0}")]
    InvalidContext(#[from] ContextError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Unsupported file format: '{}'", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Header template not found: '{}'", path.display())]
    MissingTemplate { path: PathBuf },

    #[error("Directory not found: '{}'", path.display())]
    MissingDirectory { path: PathBuf },

    #[error(
        "No frequency record or error-termination marker found in '{}'",
        path.display()
    )]
    UnparsableTermination { path: PathBuf },

    #[error("Invalid header template '{}': {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("Target directory has no final path segment: '{}'", path.display())]
    InvalidTarget { path: PathBuf },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write classification ledger '{}': {source}", path.display())]
    Ledger {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl EngineError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        EngineError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn from_geometry(path: impl AsRef<Path>, error: GeometryError) -> Self {
        match error {
            GeometryError::UnsupportedFormat { path } => EngineError::UnsupportedFormat { path },
            GeometryError::Io(source) => EngineError::io(path, source),
        }
    }

    /// The file a per-file error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            EngineError::UnsupportedFormat { path }
            | EngineError::MissingTemplate { path }
            | EngineError::MissingDirectory { path }
            | EngineError::UnparsableTermination { path }
            | EngineError::Template { path, .. }
            | EngineError::InvalidTarget { path }
            | EngineError::Io { path, .. }
            | EngineError::Ledger { path, .. } => Some(path),
            EngineError::InvalidContext(_)
            | EngineError::InvalidConfig(_)
            | EngineError::WorkerPool(_) => None,
        }
    }
}
