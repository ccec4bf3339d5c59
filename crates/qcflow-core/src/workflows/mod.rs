//! # Workflows Module
//!
//! The three operations of the job lifecycle. Each one takes the immutable
//! `JobGroupContext`, performs its filesystem transitions and returns a `BatchReport`.
//!
//! - **Input synthesis** ([`synthesize`]) - Geometry files to input documents.
//! - **Output classification** ([`classify`]) - Output documents moved into the normal,
//!   negative-frequency or per-kind error directories.
//! - **Retry input generation** ([`retry`]) - Fresh input documents for every job in a
//!   classified directory, so failed or unstable jobs can be resubmitted.
//!
//! Preconditions (template and source directories) are checked before any write.

pub mod classify;
pub mod retry;
pub mod synthesize;

use crate::core::models::template::HeaderTemplate;
use crate::engine::error::EngineError;
use std::path::Path;
use tracing::debug;

pub(crate) fn load_template(path: &Path) -> Result<HeaderTemplate, EngineError> {
    if !path.is_file() {
        return Err(EngineError::MissingTemplate {
            path: path.to_path_buf(),
        });
    }
    let template = HeaderTemplate::from_path(path).map_err(|source| EngineError::Template {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {}-line header template from {:?}", template.len(), path);
    Ok(template)
}
