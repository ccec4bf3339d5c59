use super::error::EngineError;
use crate::core::models::classification::Classification;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct LedgerRecord<'a> {
    job: &'a str,
    category: String,
    source: String,
    destination: String,
}

/// Append-only CSV log of classification decisions.
///
/// The header row is written only when the file is new or empty, so repeated runs keep
/// appending to the same table.
pub struct ClassificationLedger {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl ClassificationLedger {
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| EngineError::io(path, e))?;
        let is_empty = file
            .metadata()
            .map_err(|e| EngineError::io(path, e))?
            .len()
            == 0;
        let writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn record(
        &mut self,
        job: &str,
        classification: &Classification,
        source: &Path,
        destination: &Path,
    ) -> Result<(), EngineError> {
        let record = LedgerRecord {
            job,
            category: classification.label(),
            source: source.display().to_string(),
            destination: destination.display().to_string(),
        };
        self.writer
            .serialize(record)
            .map_err(|e| self.error(e))?;
        self.writer.flush().map_err(|e| self.error(e.into()))
    }

    fn error(&self, source: csv::Error) -> EngineError {
        EngineError::Ledger {
            path: self.path.clone(),
            source,
        }
    }
}
