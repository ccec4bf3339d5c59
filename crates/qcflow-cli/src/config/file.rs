use crate::error::{CliError, Result};
use qcflow::engine::config::{BatchPolicy, ZeroFrequencyPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileBatchPolicy {
    Strict,
    Lenient,
}

impl From<FileBatchPolicy> for BatchPolicy {
    fn from(p: FileBatchPolicy) -> Self {
        match p {
            FileBatchPolicy::Strict => BatchPolicy::Strict,
            FileBatchPolicy::Lenient => BatchPolicy::Lenient,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileZeroFrequency {
    Normal,
    Negative,
    Unclassified,
}

impl From<FileZeroFrequency> for ZeroFrequencyPolicy {
    fn from(p: FileZeroFrequency) -> Self {
        match p {
            FileZeroFrequency::Normal => ZeroFrequencyPolicy::Normal,
            FileZeroFrequency::Negative => ZeroFrequencyPolicy::NegativeFrequency,
            FileZeroFrequency::Unclassified => ZeroFrequencyPolicy::Unclassified,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileJobGroupConfig {
    pub method: Option<String>,
    pub molecule: Option<String>,
    pub sequence: Option<String>,
    pub base_path: Option<PathBuf>,
    pub header: Option<PathBuf>,
    pub checkpoint_prefix: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBatchConfig {
    pub policy: Option<FileBatchPolicy>,
    pub workers: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileClassifyConfig {
    pub zero_frequency: Option<FileZeroFrequency>,
    pub error_scan_window: Option<usize>,
    pub ledger: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub job_group: Option<FileJobGroupConfig>,
    pub batch: Option<FileBatchConfig>,
    pub classify: Option<FileClassifyConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading job-group configuration from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(CliError::Io)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
