use crate::core::models::classification::{
    Classification, ERROR_DIR_PREFIX, NEGATIVE_FREQUENCY_DIR,
};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root of the default checkpoint directive, below which checkpoints are grouped by
/// method and molecule.
pub const DEFAULT_CHECKPOINT_ROOT: &str = "chk";

/// Name of the default directory scanned by the classifier, below the output folder.
pub const DEFAULT_CLASSIFY_TARGET: &str = "result";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ContextError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{0}' must not be empty")]
    Empty(&'static str),
}

/// Which part of the derived layout [`JobGroupContext::summary`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoScope {
    All,
    Input,
    Classify,
    Retry,
}

/// The immutable configuration of one job group.
///
/// Binds a computation method, a molecule identifier and a sequence identifier to a base
/// path, and derives every path convention the workflows use. Building a context has no
/// side effects; directories are created lazily by the workflows that write into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobGroupContext {
    method: String,
    molecule: String,
    sequence: String,
    base_path: PathBuf,
    header_path: PathBuf,
    checkpoint_prefix: String,
}

impl JobGroupContext {
    /// Creates a context with the default header path and checkpoint prefix.
    pub fn new(
        method: impl Into<String>,
        molecule: impl Into<String>,
        sequence: impl Into<String>,
        base_path: impl Into<PathBuf>,
    ) -> Result<Self, ContextError> {
        JobGroupContextBuilder::new()
            .method(method)
            .molecule(molecule)
            .sequence(sequence)
            .base_path(base_path)
            .build()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn molecule(&self) -> &str {
        &self.molecule
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the header template shared by every input of the group.
    pub fn header_path(&self) -> &Path {
        &self.header_path
    }

    /// Prefix of the checkpoint directive; the job name and `.chk` are appended per job.
    pub fn checkpoint_prefix(&self) -> &str {
        &self.checkpoint_prefix
    }

    /// `<molecule>_<sequence>`
    pub fn job_group(&self) -> String {
        format!("{}_{}", self.molecule, self.sequence)
    }

    /// Raw geometry files: `<base>/<molecule>/<sequence>`.
    pub fn molecule_folder(&self) -> PathBuf {
        self.base_path.join(&self.molecule).join(&self.sequence)
    }

    /// `<base>/input_<method>`
    pub fn input_folder(&self) -> PathBuf {
        self.base_path.join(format!("input_{}", self.method))
    }

    /// `<base>/output_<method>`
    pub fn output_folder(&self) -> PathBuf {
        self.base_path.join(format!("output_{}", self.method))
    }

    /// Synthesized inputs of this group: `<inputFolder>/<molecule>_<sequence>`.
    pub fn job_input_folder(&self) -> PathBuf {
        self.input_folder().join(self.job_group())
    }

    /// Accepted results: `<outputFolder>/<molecule>_<sequence>`.
    pub fn normal_result_folder(&self) -> PathBuf {
        self.output_folder().join(self.job_group())
    }

    pub fn negative_frequency_folder(&self) -> PathBuf {
        self.output_folder().join(NEGATIVE_FREQUENCY_DIR)
    }

    pub fn error_folder(&self, kind: &str) -> PathBuf {
        self.output_folder()
            .join(format!("{}{}", ERROR_DIR_PREFIX, kind))
    }

    /// The directory a classified output document is moved into.
    pub fn destination(&self, classification: &Classification) -> PathBuf {
        match classification {
            Classification::Normal => self.normal_result_folder(),
            Classification::NegativeFrequency => self.negative_frequency_folder(),
            Classification::Error(kind) => self.error_folder(kind),
        }
    }

    /// Directory scanned by the classifier when no target is given.
    pub fn default_classify_target(&self) -> PathBuf {
        self.output_folder().join(DEFAULT_CLASSIFY_TARGET)
    }

    /// Retry inputs for a classified directory: `<inputFolder>/<final segment>`.
    ///
    /// Returns `None` when the directory path has no final segment (e.g. `..`).
    pub fn retry_input_folder(&self, classified_dir: &Path) -> Option<PathBuf> {
        classified_dir
            .file_name()
            .map(|name| self.input_folder().join(name))
    }

    /// A human-readable description of the paths used by `scope`.
    ///
    /// `target` is the directory the classifier or retry generator would read; the
    /// default classification target is shown when it is `None`.
    pub fn summary(&self, scope: InfoScope, target: Option<&Path>) -> String {
        let target = target
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_classify_target());
        let mut out = String::new();

        if scope == InfoScope::All {
            let _ = writeln!(out, "Method:          {}", self.method);
            let _ = writeln!(out, "Job group:       {}", self.job_group());
        }
        if matches!(scope, InfoScope::All | InfoScope::Input) {
            let _ = writeln!(out, "Header template: {}", self.header_path.display());
            let _ = writeln!(out, "Checkpoint line: {}", self.checkpoint_prefix);
            let _ = writeln!(out, "Molecules:       {}", self.molecule_folder().display());
            let _ = writeln!(out, "Input folder:    {}", self.job_input_folder().display());
        }
        if matches!(scope, InfoScope::All | InfoScope::Classify) {
            let _ = writeln!(out, "Target folder:   {}", target.display());
            let _ = writeln!(out, "Normal output:   {}", self.normal_result_folder().display());
            let _ = writeln!(
                out,
                "Neg-freq output: {}",
                self.negative_frequency_folder().display()
            );
            let _ = writeln!(out, "Error output:    {}", self.error_folder("<kind>").display());
        }
        if matches!(scope, InfoScope::All | InfoScope::Retry) {
            let _ = writeln!(out, "Retry source:    {}", target.display());
            match self.retry_input_folder(&target) {
                Some(folder) => {
                    let _ = writeln!(out, "Retry inputs:    {}", folder.display());
                }
                None => {
                    let _ = writeln!(out, "Retry inputs:    <invalid target>");
                }
            }
        }
        out
    }
}

#[derive(Default)]
pub struct JobGroupContextBuilder {
    method: Option<String>,
    molecule: Option<String>,
    sequence: Option<String>,
    base_path: Option<PathBuf>,
    header_path: Option<PathBuf>,
    checkpoint_prefix: Option<String>,
}

impl JobGroupContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
    pub fn molecule(mut self, molecule: impl Into<String>) -> Self {
        self.molecule = Some(molecule.into());
        self
    }
    pub fn sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = Some(sequence.into());
        self
    }
    pub fn base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }
    pub fn header_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.header_path = Some(path.into());
        self
    }
    pub fn checkpoint_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.checkpoint_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> Result<JobGroupContext, ContextError> {
        let method = non_empty(self.method, "method")?;
        let molecule = non_empty(self.molecule, "molecule")?;
        let sequence = non_empty(self.sequence, "sequence")?;
        let base_path = self
            .base_path
            .ok_or(ContextError::MissingParameter("base_path"))?;
        if base_path.as_os_str().is_empty() {
            return Err(ContextError::Empty("base_path"));
        }

        let header_path = self
            .header_path
            .unwrap_or_else(|| PathBuf::from(format!("header_{}", method)));
        let checkpoint_prefix = self.checkpoint_prefix.unwrap_or_else(|| {
            format!(
                "%Chk={}/{}/{}/",
                DEFAULT_CHECKPOINT_ROOT, method, molecule
            )
        });

        Ok(JobGroupContext {
            method,
            molecule,
            sequence,
            base_path,
            header_path,
            checkpoint_prefix,
        })
    }
}

fn non_empty(value: Option<String>, name: &'static str) -> Result<String, ContextError> {
    let value = value.ok_or(ContextError::MissingParameter(name))?;
    if value.trim().is_empty() {
        return Err(ContextError::Empty(name));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> JobGroupContext {
        JobGroupContext::new("PM7", "dyes", "dimer", "/data").unwrap()
    }

    #[test]
    fn derives_folder_layout() {
        let ctx = context();
        assert_eq!(ctx.job_group(), "dyes_dimer");
        assert_eq!(ctx.molecule_folder(), PathBuf::from("/data/dyes/dimer"));
        assert_eq!(ctx.input_folder(), PathBuf::from("/data/input_PM7"));
        assert_eq!(ctx.output_folder(), PathBuf::from("/data/output_PM7"));
        assert_eq!(
            ctx.job_input_folder(),
            PathBuf::from("/data/input_PM7/dyes_dimer")
        );
        assert_eq!(
            ctx.normal_result_folder(),
            PathBuf::from("/data/output_PM7/dyes_dimer")
        );
        assert_eq!(
            ctx.default_classify_target(),
            PathBuf::from("/data/output_PM7/result")
        );
    }

    #[test]
    fn defaults_for_header_and_checkpoint() {
        let ctx = context();
        assert_eq!(ctx.header_path(), Path::new("header_PM7"));
        assert_eq!(ctx.checkpoint_prefix(), "%Chk=chk/PM7/dyes/");
    }

    #[test]
    fn builder_overrides_header_and_checkpoint() {
        let ctx = JobGroupContextBuilder::new()
            .method("B3LYP")
            .molecule("cages")
            .sequence("s1")
            .base_path("runs")
            .header_path("templates/header_dft")
            .checkpoint_prefix("%Chk=/scratch/")
            .build()
            .unwrap();
        assert_eq!(ctx.header_path(), Path::new("templates/header_dft"));
        assert_eq!(ctx.checkpoint_prefix(), "%Chk=/scratch/");
    }

    #[test]
    fn destinations_per_classification() {
        let ctx = context();
        assert_eq!(
            ctx.destination(&Classification::Normal),
            ctx.normal_result_folder()
        );
        assert_eq!(
            ctx.destination(&Classification::NegativeFrequency),
            PathBuf::from("/data/output_PM7/neg_freq")
        );
        assert_eq!(
            ctx.destination(&Classification::Error("l502".into())),
            PathBuf::from("/data/output_PM7/error_l502")
        );
    }

    #[test]
    fn retry_folder_uses_final_segment_and_tolerates_trailing_slash() {
        let ctx = context();
        assert_eq!(
            ctx.retry_input_folder(Path::new("/data/output_PM7/error_l502/")),
            Some(PathBuf::from("/data/input_PM7/error_l502"))
        );
        assert_eq!(ctx.retry_input_folder(Path::new("..")), None);
    }

    #[test]
    fn empty_or_missing_identifiers_are_rejected() {
        assert_eq!(
            JobGroupContext::new("", "dyes", "dimer", "/data").unwrap_err(),
            ContextError::Empty("method")
        );
        assert_eq!(
            JobGroupContext::new("PM7", "  ", "dimer", "/data").unwrap_err(),
            ContextError::Empty("molecule")
        );
        assert_eq!(
            JobGroupContext::new("PM7", "dyes", "dimer", "").unwrap_err(),
            ContextError::Empty("base_path")
        );
        assert_eq!(
            JobGroupContextBuilder::new()
                .method("PM7")
                .molecule("dyes")
                .base_path("/data")
                .build()
                .unwrap_err(),
            ContextError::MissingParameter("sequence")
        );
    }

    #[test]
    fn construction_and_summary_have_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = JobGroupContext::new("PM7", "dyes", "dimer", dir.path()).unwrap();

        let summary = ctx.summary(InfoScope::All, None);

        assert!(summary.contains("dyes_dimer"));
        assert!(summary.contains("%Chk=chk/PM7/dyes/"));
        assert!(summary.contains("error_<kind>"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn summary_scopes_limit_output() {
        let ctx = context();
        let input = ctx.summary(InfoScope::Input, None);
        assert!(input.contains("Header template"));
        assert!(!input.contains("Neg-freq output"));

        let retry = ctx.summary(InfoScope::Retry, Some(Path::new("/data/output_PM7/neg_freq")));
        assert!(retry.contains("/data/input_PM7/neg_freq"));
        assert!(!retry.contains("Header template"));
    }
}
