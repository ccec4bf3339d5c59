use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A file that a batch did not process, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIssue {
    pub path: PathBuf,
    pub reason: String,
}

/// The structured outcome of one batch run.
///
/// `counts` maps a category label (e.g. `normal`, `neg_freq`, `error_l502`, `input`) to
/// the number of files handled in that category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub counts: BTreeMap<String, usize>,
    pub halted: Option<FileIssue>,
    pub skipped: Vec<FileIssue>,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: impl Into<String>) {
        *self.counts.entry(label.into()).or_default() += 1;
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Number of files handled successfully, over all categories.
    pub fn processed(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn halt(&mut self, path: PathBuf, reason: impl fmt::Display) {
        self.halted = Some(FileIssue {
            path,
            reason: reason.to_string(),
        });
    }

    pub fn skip(&mut self, path: PathBuf, reason: impl fmt::Display) {
        self.skipped.push(FileIssue {
            path,
            reason: reason.to_string(),
        });
    }

    /// True when every file of the batch was visited.
    pub fn is_complete(&self) -> bool {
        self.halted.is_none() && !self.cancelled
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, count) in &self.counts {
            writeln!(f, "  {:<24} {:>6}", label, count)?;
        }
        writeln!(f, "  {:<24} {:>6}", "total", self.processed())?;
        for issue in &self.skipped {
            writeln!(f, "  skipped {}: {}", issue.path.display(), issue.reason)?;
        }
        if let Some(issue) = &self.halted {
            writeln!(f, "  halted at {}: {}", issue.path.display(), issue.reason)?;
        }
        if self.cancelled {
            writeln!(f, "  cancelled before the batch finished")?;
        }
        Ok(())
    }
}
