use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Zero-based index of the template line that is replaced by the per-job checkpoint
/// directive.
pub const CHECKPOINT_SLOT: usize = 2;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(
        "Header template has {lines} line(s); at least {} are required for the checkpoint slot",
        CHECKPOINT_SLOT + 1
    )]
    TooShort { lines: usize },
}

/// The shared header of every input document in a job group.
///
/// The template is read once and never mutated; per-job documents are built from a copy
/// with the checkpoint slot overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    lines: Vec<String>,
}

impl HeaderTemplate {
    pub fn from_lines<I, S>(lines: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.len() <= CHECKPOINT_SLOT {
            return Err(TemplateError::TooShort { lines: lines.len() });
        }
        Ok(Self { lines })
    }

    /// Parses template text. Line terminators (`\n` or `\r\n`) are not part of the lines.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        Self::from_lines(text.lines())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
