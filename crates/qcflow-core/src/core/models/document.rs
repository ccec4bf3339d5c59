use super::geometry::MoleculeGeometry;
use super::template::{CHECKPOINT_SLOT, HeaderTemplate};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// File extension of generated input documents.
pub const INPUT_EXTENSION: &str = "gjf";

/// The checkpoint directive for a job: `<prefix><name>.chk`.
pub fn checkpoint_directive(checkpoint_prefix: &str, job_name: &str) -> String {
    format!("{}{}.chk", checkpoint_prefix, job_name)
}

/// A complete computation-input document for one job.
///
/// Layout: the header template with the checkpoint slot replaced, one line per atom,
/// then a single blank terminator line. A document is never modified once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    job_name: String,
    lines: Vec<String>,
}

impl InputDocument {
    pub fn compose(
        template: &HeaderTemplate,
        checkpoint_prefix: &str,
        job_name: &str,
        geometry: &MoleculeGeometry,
    ) -> Self {
        let mut lines = Vec::with_capacity(template.len() + geometry.len() + 1);
        lines.extend(template.lines().iter().cloned());
        lines[CHECKPOINT_SLOT] = checkpoint_directive(checkpoint_prefix, job_name);
        lines.extend(geometry.iter().map(|record| record.to_input_line()));
        lines.push(String::new());

        Self {
            job_name: job_name.to_string(),
            lines,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// File name of the document: `<job-name>.gjf`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.job_name, INPUT_EXTENSION)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        for line in &self.lines {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}
