use super::load_template;
use crate::core::io::gaussian::OUTPUT_EXTENSION;
use crate::core::models::document::InputDocument;
use crate::core::models::geometry::MoleculeGeometry;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::{BatchConfig, BatchPolicy};
use crate::engine::context::JobGroupContext;
use crate::engine::error::EngineError;
use crate::engine::fs::{ensure_dir, has_extension, job_name, list_files};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::report::BatchReport;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Count label for every retry document written.
pub const RETRY_LABEL: &str = "retry";

/// Writes a fresh input document for every output document in `classified_dir`.
///
/// The original geometry is not available at this stage: each document is the header
/// template with the checkpoint directive of the job and the blank terminator line, so
/// the engine restarts from its checkpoint. Documents go to
/// `<inputFolder>/<final segment of classified_dir>`.
///
/// # Errors
///
/// Returns an error if the template or `classified_dir` is missing, `classified_dir`
/// has no final path segment, or the retry folder cannot be created.
#[instrument(skip_all, name = "retry_workflow", fields(source = ?classified_dir))]
pub fn run(
    context: &JobGroupContext,
    classified_dir: &Path,
    batch: &BatchConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<BatchReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Generating retry inputs",
    });

    let files = list_files(classified_dir)?;
    let template = load_template(context.header_path())?;
    let retry_folder =
        context
            .retry_input_folder(classified_dir)
            .ok_or_else(|| EngineError::InvalidTarget {
                path: classified_dir.to_path_buf(),
            })?;
    ensure_dir(&retry_folder)?;

    let mut report = BatchReport::new();
    reporter.report(Progress::TaskStart {
        total_files: files.len() as u64,
    });
    let empty = MoleculeGeometry::new();

    for path in files {
        if cancel.is_cancelled() {
            info!("Cancellation requested; stopping before {:?}.", path);
            report.cancelled = true;
            break;
        }

        let name = job_name(&path).filter(|_| has_extension(&path, OUTPUT_EXTENSION));
        let outcome = match name {
            Some(name) => {
                let document =
                    InputDocument::compose(&template, context.checkpoint_prefix(), &name, &empty);
                let destination = retry_folder.join(document.file_name());
                document
                    .write_to_path(&destination)
                    .map_err(|e| EngineError::io(&destination, e))
            }
            None => Err(EngineError::UnsupportedFormat { path: path.clone() }),
        };

        match outcome {
            Ok(()) => report.record(RETRY_LABEL),
            Err(e) => {
                warn!("Cannot generate retry input for {:?}: {}", path, e);
                match batch.policy {
                    BatchPolicy::Strict => {
                        reporter.report(Progress::Halted {
                            file: path.display().to_string(),
                            reason: e.to_string(),
                        });
                        report.halt(path, e);
                        break;
                    }
                    BatchPolicy::Lenient => {
                        reporter.report(Progress::FileSkipped {
                            file: path.display().to_string(),
                            reason: e.to_string(),
                        });
                        report.skip(path, e);
                    }
                }
            }
        }
        reporter.report(Progress::FileDone);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!(
        "Wrote {} retry input(s) to {:?}.",
        report.count(RETRY_LABEL),
        retry_folder
    );
    Ok(report)
}
