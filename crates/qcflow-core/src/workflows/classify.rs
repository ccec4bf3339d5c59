use crate::core::io::gaussian::{OUTPUT_EXTENSION, Termination, scan_termination_path};
use crate::core::models::classification::Classification;
use crate::engine::cancel::CancellationToken;
use crate::engine::config::{BatchPolicy, ClassifierConfig};
use crate::engine::context::JobGroupContext;
use crate::engine::error::EngineError;
use crate::engine::fs::{ensure_dir, has_extension, job_name, list_files, move_into};
use crate::engine::ledger::ClassificationLedger;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::report::BatchReport;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Classifies every output document in `target` and moves it into its destination.
///
/// Documents are read and classified on the worker pool; moves are then applied
/// sequentially in file-name order, each file being moved exactly once into the
/// directory derived from its [`Classification`]. Destination directories are created
/// on first use.
///
/// A file without the output extension, or without a usable termination signal, halts
/// the batch under [`BatchPolicy::Strict`] (files after it stay in `target`) and is
/// skipped under [`BatchPolicy::Lenient`]. A ledger write failure halts the batch under
/// either policy; the file in hand has already been moved and is counted.
///
/// # Errors
///
/// Returns an error if `target` does not exist, the worker pool cannot be built, or the
/// ledger cannot be opened. Per-file problems are reported in the returned
/// [`BatchReport`].
#[instrument(skip_all, name = "classification_workflow", fields(target = ?target))]
pub fn run(
    context: &JobGroupContext,
    target: &Path,
    config: &ClassifierConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<BatchReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Classifying outputs",
    });

    let files = list_files(target)?;
    info!("Found {} file(s) in {:?}.", files.len(), target);

    let mut ledger = config
        .ledger_path
        .as_deref()
        .map(ClassificationLedger::open)
        .transpose()?;

    let pool = config.batch.thread_pool()?;
    let decisions: Vec<(PathBuf, Result<Classification, EngineError>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| (path.clone(), classify_file(path, config)))
            .collect()
    });

    let mut report = BatchReport::new();
    reporter.report(Progress::TaskStart {
        total_files: decisions.len() as u64,
    });

    for (path, decision) in decisions {
        if cancel.is_cancelled() {
            info!("Cancellation requested; stopping before {:?}.", path);
            report.cancelled = true;
            break;
        }

        let outcome = decision.and_then(|classification| {
            let destination = relocate(context, &path, &classification)?;
            Ok((classification, destination))
        });

        match outcome {
            Ok((classification, destination)) => {
                report.record(classification.label());
                let logged = ledger.as_mut().map_or(Ok(()), |ledger| {
                    let job = job_name(&path).unwrap_or_default();
                    ledger.record(&job, &classification, &path, &destination)
                });
                if let Err(e) = logged {
                    warn!("Ledger write failed after moving {:?}: {}", path, e);
                    reporter.report(Progress::Halted {
                        file: path.display().to_string(),
                        reason: e.to_string(),
                    });
                    report.halt(path, e);
                    reporter.report(Progress::FileDone);
                    break;
                }
            }
            Err(e) => {
                warn!("Cannot classify {:?}: {}", path, e);
                match config.batch.policy {
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
    info!("Classified {} output document(s).", report.processed());
    Ok(report)
}

/// Reads one output document and decides its classification without touching it.
pub fn classify_file(path: &Path, config: &ClassifierConfig) -> Result<Classification, EngineError> {
    if !has_extension(path, OUTPUT_EXTENSION) {
        return Err(EngineError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    let termination = scan_termination_path(path, config.error_scan_window)
        .map_err(|e| EngineError::io(path, e))?;
    let unparsable = || EngineError::UnparsableTermination {
        path: path.to_path_buf(),
    };

    match termination {
        Termination::Frequency(value) => {
            debug!("{:?}: first frequency {}", path, value);
            config.zero_frequency.classify(value).ok_or_else(unparsable)
        }
        Termination::ErrorTermination { kind } => Ok(Classification::Error(kind)),
        Termination::Unrecognized => Err(unparsable()),
    }
}

fn relocate(
    context: &JobGroupContext,
    path: &Path,
    classification: &Classification,
) -> Result<PathBuf, EngineError> {
    let destination_dir = context.destination(classification);
    ensure_dir(&destination_dir)?;
    let destination = move_into(path, &destination_dir)?;
    info!("{:?}: {} -> {:?}", path, classification, destination_dir);
    Ok(destination)
}
