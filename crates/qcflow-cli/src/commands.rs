pub mod classify;
pub mod info;
pub mod prepare;
pub mod retry;

use crate::error::{CliError, Result};
use qcflow::engine::cancel::CancellationToken;
use qcflow::engine::report::BatchReport;
use tracing::warn;

/// Returns a token that is cancelled on the first Ctrl-C.
///
/// The running workflow finishes the file in hand before it observes the token.
pub(crate) fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current file.");
            handle.cancel();
        }
    });
    token
}

/// Prints the per-category summary and turns an incomplete batch into an error.
pub(crate) fn conclude(title: &str, report: &BatchReport) -> Result<()> {
    println!("{}:", title);
    print!("{}", report);

    if let Some(issue) = &report.halted {
        return Err(CliError::BatchHalted {
            path: issue.path.clone(),
            reason: issue.reason.clone(),
        });
    }
    if report.cancelled {
        return Err(CliError::Cancelled);
    }
    if !report.skipped.is_empty() {
        warn!("{} file(s) were skipped.", report.skipped.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn complete_report_concludes_successfully() {
        let mut report = BatchReport::new();
        report.record("normal");
        report.skip(PathBuf::from("notes.txt"), "unsupported");
        assert!(conclude("Classification", &report).is_ok());
    }

    #[test]
    fn halted_report_is_an_error() {
        let mut report = BatchReport::new();
        report.record("input");
        report.halt(PathBuf::from("b.pdb"), "unsupported");

        let err = conclude("Synthesis", &report).unwrap_err();
        assert!(matches!(err, CliError::BatchHalted { path, .. } if path.ends_with("b.pdb")));
    }

    #[test]
    fn cancelled_report_is_an_error() {
        let report = BatchReport {
            cancelled: true,
            ..Default::default()
        };
        assert!(matches!(
            conclude("Retry", &report),
            Err(CliError::Cancelled)
        ));
    }
}
