use super::{cancel_on_interrupt, conclude};
use crate::cli::ClassifyArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qcflow::engine::progress::ProgressReporter;
use qcflow::workflows;
use tracing::info;

pub async fn run(args: ClassifyArgs, threads: Option<usize>) -> Result<()> {
    let app = build_config(&args.job, Some(&args), threads)?;
    let target = args
        .target
        .clone()
        .unwrap_or_else(|| app.context.default_classify_target());
    let cancel = cancel_on_interrupt();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Classifying output documents in {}", target.display());
    if let Some(ledger) = &app.classifier.ledger_path {
        info!("Recording decisions in {:?}", ledger);
    }

    let report = tokio::task::block_in_place(|| {
        workflows::classify::run(&app.context, &target, &app.classifier, &reporter, &cancel)
    })?;

    conclude("Classification summary", &report)
}
