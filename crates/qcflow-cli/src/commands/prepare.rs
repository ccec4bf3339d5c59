use super::{cancel_on_interrupt, conclude};
use crate::cli::PrepareArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qcflow::engine::progress::ProgressReporter;
use qcflow::workflows;
use tracing::info;

pub async fn run(args: PrepareArgs, threads: Option<usize>) -> Result<()> {
    let app = build_config(&args.job, None, threads)?;
    let cancel = cancel_on_interrupt();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Synthesizing inputs for {} from {}",
        app.context.job_group(),
        app.context.molecule_folder().display()
    );
    info!("Invoking the input synthesis workflow...");

    let report = tokio::task::block_in_place(|| {
        workflows::synthesize::run(&app.context, &app.batch, &reporter, &cancel)
    })?;

    println!(
        "Input documents written to {}",
        app.context.job_input_folder().display()
    );
    conclude("Synthesis summary", &report)
}
