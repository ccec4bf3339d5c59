use super::{cancel_on_interrupt, conclude};
use crate::cli::RetryArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qcflow::engine::progress::ProgressReporter;
use qcflow::workflows;
use tracing::info;

pub async fn run(args: RetryArgs, threads: Option<usize>) -> Result<()> {
    let app = build_config(&args.job, None, threads)?;
    let cancel = cancel_on_interrupt();

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Generating retry inputs for {}", args.target.display());
    if let Some(folder) = app.context.retry_input_folder(&args.target) {
        info!("Retry inputs will be written to {:?}", folder);
    }

    let report = tokio::task::block_in_place(|| {
        workflows::retry::run(&app.context, &args.target, &app.batch, &reporter, &cancel)
    })?;

    conclude("Retry summary", &report)
}
