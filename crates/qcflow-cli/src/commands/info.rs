use crate::cli::{InfoArgs, InfoScopeArg};
use crate::config::build_config;
use crate::error::Result;
use qcflow::engine::context::InfoScope;
use tracing::info;

pub fn run(args: InfoArgs) -> Result<()> {
    let app = build_config(&args.job, None, None)?;
    let scope = match args.scope {
        InfoScopeArg::All => InfoScope::All,
        InfoScopeArg::Input => InfoScope::Input,
        InfoScopeArg::Classify => InfoScope::Classify,
        InfoScopeArg::Retry => InfoScope::Retry,
    };
    info!("Describing job group {} ({:?}).", app.context.job_group(), scope);
    print!("{}", app.context.summary(scope, args.target.as_deref()));
    Ok(())
}
