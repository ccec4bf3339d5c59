use qcflow::engine::config::{BatchConfig, ClassifierConfig};
use qcflow::engine::context::JobGroupContext;

/// Fully merged settings for one command invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub context: JobGroupContext,
    pub batch: BatchConfig,
    pub classifier: ClassifierConfig,
}
