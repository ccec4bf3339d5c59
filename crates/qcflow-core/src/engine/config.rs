use crate::core::io::gaussian::DEFAULT_ERROR_SCAN_WINDOW;
use crate::core::models::classification::Classification;
use std::path::PathBuf;
use thiserror::Error;

/// Largest accepted error-scan window, in lines.
pub const MAX_ERROR_SCAN_WINDOW: usize = 10_000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How a batch reacts to a file it cannot process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop at the first bad file; later files are left untouched.
    #[default]
    Strict,
    /// Record the bad file as skipped and continue with the next one.
    Lenient,
}

/// What to do with an output whose first frequency is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroFrequencyPolicy {
    Normal,
    /// Route to the negative-frequency folder so the job is resubmitted.
    #[default]
    NegativeFrequency,
    /// Leave the file where it is and report it like an unparsable termination.
    Unclassified,
}

impl ZeroFrequencyPolicy {
    /// Classifies a frequency value. `None` means the value stays unclassified.
    pub fn classify(self, frequency: f64) -> Option<Classification> {
        if frequency > 0.0 {
            Some(Classification::Normal)
        } else if frequency < 0.0 {
            Some(Classification::NegativeFrequency)
        } else {
            match self {
                ZeroFrequencyPolicy::Normal => Some(Classification::Normal),
                ZeroFrequencyPolicy::NegativeFrequency => Some(Classification::NegativeFrequency),
                ZeroFrequencyPolicy::Unclassified => None,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchConfig {
    pub policy: BatchPolicy,
    /// Size of the worker pool for the read phase; `None` uses rayon's default.
    pub workers: Option<usize>,
}

impl BatchConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            policy: BatchPolicy::Lenient,
            workers: None,
        }
    }

    pub(crate) fn thread_pool(&self) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(workers) = self.workers {
            builder = builder.num_threads(workers);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub batch: BatchConfig,
    pub zero_frequency: ZeroFrequencyPolicy,
    /// Number of trailing lines searched for an error-termination marker.
    pub error_scan_window: usize,
    /// Append-only CSV record of every move, if set.
    pub ledger_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            zero_frequency: ZeroFrequencyPolicy::default(),
            error_scan_window: DEFAULT_ERROR_SCAN_WINDOW,
            ledger_path: None,
        }
    }
}

#[derive(Default)]
pub struct ClassifierConfigBuilder {
    policy: Option<BatchPolicy>,
    workers: Option<usize>,
    zero_frequency: Option<ZeroFrequencyPolicy>,
    error_scan_window: Option<usize>,
    ledger_path: Option<PathBuf>,
}

impl ClassifierConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }
    pub fn zero_frequency(mut self, policy: ZeroFrequencyPolicy) -> Self {
        self.zero_frequency = Some(policy);
        self
    }
    pub fn error_scan_window(mut self, lines: usize) -> Self {
        self.error_scan_window = Some(lines);
        self
    }
    pub fn ledger_path(mut self, path: Option<PathBuf>) -> Self {
        self.ledger_path = path;
        self
    }

    pub fn build(self) -> Result<ClassifierConfig, ConfigError> {
        let batch = build_batch(self.policy, self.workers)?;
        let error_scan_window = self.error_scan_window.unwrap_or(DEFAULT_ERROR_SCAN_WINDOW);
        if !(1..=MAX_ERROR_SCAN_WINDOW).contains(&error_scan_window) {
            return Err(ConfigError::InvalidParameter {
                name: "error_scan_window",
                reason: format!("must be between 1 and {}", MAX_ERROR_SCAN_WINDOW),
            });
        }
        Ok(ClassifierConfig {
            batch,
            zero_frequency: self.zero_frequency.unwrap_or_default(),
            error_scan_window,
            ledger_path: self.ledger_path,
        })
    }
}

/// Validates a batch policy and worker count.
pub fn build_batch(
    policy: Option<BatchPolicy>,
    workers: Option<usize>,
) -> Result<BatchConfig, ConfigError> {
    if workers == Some(0) {
        return Err(ConfigError::InvalidParameter {
            name: "workers",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(BatchConfig {
        policy: policy.unwrap_or_default(),
        workers,
    })
}
