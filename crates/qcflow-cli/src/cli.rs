use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Yu Che",
    version,
    about = "qcflow CLI - Prepare, classify and resubmit batches of quantum-chemistry jobs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of worker threads used to read geometry and output files.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the paths derived for a job group without touching the filesystem.
    Info(InfoArgs),
    /// Generate input documents from the geometry files of a job group.
    Prepare(PrepareArgs),
    /// Classify output documents and move them into result, neg_freq or error folders.
    Classify(ClassifyArgs),
    /// Generate fresh input documents for every job in a classified folder.
    Retry(RetryArgs),
}

/// Arguments shared by every subcommand that identify a job group.
#[derive(Args, Debug, Clone, Default)]
pub struct JobGroupArgs {
    /// Path to a job-group configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Computation method (e.g. PM7), used in folder and template names.
    #[arg(short, long, value_name = "NAME")]
    pub method: Option<String>,

    /// Molecule identifier of the job group.
    #[arg(long, value_name = "NAME")]
    pub molecule: Option<String>,

    /// Sequence identifier of the job group.
    #[arg(long, value_name = "NAME")]
    pub sequence: Option<String>,

    /// Base directory holding the molecule, input and output folders.
    #[arg(short, long, value_name = "PATH")]
    pub base_path: Option<PathBuf>,

    /// Header template file. Defaults to `header_<method>`.
    #[arg(long, value_name = "PATH")]
    pub header: Option<PathBuf>,

    /// Checkpoint directive prefix; the job name and `.chk` are appended per job.
    #[arg(long, value_name = "PREFIX")]
    pub checkpoint_prefix: Option<String>,

    /// Skip files that cannot be processed instead of stopping at the first one.
    #[arg(long)]
    pub lenient: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S batch.workers=8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoScopeArg {
    All,
    Input,
    Classify,
    Retry,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroFrequencyArg {
    /// Accept the job as a normal result.
    Normal,
    /// Move the job to the neg_freq folder for resubmission.
    Negative,
    /// Leave the file in place and report it.
    Unclassified,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub job: JobGroupArgs,

    /// Which part of the layout to print.
    #[arg(long, value_enum, default_value = "all")]
    pub scope: InfoScopeArg,

    /// Folder the classify or retry step would read.
    #[arg(short, long, value_name = "PATH")]
    pub target: Option<PathBuf>,
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub job: JobGroupArgs,
}

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug, Default)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub job: JobGroupArgs,

    /// Folder holding the output documents. Defaults to `<output folder>/result`.
    #[arg(short, long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// How to classify an output whose first frequency is exactly zero.
    #[arg(long, value_enum)]
    pub zero_frequency: Option<ZeroFrequencyArg>,

    /// Number of trailing lines searched for an error-termination marker.
    #[arg(long, value_name = "LINES")]
    pub error_scan_window: Option<usize>,

    /// Append every classification decision to this CSV file.
    #[arg(long, value_name = "PATH")]
    pub ledger: Option<PathBuf>,
}

/// Arguments for the `retry` subcommand.
#[derive(Args, Debug)]
pub struct RetryArgs {
    #[command(flatten)]
    pub job: JobGroupArgs,

    /// Classified folder (e.g. `output_PM7/error_l502` or `output_PM7/neg_freq`).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub target: PathBuf,
}
