use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "ELISA Tools Contributors",
    version,
    about = "platekit - record, categorize, normalize and classify 96-well ELISA plates.",
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

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.multiplier=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a plate from input files, assign categories, and save it.
    Save(SaveArgs),
    /// Normalize and classify the latest saved plate with a given name.
    Analyze(AnalyzeArgs),
    /// Print the latest saved plate with a given name.
    Fetch(FetchArgs),
    /// List all saved plates.
    List,
    /// Manage the local data directory holding the database and exported sheets.
    Data(DataArgs),
}

/// Where the plate's names and values come from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = true)]
pub struct PlateInputArgs {
    /// Text file with sample names, one plate row per line.
    #[arg(long, value_name = "PATH", requires = "values", conflicts_with = "layout")]
    pub names: Option<PathBuf>,

    /// Text file with measured values, same shape as --names.
    #[arg(long, value_name = "PATH", requires = "names", conflicts_with = "layout")]
    pub values: Option<PathBuf>,

    /// CSV layout with columns well, sample, value and optional category, serum.
    #[arg(long, value_name = "PATH")]
    pub layout: Option<PathBuf>,
}

/// Threshold settings shared by `save --analyze` and `analyze`.
#[derive(Args, Debug, Clone, Default)]
pub struct MethodArgs {
    /// Threshold method: 'standard-deviation' (sd) or 'multiplier' (x).
    #[arg(short, long, value_name = "METHOD")]
    pub method: Option<String>,

    /// Multiplier k. Text that is not a number falls back to 1.0.
    #[arg(short = 'k', long, value_name = "FLOAT")]
    pub multiplier: Option<String>,
}

/// Arguments for the `save` subcommand.
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Name of the plate.
    #[arg(short, long, required = true)]
    pub name: String,

    #[command(flatten)]
    pub input: PlateInputArgs,

    // --- Category Assignment ---
    /// Wells of the positive control (K+), e.g. "A1 A2".
    #[arg(long, value_name = "WELLS")]
    pub kpos: Option<String>,

    /// Wells of the healthy negative control (K- healthy).
    #[arg(long, value_name = "WELLS")]
    pub kneg_healthy: Option<String>,

    /// Wells of the buffer negative control (K- buffer).
    #[arg(long, value_name = "WELLS")]
    pub kneg_buffer: Option<String>,

    /// Wells of the substrate blank.
    #[arg(long, value_name = "WELLS")]
    pub blank: Option<String>,

    /// Assign a typed well list, e.g. "kpos:A1,A2@serum-3". Applied after the flags above.
    #[arg(short, long, value_name = "CATEGORY:WELLS[@LABEL]")]
    pub assign: Vec<String>,

    /// Assign grid cells by 1-based row and column, e.g. "blank:1,1;1,2". Applied last.
    #[arg(long, value_name = "CATEGORY:R,C;R,C[@LABEL]")]
    pub select: Vec<String>,

    // --- Analysis ---
    /// Normalize and classify the plate before saving.
    #[arg(long)]
    pub analyze: bool,

    #[command(flatten)]
    pub method: MethodArgs,

    // --- Export ---
    /// Also write the plate to a sheet in the local sheet directory.
    #[arg(long, alias = "sheet")]
    pub excel: bool,

    /// Also upload the plate to the configured remote spreadsheet.
    #[arg(long)]
    pub remote: bool,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Name of the plate.
    #[arg(short, long, required = true)]
    pub name: String,

    #[command(flatten)]
    pub method: MethodArgs,

    /// Store the analyzed plate as a new save.
    #[arg(long)]
    pub save: bool,

    /// Print the results as an 8x12 grid instead of a table.
    #[arg(long)]
    pub grid: bool,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Name of the plate.
    #[arg(short, long, required = true)]
    pub name: String,

    /// Print an 8x12 grid instead of one line per well.
    #[arg(long)]
    pub grid: bool,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The new path to use for the database and sheets.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
}
