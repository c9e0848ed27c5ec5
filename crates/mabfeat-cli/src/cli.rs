use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "mabfeat - batch hydrogen repair, antibody numbering, and molecular feature extraction for protein structure files.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Path to a structure file or a directory containing structure files.
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    /// Number of times to repeat feature calculation for each structure.
    #[arg(short, long, default_value_t = 1, value_name = "INT")]
    pub repeats: usize,

    /// Collect results incrementally as each file finishes instead of in one batch.
    #[arg(short, long)]
    pub wait: bool,

    /// Output file for the aggregated feature records.
    #[arg(
        short,
        long,
        default_value = "molecular_features.json",
        value_name = "PATH"
    )]
    pub output: PathBuf,

    /// pH value used when adding missing hydrogens.
    #[arg(long = "pH", default_value_t = 7.0, value_name = "FLOAT")]
    pub ph: f64,

    /// Path to the pipeline configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel processing.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}
