use clap::{Args, Parser, Subcommand};
use mdvalidate::core::energy::canonical::Engine;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Christoph Klein",
    version,
    about = "mdval - Cross-engine validation of single-point energies computed by GROMACS and AMBER.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S comparison.tolerance=0.01
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the single-point energy of one input set and print its canonical terms.
    Energy(EnergyArgs),
    /// Parse an existing engine output file (energy.xvg or mdout) without running an engine.
    Parse(ParseArgs),
    /// Evaluate a reference and a converted input set and check their energies agree.
    Compare(CompareArgs),
    /// Discover and run every validation case below a directory.
    Suite(SuiteArgs),
}

#[derive(Args, Debug)]
pub struct EnergyArgs {
    /// Topology and coordinate files (.top + .gro, or .prmtop + .inpcrd).
    #[arg(required = true, num_args = 2, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Case name used to choose the run parameters (names containing `_vacuum`
    /// select the vacuum parameters). Defaults to the topology's file stem.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Engine output file to parse.
    #[arg(value_name = "PATH")]
    pub file: PathBuf,

    /// Format of the file: `gromacs` (or `gmx`) and `amber` (or `sander`).
    /// Inferred from the file name when omitted (`*.xvg` is GROMACS, anything
    /// else is AMBER).
    #[arg(short, long, value_name = "ENGINE")]
    pub engine: Option<Engine>,

    /// Print the engine's raw terms instead of the canonical breakdown.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Reference topology and coordinate files.
    #[arg(short, long, required = true, num_args = 2, value_name = "FILES")]
    pub reference: Vec<PathBuf>,

    /// Converted topology and coordinate files.
    #[arg(short = 'o', long, required = true, num_args = 2, value_name = "FILES")]
    pub converted: Vec<PathBuf>,

    /// Case name used to choose the run parameters. Defaults to the reference
    /// topology's file stem.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Write the per-term comparison as CSV to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SuiteArgs {
    /// Directory whose subdirectories hold the validation cases.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Write one CSV row per compared term to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}
