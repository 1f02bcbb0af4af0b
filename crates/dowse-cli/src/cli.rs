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
    author,
    version,
    about = "Dowse CLI - Places solvent sites in the cavities and pockets of macromolecules.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Place solvent sites inside the surface of a structure and cluster them.
    Solvate(SolvateArgs),
    /// Cluster an existing set of solvent sites.
    Cluster(ClusterArgs),
}

/// Arguments for the `solvate` subcommand.
#[derive(Args, Debug)]
pub struct SolvateArgs {
    // --- Core Arguments ---
    /// Path to the input structure file (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub pdb: PathBuf,

    /// Path to the oriented surface vertex file (.vert).
    #[arg(long, required = true, value_name = "PATH")]
    pub vert: PathBuf,

    /// Output prefix. The clustered sites are written to `<PREFIX>.pdb`.
    #[arg(short, long, required = true, value_name = "PREFIX")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Lattice Overrides ---
    /// Override the lattice spacing in Angstroms.
    #[arg(short = 's', long, value_name = "FLOAT")]
    pub spacing: Option<f64>,

    /// Override the surface search radius in Angstroms.
    #[arg(short = 'r', long, value_name = "FLOAT")]
    pub search_radius: Option<f64>,

    /// Override the inside/outside classification strategy.
    /// One of 'scatter', 'binned' or 'weighted-vote'.
    #[arg(long, value_name = "NAME")]
    pub classifier: Option<String>,

    // --- Output Controls ---
    /// Keep sites that have no structure atom within the contact cutoff.
    #[arg(long)]
    pub keep_isolated: bool,

    /// Also write the inside, outside, void and unclustered site files.
    #[arg(long)]
    pub write_intermediates: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S solvent.probe-diameter=2.8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `cluster` subcommand.
#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// Path to the PDB file holding the sites to cluster.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output prefix. The clustered sites are written to `<PREFIX>.pdb`.
    #[arg(short, long, required = true, value_name = "PREFIX")]
    pub output: PathBuf,

    /// Lattice spacing the sites were placed on, in Angstroms.
    #[arg(short = 's', long, value_name = "FLOAT")]
    pub spacing: Option<f64>,

    /// Cell size of the spatial hash, in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub hash_spacing: Option<f64>,
}
