pub mod setup;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "javamap")]
#[command(about = "Java source model and relationship graph analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a tree of Java sources
    Analyze {
        /// Root directory of the sources
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra exclude globs, added to the configured set
        #[arg(long = "exclude", value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Boundary detection coupling threshold (overrides configuration)
        #[arg(long = "coupling-threshold")]
        coupling_threshold: Option<f64>,

        /// Skip files larger than this many bytes (overrides configuration)
        #[arg(long = "max-file-size")]
        max_file_size: Option<u64>,

        /// Number of worker threads (0 = one per core)
        #[arg(long, default_value = "0")]
        jobs: usize,

        /// Process files on a single thread
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Write a default .javamap.toml to the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
