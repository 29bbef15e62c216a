//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::logger::Level;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kiln static content pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: kiln.toml)
    #[arg(short = 'C', long, default_value = "kiln.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a starter project
    Init {
        /// the name(path) of the project directory, relative to `root`
        name: Option<PathBuf>,
    },

    /// Run the pipeline and write the output collection
    Build {
        /// Input directory path (relative to project root)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory path (relative to project root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Delete top-level files in the output directory before writing
        #[arg(long)]
        clear: bool,

        /// Logging threshold (debug, info, error, fatal, none)
        #[arg(short, long, value_enum)]
        threshold: Option<Level>,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}
