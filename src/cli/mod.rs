//! Command-line interface for ngs-loader.
//!
//! Available commands:
//!
//! - **load**: Find, download if needed, and load a library
//! - **list**: Show every candidate path of a library
//! - **purge**: Delete every installed copy of a library
//! - **latest**: Show the latest published version of a library
//!
//! ## Usage
//!
//! ```text
//! # Load ngs-sdk, requiring at least 2.9.0
//! ngs-loader load ngs-sdk --min-version 2.9.0
//!
//! # Same, without touching the network
//! ngs-loader -D loadLibrary.noDownload=true load ngs-sdk --min-version 2.9.0
//!
//! # Where would ngs-sdk be looked for?
//! ngs-loader list ngs-sdk --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::LoaderConfig;
use crate::manager::LibraryManager;

pub mod load;
pub mod locations;

#[derive(Parser)]
#[command(name = "ngs-loader")]
#[command(version)]
#[command(about = "Locate, download and load the NGS native libraries")]
#[command(
    long_about = "ngs-loader finds the newest compatible copy of an NGS native library.\n\nIt searches the cache, the library search path, the NCBI home directory, the install directory, the classpath, the working directory and the temporary directory, and downloads the latest release from NCBI when nothing installed fits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Configuration override, e.g. `-D loadLibrary.noDownload=true`
    #[arg(short = 'D', value_name = "KEY=VALUE", global = true)]
    pub defines: Vec<String>,

    /// Configuration file (defaults to ~/.ncbi/ngs-loader.ini)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find and load a library
    Load(load::LoadArgs),

    /// List candidate paths of a library
    List(locations::LibraryArgs),

    /// Delete every installed copy of a library
    Purge(locations::LibraryArgs),

    /// Show the latest published version of a library
    Latest(locations::LibraryArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Run the parsed command against `config`.
///
/// # Errors
///
/// Returns the command's failure.
pub fn run(cli: Cli, config: LoaderConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Load(args) => load::run(args, config, cli.format),
        Commands::List(args) => locations::run_list(&args, config, cli.format, cli.verbose),
        Commands::Purge(args) => locations::run_purge(&args, config, cli.format),
        Commands::Latest(args) => locations::run_latest(&args, config, cli.format),
    }
}

fn manager(config: LoaderConfig) -> anyhow::Result<LibraryManager> {
    LibraryManager::new(config)
        .map_err(|e| anyhow::anyhow!("Failed to set up the library manager: {e}"))
}
