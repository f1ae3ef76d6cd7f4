//! Opens one library and prints its self-reported version.
//!
//! Run by the library manager in a child process so that a broken library
//! can only take this process down.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ngs_loader::native;
use ngs_loader::probe::sentinel::format_line;

#[derive(Parser)]
#[command(name = "ngs-version-probe")]
#[command(version)]
#[command(about = "Print the version reported by a native library")]
struct Args {
    /// Library name, e.g. "ngs-sdk"
    library: String,

    /// Library file, or bare name when loading through the search path
    path: PathBuf,

    /// "true" to load `path` as a bare name through the search path
    #[arg(action = clap::ArgAction::Set, default_value = "false")]
    search_path_load: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let lib = match native::open(&args.path, args.search_path_load) {
        Ok(lib) => lib,
        Err(e) => {
            eprintln!("cannot load {}: {}", args.path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match native::query_version(&lib, &args.library) {
        Some(version) => {
            debug!("{} reports {}", args.path.display(), version);
            println!("{}", format_line(&args.library, &version));
            ExitCode::SUCCESS
        }
        None => {
            eprintln!(
                "{} does not export {}",
                args.path.display(),
                native::version_symbol(&args.library)
            );
            ExitCode::FAILURE
        }
    }
}
