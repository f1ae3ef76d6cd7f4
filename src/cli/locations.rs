use clap::Args;

use crate::cli::OutputFormat;
use crate::config::LoaderConfig;

#[derive(Args)]
pub struct LibraryArgs {
    /// Library name, e.g. "ngs-sdk"
    #[arg(required = true)]
    pub library: String,
}

pub fn run_list(
    args: &LibraryArgs,
    config: LoaderConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let manager = super::manager(config)?;
    let files = manager.list_candidates(&args.library);

    match format {
        OutputFormat::Text => {
            if verbose {
                let locations: Vec<String> =
                    manager.locations().iter().map(ToString::to_string).collect();
                println!("Active locations: {}", locations.join(", "));
                if let Some(cache) = manager.cache_path() {
                    println!("Cache: {}", cache.display());
                }
            }
            for (i, file) in files.iter().enumerate() {
                println!(
                    "({}) {} {} [{}]",
                    i + 1,
                    file.path.display(),
                    if file.exists { "+" } else { "-" },
                    file.location
                );
            }
            if files.is_empty() {
                println!("No candidate paths for {}", args.library);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "library": args.library,
                "locations": manager.locations(),
                "candidates": files,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

pub fn run_purge(args: &LibraryArgs, config: LoaderConfig, format: OutputFormat) -> anyhow::Result<()> {
    let manager = super::manager(config)?;
    let report = manager.delete_libraries(&args.library);

    match format {
        OutputFormat::Text => {
            for path in &report.deleted {
                println!("Deleted {}", path.display());
            }
            for (path, reason) in &report.failed {
                println!("Cannot delete {}: {}", path.display(), reason);
            }
            if report.deleted.is_empty() && report.failed.is_empty() {
                println!("No installed {} library found", args.library);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} libraries could not be deleted",
            report.failed.len(),
            report.failed.len() + report.deleted.len()
        )
    }
}

pub fn run_latest(args: &LibraryArgs, config: LoaderConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut manager = super::manager(config)?;
    let latest = manager.latest_version(&args.library);
    manager.flush_cache();

    match format {
        OutputFormat::Text => match &latest {
            Some(version) => println!("{} {}", args.library, version),
            None => println!("{}: latest version is unknown", args.library),
        },
        OutputFormat::Json => {
            let output = serde_json::json!({
                "library": args.library,
                "latest_version": latest,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
