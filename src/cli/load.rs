use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::config::LoaderConfig;
use crate::core::version::Version;

#[derive(Args)]
pub struct LoadArgs {
    /// Library name, e.g. "ngs-sdk"
    #[arg(required = true)]
    pub library: String,

    /// Minimum required version, e.g. "2.9.0"
    #[arg(long, required = true)]
    pub min_version: String,
}

pub fn run(args: LoadArgs, config: LoaderConfig, format: OutputFormat) -> anyhow::Result<()> {
    let required = Version::parse(&args.min_version);
    let mut manager =
        super::manager(config)?.with_required_version(args.library.clone(), required);

    let loaded = manager
        .load_library(&args.library)
        .with_context(|| format!("Cannot load {} {} or newer", args.library, required))?;

    match format {
        OutputFormat::Text => {
            println!("Library:  {}", loaded.name);
            println!("Version:  {}", loaded.version);
            println!("Path:     {}", loaded.path.display());
            println!("Location: {}", loaded.location);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "library": loaded.name,
                "version": loaded.version,
                "required": required,
                "path": loaded.path,
                "location": loaded.location,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
