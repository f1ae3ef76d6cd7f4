use clap::Parser;
use tracing_subscriber::EnvFilter;

use ngs_loader::cli;
use ngs_loader::config::load_config;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = load_config(cli.config.as_deref(), &cli.defines)?;

    // RUST_LOG wins over --verbose and logging.level
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if cli.verbose => EnvFilter::new("ngs_loader=debug,info"),
        Err(_) => EnvFilter::new(format!(
            "ngs_loader={}",
            config.log_level.level_filter()
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    cli::run(cli, config)
}
