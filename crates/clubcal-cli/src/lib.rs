pub mod cli;
pub mod commands;
pub mod render;

use std::ffi::OsString;

use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting clubcal preview"
    );

    let config = commands::load_config(cli.config.as_deref())?;
    let zone = commands::resolve_zone(cli.timezone.as_deref(), &config);
    debug!(?zone, "display zone resolved");

    let stdout = std::io::stdout().lock();
    commands::dispatch(cli.command, &config, zone, stdout)?;

    info!("done");
    Ok(())
}
