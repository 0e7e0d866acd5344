use std::path::PathBuf;

use anyhow::anyhow;
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "clubcal",
    version,
    about = "Preview the club events feed the way the website shows it"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Calendar config (TOML). Falls back to $CLUBCAL_CONFIG, then ./clubcal.toml.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// IANA zone used to display times, e.g. America/Los_Angeles.
    #[arg(long = "timezone", global = true)]
    pub timezone: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the visible events as a table.
    List(ViewArgs),
    /// Print the visible events as JSON cards.
    Json(ViewArgs),
    /// Print the filter categories, one `value<TAB>label` per line.
    Filters {
        /// Feed file, or `-` for stdin.
        feed: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Feed file, or `-` for stdin.
    pub feed: PathBuf,

    /// Only show this category.
    #[arg(long = "filter", default_value = "")]
    pub filter: String,

    /// Include events whose start is not in the future.
    #[arg(long = "past")]
    pub past: bool,

    /// Pretend the current time is this instant. Without an offset it is
    /// read in the display zone.
    #[arg(long = "now", value_parser = check_now)]
    pub now: Option<String>,
}

fn check_now(raw: &str) -> Result<String, String> {
    clubcal_core::datetime::parse_timestamp(raw, &Utc)
        .map(|_| raw.to_string())
        .ok_or_else(|| format!("not an ISO-8601 timestamp: {raw}"))
}

/// Net verbosity: each `-v` raises the default level by one step and each
/// `-q` lowers it, starting from `warn`.
pub fn log_level(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => LevelFilter::ERROR,
        -1 | 0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Logs go to stderr so `json` output on stdout stays machine readable.
/// `RUST_LOG` replaces the flag-derived level when set.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives)
            .map_err(|e| anyhow!("invalid RUST_LOG {directives:?}: {e}"))?,
        Err(_) => EnvFilter::default().add_directive(log_level(verbose, quiet).into()),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .try_init();

    if let Err(err) = installed {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
