use std::fmt::Display;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use clubcal_core::datetime::{parse_timestamp, parse_timezone};
use clubcal_core::feed::load_feed;
use clubcal_core::render::rebuild;
use clubcal_core::{CalendarConfig, CalendarState};
use tracing::{debug, info};

use crate::cli::{Command, ViewArgs};
use crate::render::print_card_table;

const CONFIG_ENV_VAR: &str = "CLUBCAL_CONFIG";
const TIMEZONE_ENV_VAR: &str = "CLUBCAL_TIMEZONE";
const DEFAULT_CONFIG_FILE: &str = "clubcal.toml";

/// Zone used to print times.
#[derive(Debug, Clone, Copy)]
pub enum DisplayZone {
    Named(Tz),
    Local,
}

#[tracing::instrument(skip_all)]
pub fn load_config(override_path: Option<&Path>) -> anyhow::Result<CalendarConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => resolve_config_path(),
    };

    match path {
        Some(path) => CalendarConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            debug!("no config file; using defaults");
            Ok(CalendarConfig::default())
        }
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
    candidate.exists().then_some(candidate)
}

pub fn resolve_zone(flag: Option<&str>, config: &CalendarConfig) -> DisplayZone {
    if let Some(tz) = flag.and_then(|raw| parse_timezone(raw, "--timezone")) {
        return DisplayZone::Named(tz);
    }

    if let Ok(raw) = std::env::var(TIMEZONE_ENV_VAR)
        && let Some(tz) = parse_timezone(&raw, TIMEZONE_ENV_VAR)
    {
        return DisplayZone::Named(tz);
    }

    if let Some(tz) = config
        .timezone
        .as_deref()
        .and_then(|raw| parse_timezone(raw, "config"))
    {
        return DisplayZone::Named(tz);
    }

    DisplayZone::Local
}

#[tracing::instrument(skip(config, out))]
pub fn dispatch<W: Write>(
    command: Command,
    config: &CalendarConfig,
    zone: DisplayZone,
    out: W,
) -> anyhow::Result<()> {
    match zone {
        DisplayZone::Named(tz) => run_in_zone(command, &tz, config, out),
        DisplayZone::Local => run_in_zone(command, &Local, config, out),
    }
}

fn run_in_zone<Z, W>(command: Command, tz: &Z, config: &CalendarConfig, out: W) -> anyhow::Result<()>
where
    Z: TimeZone,
    Z::Offset: Display,
    W: Write,
{
    match command {
        Command::List(args) => list(&args, tz, config, out),
        Command::Json(args) => json(&args, tz, config, out),
        Command::Filters { feed } => filters(&feed, tz, out),
    }
}

fn list<Z, W>(args: &ViewArgs, tz: &Z, config: &CalendarConfig, out: W) -> anyhow::Result<()>
where
    Z: TimeZone,
    Z::Offset: Display,
    W: Write,
{
    let state = view_state(args, tz)?;
    let now = resolve_now(args, tz)?;
    let cards = rebuild(&state, now, tz, config);
    info!(visible = cards.len(), "rendering event table");
    print_card_table(out, &cards, config)
}

fn json<Z, W>(args: &ViewArgs, tz: &Z, config: &CalendarConfig, mut out: W) -> anyhow::Result<()>
where
    Z: TimeZone,
    Z::Offset: Display,
    W: Write,
{
    let state = view_state(args, tz)?;
    let now = resolve_now(args, tz)?;
    let cards = rebuild(&state, now, tz, config);
    serde_json::to_writer_pretty(&mut out, &cards).context("failed to write cards")?;
    writeln!(out)?;
    Ok(())
}

fn filters<Z, W>(feed: &Path, tz: &Z, mut out: W) -> anyhow::Result<()>
where
    Z: TimeZone,
    W: Write,
{
    let body = read_feed(feed)?;
    let mut state = CalendarState::new();
    let options = load_feed(&mut state, &body, tz)
        .with_context(|| format!("failed to load feed {}", feed.display()))?;

    for option in options {
        writeln!(out, "{}\t{}", option.value, option.label)?;
    }
    Ok(())
}

fn view_state<Z: TimeZone>(args: &ViewArgs, tz: &Z) -> anyhow::Result<CalendarState> {
    let body = read_feed(&args.feed)?;
    let mut state = CalendarState::new();
    load_feed(&mut state, &body, tz)
        .with_context(|| format!("failed to load feed {}", args.feed.display()))?;
    state.set_filter(args.filter.clone());
    state.set_show_past_events(args.past);
    Ok(state)
}

/// The `--now` override read in the display zone, or the real clock.
fn resolve_now<Z: TimeZone>(args: &ViewArgs, tz: &Z) -> anyhow::Result<DateTime<Utc>> {
    match args.now.as_deref() {
        Some(raw) => parse_timestamp(raw, tz)
            .with_context(|| format!("--now {raw:?} does not exist in the display zone")),
        None => Ok(Utc::now()),
    }
}

/// Reads a feed from a file, or from stdin when the path is `-`.
pub fn read_feed(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("failed to read feed from stdin")?;
        return Ok(body);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read feed {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clubcal_core::CalendarConfig;
    use tempfile::tempdir;

    use super::{DisplayZone, dispatch, resolve_zone};
    use crate::cli::{Command, ViewArgs};

    const FEED: &str = r#"[
      {"summary":"Race","start":"2025-07-12T08:30:00-07:00","end":"2025-07-12T14:00:00-07:00","filter":"racing","filter_title":"Racing"},
      {"summary":"Swap meet","start":"2025-07-20T08:00:00-07:00","location":"Encinitas Field","filter":"social","filter_title":"Social"}
    ]"#;

    fn pacific() -> DisplayZone {
        DisplayZone::Named(chrono_tz::America::Los_Angeles)
    }

    #[test]
    fn filters_lists_categories() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("events.json");
        fs::write(&path, FEED).expect("write feed");

        let mut out = Vec::new();
        dispatch(
            Command::Filters { feed: path },
            &CalendarConfig::default(),
            pacific(),
            &mut out,
        )
        .expect("filters");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "racing\tRacing\nsocial\tSocial\n"
        );
    }

    #[test]
    fn json_honours_filter_and_now() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("events.json");
        fs::write(&path, FEED).expect("write feed");

        let args = ViewArgs {
            feed: path,
            filter: "racing".to_string(),
            past: false,
            now: Some("2025-07-01T00:00:00Z".to_string()),
        };

        let mut out = Vec::new();
        dispatch(Command::Json(args), &CalendarConfig::default(), pacific(), &mut out)
            .expect("json");

        let cards: serde_json::Value = serde_json::from_slice(&out).expect("json output");
        let cards = cards.as_array().expect("array");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["view"]["title"], "Race");
        assert_eq!(
            cards[0]["view"]["when"]["text"],
            "July 12, 2025 8:30 am to 2:00 pm"
        );
    }

    #[test]
    fn offsetless_times_follow_display_zone() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"[{"summary":"Dawn patrol","start":"2025-07-12T08:30:00","filter":"social","filter_title":"Social"}]"#,
        )
        .expect("write feed");

        // 07:00 Pacific: the 08:30 Pacific start is still ahead.
        let args = ViewArgs {
            feed: path,
            filter: String::new(),
            past: false,
            now: Some("2025-07-12T07:00:00".to_string()),
        };

        let mut out = Vec::new();
        dispatch(Command::Json(args), &CalendarConfig::default(), pacific(), &mut out)
            .expect("json");

        let cards: serde_json::Value = serde_json::from_slice(&out).expect("json output");
        let cards = cards.as_array().expect("array");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["view"]["when"]["text"], "July 12, 2025 8:30 am");
    }

    #[test]
    fn missing_feed_is_an_error() {
        let args = ViewArgs {
            feed: "/definitely/not/here.json".into(),
            filter: String::new(),
            past: true,
            now: None,
        };
        let result = dispatch(
            Command::List(args),
            &CalendarConfig::default(),
            DisplayZone::Local,
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn flag_zone_wins_over_config() {
        let config = CalendarConfig {
            timezone: Some("Europe/Berlin".to_string()),
            ..CalendarConfig::default()
        };
        match resolve_zone(Some("America/Los_Angeles"), &config) {
            DisplayZone::Named(tz) => assert_eq!(tz, chrono_tz::America::Los_Angeles),
            DisplayZone::Local => panic!("expected named zone"),
        }
    }
}
