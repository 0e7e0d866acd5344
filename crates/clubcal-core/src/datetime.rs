use std::cmp::Ordering;
use std::fmt::Display;

use chrono::{
  DateTime,
  Datelike,
  NaiveDate,
  NaiveDateTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::Labels;

const LOCAL_DATETIME_FORMATS: [&str; 3] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S"
];

/// Display fields for the calendar-page date badge.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct DateBadge {
  pub month:   String,
  pub day:     u32,
  pub weekday: String,
  pub year:    i32
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct DateRange {
  pub text:  String,
  pub badge: Option<DateBadge>
}

/// Parses a feed timestamp.
///
/// Offsets in the input are honored. Date-times without an offset are
/// read in `zone`, the zone the calendar is displayed in, and bare
/// dates are UTC midnight.
pub fn parse_timestamp<Z>(
  raw: &str,
  zone: &Z
) -> Option<DateTime<Utc>>
where
  Z: TimeZone
{
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(trimmed)
  {
    return Some(dt.with_timezone(&Utc));
  }

  for format in LOCAL_DATETIME_FORMATS {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        trimmed, format
      )
    {
      return zone
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc));
    }
  }

  NaiveDate::parse_from_str(
    trimmed, "%Y-%m-%d"
  )
  .ok()
  .and_then(|date| {
    date.and_hms_opt(0, 0, 0)
  })
  .map(|naive| naive.and_utc())
}

/// Orders feed entries by start instant. Missing or unparseable starts
/// sort after every dated entry and compare equal to each other.
pub fn compare_starts(
  a: Option<DateTime<Utc>>,
  b: Option<DateTime<Utc>>
) -> Ordering {
  match (a, b) {
    | (Some(a), Some(b)) => a.cmp(&b),
    | (Some(_), None) => Ordering::Less,
    | (None, Some(_)) => {
      Ordering::Greater
    }
    | (None, None) => Ordering::Equal
  }
}

pub fn long_date<Z>(
  dt: &DateTime<Z>
) -> String
where
  Z: TimeZone,
  Z::Offset: Display
{
  dt.format("%B %-d, %Y").to_string()
}

pub fn clock_time<Z>(
  dt: &DateTime<Z>
) -> String
where
  Z: TimeZone,
  Z::Offset: Display
{
  dt.format("%-I:%M %P").to_string()
}

pub fn date_badge<Z>(
  dt: &DateTime<Z>
) -> DateBadge
where
  Z: TimeZone,
  Z::Offset: Display
{
  DateBadge {
    month:   dt.format("%b").to_string(),
    day:     dt.day(),
    weekday: dt.format("%a").to_string(),
    year:    dt.year()
  }
}

/// Builds the "when" line for an event plus the badge fields, reading
/// both ends in `tz`.
pub fn format_date_range<Z>(
  start: Option<&str>,
  end: Option<&str>,
  tz: &Z,
  labels: &Labels
) -> DateRange
where
  Z: TimeZone,
  Z::Offset: Display
{
  let start = present(start);
  let end = present(end);

  if start.is_none() && end.is_none() {
    return DateRange {
      text:  labels.no_date.clone(),
      badge: None
    };
  }

  let start_dt = start
    .and_then(|raw| {
      parse_logged(raw, "start", tz)
    })
    .map(|dt| dt.with_timezone(tz));
  let end_dt = end
    .and_then(|raw| {
      parse_logged(raw, "end", tz)
    })
    .map(|dt| dt.with_timezone(tz));

  match (start_dt, end_dt) {
    | (Some(start), Some(end)) => {
      let same_day = start.date_naive()
        == end.date_naive();
      let text = if same_day {
        format!(
          "{} {} to {}",
          long_date(&start),
          clock_time(&start),
          clock_time(&end)
        )
      } else {
        format!(
          "{} {} to {} {}",
          long_date(&start),
          clock_time(&start),
          long_date(&end),
          clock_time(&end)
        )
      };
      DateRange {
        text,
        badge: Some(date_badge(&start))
      }
    }
    | (Some(only), None)
    | (None, Some(only)) => DateRange {
      text:  format!(
        "{} {}",
        long_date(&only),
        clock_time(&only)
      ),
      badge: Some(date_badge(&only))
    },
    | (None, None) => DateRange {
      text:  labels.invalid_date.clone(),
      badge: None
    }
  }
}

fn present(
  raw: Option<&str>
) -> Option<&str> {
  raw.filter(|value| {
    !value.trim().is_empty()
  })
}

fn parse_logged<Z>(
  raw: &str,
  field: &str,
  tz: &Z
) -> Option<DateTime<Utc>>
where
  Z: TimeZone
{
  let parsed = parse_timestamp(raw, tz);
  if parsed.is_none() {
    tracing::debug!(
      field,
      value = raw,
      "discarding unparseable event \
       timestamp"
    );
  }
  parsed
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::info!(
        source,
        timezone = %trimmed,
        "resolved display timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::warn!(
        source,
        timezone = %trimmed,
        error = %err,
        "invalid timezone; ignoring"
      );
      None
    }
  }
}
