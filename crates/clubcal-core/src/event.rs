use chrono::{
  DateTime,
  TimeZone,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

use crate::datetime::parse_timestamp;

/// One entry of the published events feed.
///
/// Every text field is optional in the feed; `filter` and
/// `filter_title` fall back to empty strings so a feed produced by an
/// older exporter still loads.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Event {
  #[serde(default)]
  pub summary:      Option<String>,
  #[serde(default)]
  pub start:        Option<String>,
  #[serde(default)]
  pub end:          Option<String>,
  #[serde(default)]
  pub description:  Option<String>,
  #[serde(default)]
  pub location:     Option<String>,
  #[serde(default)]
  pub filter:       String,
  #[serde(default)]
  pub filter_title: String
}

impl Event {
  /// Start instant, or `None` when the feed left it out or it does not
  /// parse. A start without an offset is read in `tz`.
  pub fn start_instant<Z>(
    &self,
    tz: &Z
  ) -> Option<DateTime<Utc>>
  where
    Z: TimeZone
  {
    self
      .start
      .as_deref()
      .and_then(|raw| {
        parse_timestamp(raw, tz)
      })
  }

  pub fn is_upcoming<Z>(
    &self,
    now: DateTime<Utc>,
    tz: &Z
  ) -> bool
  where
    Z: TimeZone
  {
    self
      .start_instant(tz)
      .is_some_and(|start| start > now)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    FixedOffset,
    TimeZone,
    Utc
  };

  use super::Event;

  #[test]
  fn missing_category_fields_default_to_empty(
  ) {
    let event: Event =
      serde_json::from_str(
        r#"{"summary":"Swap meet","extra":1}"#
      )
      .expect("parse event");
    assert_eq!(
      event.summary.as_deref(),
      Some("Swap meet")
    );
    assert!(event.filter.is_empty());
    assert!(
      event.filter_title.is_empty()
    );
    assert!(event.start.is_none());
  }

  #[test]
  fn upcoming_requires_start_strictly_after_now(
  ) {
    let now = Utc
      .with_ymd_and_hms(
        2025, 7, 12, 15, 30, 0
      )
      .single()
      .expect("valid now");

    let at_now = Event {
      start: Some(
        "2025-07-12T08:30:00-07:00"
          .to_string()
      ),
      ..Event::default()
    };
    let later = Event {
      start: Some(
        "2025-07-12T08:31:00-07:00"
          .to_string()
      ),
      ..Event::default()
    };
    let undated = Event::default();

    assert!(!at_now.is_upcoming(now, &Utc));
    assert!(later.is_upcoming(now, &Utc));
    assert!(
      !undated.is_upcoming(now, &Utc)
    );
  }

  #[test]
  fn offsetless_start_uses_display_zone(
  ) {
    let now = Utc
      .with_ymd_and_hms(
        2025, 7, 12, 10, 0, 0
      )
      .single()
      .expect("valid now");
    let pacific =
      FixedOffset::west_opt(7 * 3600)
        .expect("valid offset");
    let event = Event {
      start: Some(
        "2025-07-12T08:30:00".to_string()
      ),
      ..Event::default()
    };

    // 08:30 at UTC-7 is 15:30Z, after 10:00Z.
    assert!(
      event.is_upcoming(now, &pacific)
    );
    assert!(
      !event.is_upcoming(now, &Utc)
    );
  }
}
