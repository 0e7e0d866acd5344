use chrono::TimeZone;
use tracing::{
  info,
  warn
};

use crate::datetime::compare_starts;
use crate::error::CalendarResult;
use crate::event::Event;
use crate::filter::{
  FilterOption,
  categories
};
use crate::state::CalendarState;

/// Decodes the feed body. Anything but a JSON array of event objects is
/// rejected.
pub fn parse_feed(
  body: &str
) -> CalendarResult<Vec<Event>> {
  let events: Vec<Event> =
    serde_json::from_str(body)?;
  Ok(events)
}

/// Stable ascending sort by start; undated entries go last in feed
/// order. Starts without an offset are read in `tz`.
pub fn sort_events<Z>(
  events: &mut [Event],
  tz: &Z
) where
  Z: TimeZone
{
  events.sort_by_cached_key(|event| {
    SortKey(event.start_instant(tz))
  });
}

#[derive(PartialEq, Eq)]
struct SortKey(
  Option<chrono::DateTime<chrono::Utc>>
);

impl PartialOrd for SortKey {
  fn partial_cmp(
    &self,
    other: &Self
  ) -> Option<std::cmp::Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for SortKey {
  fn cmp(
    &self,
    other: &Self
  ) -> std::cmp::Ordering {
    compare_starts(self.0, other.0)
  }
}

/// Parses and sorts a feed body, logging entries that cannot be
/// placed in time.
#[tracing::instrument(skip_all)]
pub fn prepare_feed<Z>(
  body: &str,
  tz: &Z
) -> CalendarResult<Vec<Event>>
where
  Z: TimeZone
{
  let mut events = parse_feed(body)?;
  sort_events(&mut events, tz);

  let undated = events
    .iter()
    .filter(|event| {
      event.start_instant(tz).is_none()
    })
    .count();
  if undated > 0 {
    warn!(
      undated,
      "feed has events without a usable \
       start"
    );
  }
  Ok(events)
}

/// Parses, sorts and stores a feed body and returns its categories. On
/// error the state keeps whatever it had before.
pub fn load_feed<Z>(
  state: &mut CalendarState,
  body: &str,
  tz: &Z
) -> CalendarResult<Vec<FilterOption>>
where
  Z: TimeZone
{
  let events = prepare_feed(body, tz)?;
  let options = categories(&events);
  info!(
    events = events.len(),
    categories = options.len(),
    "loaded calendar feed"
  );
  state.load(events);
  Ok(options)
}
