use std::fmt::Display;

use chrono::{
  DateTime,
  TimeZone,
  Utc
};
use serde::Serialize;
use tracing::debug;

use crate::config::CalendarConfig;
use crate::event::Event;
use crate::format::{
  EventView,
  format_event
};
use crate::state::CalendarState;

/// One rendered calendar entry.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct EventCard {
  /// `event{n}`, `n` being the 1-based position in the full event
  /// list, so ids stay put when filters change.
  pub dom_id:   String,
  pub category: String,
  pub view:     EventView
}

pub fn is_visible<Z>(
  event: &Event,
  state: &CalendarState,
  now: DateTime<Utc>,
  tz: &Z
) -> bool
where
  Z: TimeZone
{
  let filter = state.current_filter();
  if !filter.is_empty()
    && filter != event.filter
  {
    return false;
  }

  state.show_past_events()
    || event.is_upcoming(now, tz)
}

/// Recomputes the visible cards from scratch. Order follows the state's
/// event order.
#[tracing::instrument(skip(
  state, now, tz, config
))]
pub fn rebuild<Z>(
  state: &CalendarState,
  now: DateTime<Utc>,
  tz: &Z,
  config: &CalendarConfig
) -> Vec<EventCard>
where
  Z: TimeZone,
  Z::Offset: Display
{
  let cards: Vec<EventCard> = state
    .events()
    .iter()
    .enumerate()
    .filter(|(_, event)| {
      is_visible(event, state, now, tz)
    })
    .map(|(idx, event)| EventCard {
      dom_id:   format!("event{}", idx + 1),
      category: event.filter.clone(),
      view:     format_event(
        event, tz, config
      )
    })
    .collect();

  debug!(
    total = state.events().len(),
    visible = cards.len(),
    filter = %state.current_filter(),
    show_past = state.show_past_events(),
    "rebuilt calendar"
  );
  cards
}
