use std::sync::Arc;

use tracing::debug;

use crate::event::Event;

/// What the calendar widget is currently showing.
///
/// The event list is only ever swapped out as a whole; the filter key
/// and the past-events flag are the knobs user input turns. Cloning is
/// cheap because the events are shared.
#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct CalendarState {
  events:           Arc<[Event]>,
  loaded:           bool,
  current_filter:   String,
  show_past_events: bool
}

impl CalendarState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces the event list. Callers pass events already sorted by
  /// start.
  pub fn load(
    &mut self,
    events: Vec<Event>
  ) {
    debug!(
      count = events.len(),
      "replacing calendar events"
    );
    self.events = events.into();
    self.loaded = true;
  }

  pub fn events(&self) -> &[Event] {
    &self.events
  }

  pub fn is_loaded(&self) -> bool {
    self.loaded
  }

  pub fn current_filter(&self) -> &str {
    &self.current_filter
  }

  /// Empty means every category.
  pub fn set_filter(
    &mut self,
    filter: impl Into<String>
  ) {
    self.current_filter = filter.into();
    debug!(
      filter = %self.current_filter,
      "calendar filter changed"
    );
  }

  pub fn show_past_events(&self) -> bool {
    self.show_past_events
  }

  pub fn set_show_past_events(
    &mut self,
    show: bool
  ) {
    self.show_past_events = show;
    debug!(
      show_past_events = show,
      "past events toggle changed"
    );
  }

  pub fn with_filter(
    &self,
    filter: impl Into<String>
  ) -> Self {
    let mut next = self.clone();
    next.set_filter(filter);
    next
  }

  pub fn with_show_past_events(
    &self,
    show: bool
  ) -> Self {
    let mut next = self.clone();
    next.set_show_past_events(show);
    next
  }
}
