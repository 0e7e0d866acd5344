use std::collections::HashSet;

use serde::Serialize;

use crate::event::Event;

/// One entry of the category selector.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct FilterOption {
  pub value: String,
  pub label: String
}

/// Distinct categories in the order they first appear. The label comes
/// from the first event carrying the key. No "all" entry is produced,
/// and uncategorized events add nothing: the page's empty-value option
/// already shows them.
pub fn categories(
  events: &[Event]
) -> Vec<FilterOption> {
  let mut seen = HashSet::new();
  let mut options = Vec::new();
  for event in events {
    if event.filter.is_empty() {
      continue;
    }
    if seen.insert(event.filter.as_str()) {
      options.push(FilterOption {
        value: event.filter.clone(),
        label: event.filter_title.clone()
      });
    }
  }
  options
}
