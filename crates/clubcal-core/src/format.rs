use std::fmt::Display;
use std::sync::OnceLock;

use chrono::TimeZone;
use regex::Regex;
use serde::Serialize;

use crate::config::{
  CalendarConfig,
  Venue
};
use crate::datetime::{
  DateRange,
  format_date_range
};
use crate::event::Event;

/// Everything one event card shows, already formatted.
///
/// `location_html` and `description_html` are markup taken from the
/// feed and are meant to be inserted as-is.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct EventView {
  pub title:              String,
  pub when:               DateRange,
  pub location_html:      Option<String>,
  pub description_html:   String,
  pub description_filled: bool
}

#[tracing::instrument(skip_all)]
pub fn format_event<Z>(
  event: &Event,
  tz: &Z,
  config: &CalendarConfig
) -> EventView
where
  Z: TimeZone,
  Z::Offset: Display
{
  let title = event
    .summary
    .as_deref()
    .filter(|summary| !summary.is_empty())
    .unwrap_or(
      config.labels.no_title.as_str()
    )
    .to_string();

  let when = format_date_range(
    event.start.as_deref(),
    event.end.as_deref(),
    tz,
    &config.labels
  );

  let description_html =
    clean_description(
      event
        .description
        .as_deref()
        .unwrap_or_default()
    );
  let description_filled =
    !description_html.is_empty();

  let location_html = event
    .location
    .as_deref()
    .filter(|location| !location.is_empty())
    .map(|location| {
      format!(
        "{}{}",
        config.labels.location_prefix,
        link_venues(
          location,
          &config.venues
        )
      )
    });

  EventView {
    title,
    when,
    location_html,
    description_html,
    description_filled
  }
}

/// Strips the `+++ … +++` front matter the chat bot embeds, then any
/// leading `<br>` run, then surrounding whitespace.
pub fn clean_description(
  raw: &str
) -> String {
  let without_meta =
    match front_matter_re() {
      | Some(re) => {
        re.replace_all(raw, "")
          .into_owned()
      }
      | None => raw.to_string()
    };

  let without_breaks =
    match leading_breaks_re() {
      | Some(re) => re
        .replace(&without_meta, "")
        .into_owned(),
      | None => without_meta
    };

  without_breaks.trim().to_string()
}

/// Links the first occurrence of each venue name. Matching is plain
/// substring matching, so it also fires inside longer words.
pub fn link_venues(
  location: &str,
  venues: &[Venue]
) -> String {
  venues.iter().fold(
    location.to_string(),
    |text, venue| {
      text.replacen(
        &venue.name,
        &format!(
          "<a href=\"{}\">{}</a>",
          venue.href, venue.name
        ),
        1
      )
    }
  )
}

fn front_matter_re()
-> Option<&'static Regex> {
  static RE: OnceLock<Option<Regex>> =
    OnceLock::new();
  RE.get_or_init(|| {
    compile(r"\+\+\+[\s\S]*?\+\+\+")
  })
  .as_ref()
}

fn leading_breaks_re()
-> Option<&'static Regex> {
  static RE: OnceLock<Option<Regex>> =
    OnceLock::new();
  RE.get_or_init(|| {
    compile(r"(?i)^(?:<br\s*/?>\s*)+")
  })
  .as_ref()
}

fn compile(
  pattern: &str
) -> Option<Regex> {
  match Regex::new(pattern) {
    | Ok(re) => Some(re),
    | Err(error) => {
      tracing::error!(
        pattern,
        %error,
        "internal regex compile failure"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::FixedOffset;

  use super::{
    clean_description,
    format_event,
    link_venues
  };
  use crate::config::CalendarConfig;
  use crate::event::Event;

  fn pacific() -> FixedOffset {
    FixedOffset::west_opt(7 * 3600)
      .expect("valid offset")
  }

  #[test]
  fn strips_front_matter_and_leading_breaks(
  ) {
    assert_eq!(
      clean_description("+++meta+++Hello"),
      "Hello"
    );
    assert_eq!(
      clean_description(
        "+++\nbot: chronicle\nid: 7\n+++<br><BR />  <br/>Bring a \
         radio<br>and snacks "
      ),
      "Bring a radio<br>and snacks"
    );
    assert_eq!(
      clean_description(
        "a +++x+++ b +++y+++ c"
      ),
      "a  b  c"
    );
    assert_eq!(
      clean_description("   "),
      ""
    );
  }

  #[test]
  fn links_known_venues_once() {
    let config =
      CalendarConfig::default();
    let linked = link_venues(
      "Poway Field, then Poway Field \
       again",
      &config.venues
    );
    assert_eq!(
      linked,
      "<a href=\"/poway-field.html\">Poway \
       Field</a>, then Poway Field again"
    );

    let inside_word = link_venues(
      "NotEncinitas Fields",
      &config.venues
    );
    assert!(inside_word.contains(
      "<a href=\"/encinitas-field.html\">"
    ));
  }

  #[test]
  fn formats_full_event() {
    let event = Event {
      summary:      Some(
        "Race".to_string()
      ),
      start:        Some(
        "2025-07-12T08:30:00-07:00"
          .to_string()
      ),
      end:          Some(
        "2025-07-12T14:00:00-07:00"
          .to_string()
      ),
      description:  Some(
        "+++meta+++Pylon racing"
          .to_string()
      ),
      location:     Some(
        "Torrey Pines Gliderport"
          .to_string()
      ),
      filter:       "racing".to_string(),
      filter_title: "Racing".to_string()
    };

    let view = format_event(
      &event,
      &pacific(),
      &CalendarConfig::default()
    );
    assert_eq!(view.title, "Race");
    assert_eq!(
      view.when.text,
      "July 12, 2025 8:30 am to 2:00 pm"
    );
    assert_eq!(
      view.description_html,
      "Pylon racing"
    );
    assert!(view.description_filled);
    assert_eq!(
      view.location_html.as_deref(),
      Some(
        "Location: <a \
         href=\"/torrey-pines-glider-port.\
         html\">Torrey Pines Gliderport</a>"
      )
    );
  }

  #[test]
  fn placeholders_for_missing_fields() {
    let event = Event {
      summary: Some(String::new()),
      location: Some(String::new()),
      ..Event::default()
    };
    let view = format_event(
      &event,
      &pacific(),
      &CalendarConfig::default()
    );
    assert_eq!(view.title, "No title");
    assert_eq!(view.when.text, "No date");
    assert!(view.location_html.is_none());
    assert!(!view.description_filled);
  }
}
