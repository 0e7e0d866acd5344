use std::fs;
use std::path::Path;

use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

use crate::error::{
  CalendarError,
  CalendarResult
};

#[derive(
  Debug,
  Clone,
  PartialEq,
  Deserialize,
  Serialize,
)]
pub struct CalendarConfig {
  #[serde(default)]
  pub timezone: Option<String>,
  #[serde(default)]
  pub labels:   Labels,
  #[serde(default = "default_venues")]
  pub venues:   Vec<Venue>,
  #[serde(default)]
  pub clouds:   CloudSettings,
  #[serde(default)]
  pub dom:      DomIds
}

/// Fixed strings shown by the widget.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Deserialize,
  Serialize,
)]
#[serde(default)]
pub struct Labels {
  pub no_title:        String,
  pub no_date:         String,
  pub invalid_date:    String,
  pub location_prefix: String
}

/// A venue name that gets linked to its page wherever it shows up in
/// an event location.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Deserialize,
  Serialize,
)]
pub struct Venue {
  pub name: String,
  pub href: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Deserialize,
  Serialize,
)]
#[serde(default)]
pub struct CloudSettings {
  pub enabled:       bool,
  pub selector:      String,
  pub layer_count:   u32,
  pub speed:         f64,
  pub cloud_color_1: String,
  pub cloud_color_2: String,
  pub bg_color:      String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Deserialize,
  Serialize,
)]
#[serde(default)]
pub struct DomIds {
  pub container_id:   String,
  pub clouds_id:      String,
  /// Category `<select>` supplied by the page, empty "all" option
  /// included.
  pub filter_id:      String,
  pub past_events_id: String
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      timezone: None,
      labels:   Labels::default(),
      venues:   default_venues(),
      clouds:   CloudSettings::default(),
      dom:      DomIds::default()
    }
  }
}

impl Default for Labels {
  fn default() -> Self {
    Self {
      no_title:        "No title"
        .to_string(),
      no_date:         "No date"
        .to_string(),
      invalid_date:    "Invalid date"
        .to_string(),
      location_prefix: "Location: "
        .to_string()
    }
  }
}

impl Default for CloudSettings {
  fn default() -> Self {
    Self {
      enabled:       true,
      selector:      "#klouds".to_string(),
      layer_count:   45,
      speed:         1.0,
      cloud_color_1: "#c8dff0".to_string(),
      cloud_color_2: "#ffffff".to_string(),
      bg_color:      "#ddf0fe".to_string()
    }
  }
}

impl Default for DomIds {
  fn default() -> Self {
    Self {
      container_id:   "calendar".to_string(),
      clouds_id:      "klouds".to_string(),
      filter_id:      "filter".to_string(),
      past_events_id: "past-events"
        .to_string()
    }
  }
}

fn default_venues() -> Vec<Venue> {
  [
    ("Poway Field", "/poway-field.html"),
    (
      "Torrey Pines Gliderport",
      "/torrey-pines-glider-port.html"
    ),
    (
      "Encinitas Field",
      "/encinitas-field.html"
    )
  ]
  .into_iter()
  .map(|(name, href)| Venue {
    name: name.to_string(),
    href: href.to_string()
  })
  .collect()
}

impl CalendarConfig {
  pub fn from_toml_str(
    raw: &str
  ) -> CalendarResult<Self> {
    let mut config =
      toml::from_str::<Self>(raw)
        .map_err(|err| {
          CalendarError::Config(
            err.to_string()
          )
        })?;
    config.sanitize();
    Ok(config)
  }

  #[tracing::instrument]
  pub fn load(
    path: &Path
  ) -> CalendarResult<Self> {
    info!(
      file = %path.display(),
      "loading calendar config"
    );
    let raw = fs::read_to_string(path)?;
    Self::from_toml_str(&raw)
  }

  /// Parses embedded config text, falling back to defaults when it is
  /// broken.
  pub fn from_toml_or_default(
    raw: &str
  ) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(config) => {
        info!(
          venues = config.venues.len(),
          clouds = config.clouds.enabled,
          "loaded calendar config"
        );
        config
      }
      | Err(error) => {
        tracing::error!(
          %error,
          "failed parsing calendar config; \
           using defaults"
        );
        Self::default()
      }
    }
  }

  fn sanitize(&mut self) {
    let defaults = Labels::default();
    let labels = &mut self.labels;
    restore_blank(
      &mut labels.no_title,
      &defaults.no_title
    );
    restore_blank(
      &mut labels.no_date,
      &defaults.no_date
    );
    restore_blank(
      &mut labels.invalid_date,
      &defaults.invalid_date
    );
    restore_blank(
      &mut labels.location_prefix,
      &defaults.location_prefix
    );

    let before = self.venues.len();
    self.venues.retain(|venue| {
      !venue.name.trim().is_empty()
        && !venue.href.trim().is_empty()
    });
    if self.venues.len() != before {
      warn!(
        dropped =
          before - self.venues.len(),
        "ignoring venues without a name \
         or link"
      );
    }

    let dom_defaults = DomIds::default();
    restore_blank(
      &mut self.dom.container_id,
      &dom_defaults.container_id
    );
    restore_blank(
      &mut self.dom.clouds_id,
      &dom_defaults.clouds_id
    );
    restore_blank(
      &mut self.dom.filter_id,
      &dom_defaults.filter_id
    );
    restore_blank(
      &mut self.dom.past_events_id,
      &dom_defaults.past_events_id
    );

    if self.clouds.layer_count == 0 {
      self.clouds.layer_count =
        CloudSettings::default()
          .layer_count;
    }
    if self
      .clouds
      .selector
      .trim()
      .is_empty()
    {
      self.clouds.selector =
        format!("#{}", self.dom.clouds_id);
    }

    if self
      .timezone
      .as_deref()
      .is_some_and(|tz| tz.trim().is_empty())
    {
      self.timezone = None;
    }

    debug!(?self.dom, "sanitized calendar config");
  }
}

fn restore_blank(
  value: &mut String,
  fallback: &str
) {
  if value.trim().is_empty() {
    *value = fallback.to_string();
  }
}

#[cfg(test)]
mod tests {
  use super::CalendarConfig;

  #[test]
  fn empty_document_yields_defaults() {
    let config =
      CalendarConfig::from_toml_str("")
        .expect("parse empty config");
    assert_eq!(
      config,
      CalendarConfig::default()
    );
    assert_eq!(config.venues.len(), 3);
    assert_eq!(
      config.clouds.layer_count,
      45
    );
  }

  #[test]
  fn blank_labels_fall_back_and_venues_override(
  ) {
    let config =
      CalendarConfig::from_toml_str(
        r#"
timezone = "  "

[labels]
no_title = ""
location_prefix = "Where: "

[dom]
filter_id = "category"
past_events_id = " "

[[venues]]
name = "Lake Hodges"
href = "/lake-hodges.html"

[[venues]]
name = ""
href = "/nowhere.html"
"#
      )
      .expect("parse config");

    assert_eq!(
      config.labels.no_title,
      "No title"
    );
    assert_eq!(
      config.labels.location_prefix,
      "Where: "
    );
    assert_eq!(
      config.dom.filter_id,
      "category"
    );
    assert_eq!(
      config.dom.past_events_id,
      "past-events"
    );
    assert_eq!(config.venues.len(), 1);
    assert_eq!(
      config.venues[0].href,
      "/lake-hodges.html"
    );
    assert!(config.timezone.is_none());
  }

  #[test]
  fn invalid_toml_falls_back_to_defaults(
  ) {
    assert!(
      CalendarConfig::from_toml_str(
        "labels = 3"
      )
      .is_err()
    );
    assert_eq!(
      CalendarConfig::from_toml_or_default(
        "labels = 3"
      ),
      CalendarConfig::default()
    );
  }
}
