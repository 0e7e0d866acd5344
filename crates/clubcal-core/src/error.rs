//! Failure modes of the calendar pipeline.
//!
//! None of these are fatal for the web widget: each one is logged where
//! it happens and the affected area simply stays empty.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
  #[error(
    "feed unavailable at {source_url}: \
     {reason}"
  )]
  FeedUnavailable {
    source_url: String,
    reason:     String
  },

  #[error("feed is not an event list: {0}")]
  FeedMalformed(#[from] serde_json::Error),

  #[error("missing page element: {0}")]
  MissingElement(String),

  #[error("cloud animation unavailable: {0}")]
  AnimationUnavailable(String),

  #[error("configuration error: {0}")]
  Config(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error)
}

pub type CalendarResult<T> =
  Result<T, CalendarError>;

impl CalendarError {
  pub fn unavailable(
    source_url: &str,
    reason: impl Into<String>
  ) -> Self {
    Self::FeedUnavailable {
      source_url: source_url
        .to_string(),
      reason:     reason.into()
    }
  }
}
