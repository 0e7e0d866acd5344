use chrono::Local;
use clubcal_core::event::Event;
use clubcal_core::feed::prepare_feed;
use clubcal_core::{
  CalendarError,
  CalendarResult
};
use gloo::net::http::Request;

/// Downloads the events feed and returns it parsed and sorted, reading
/// offset-less starts in the browser's zone.
#[tracing::instrument]
pub async fn fetch_feed(
  url: &str
) -> CalendarResult<Vec<Event>> {
  let response = Request::get(url)
    .send()
    .await
    .map_err(|err| {
      CalendarError::unavailable(
        url,
        err.to_string()
      )
    })?;

  if !response.ok() {
    return Err(
      CalendarError::unavailable(
        url,
        format!(
          "HTTP {} {}",
          response.status(),
          response.status_text()
        )
      )
    );
  }

  let body =
    response.text().await.map_err(
      |err| {
        CalendarError::unavailable(
          url,
          err.to_string()
        )
      }
    )?;

  tracing::debug!(
    bytes = body.len(),
    "feed downloaded"
  );
  prepare_feed(&body, &Local)
}
