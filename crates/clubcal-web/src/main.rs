mod app;
mod clouds;
mod components;
mod controls;
mod feed;

use std::rc::Rc;

use clubcal_core::{
  CalendarConfig,
  CalendarError,
  CalendarResult
};
use web_sys::Element;
use yew::AttrValue;

const CALENDAR_CONFIG_TOML: &str =
  include_str!("../assets/calendar.toml");

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting club calendar frontend"
  );

  let config =
    CalendarConfig::from_toml_or_default(
      CALENDAR_CONFIG_TOML
    );

  clouds::start(
    &config.clouds,
    &config.dom.clouds_id
  );

  match mount_point(&config) {
    | Ok((root, feed_url)) => {
      yew::Renderer::<app::App>::with_root_and_props(
        root,
        app::AppProps {
          feed_url,
          config: Rc::new(config)
        }
      )
      .render();
    }
    | Err(error) => {
      tracing::error!(%error, "calendar not mounted");
    }
  }
}

/// Finds the calendar container and the feed address on its
/// `data-src` attribute.
fn mount_point(
  config: &CalendarConfig
) -> CalendarResult<(Element, AttrValue)> {
  let container_id =
    config.dom.container_id.as_str();
  let root = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document
        .get_element_by_id(container_id)
    })
    .ok_or_else(|| {
      CalendarError::MissingElement(
        format!("#{container_id}")
      )
    })?;

  let feed_url = root
    .get_attribute("data-src")
    .filter(|src| !src.trim().is_empty())
    .ok_or_else(|| {
      CalendarError::MissingElement(
        format!(
          "data-src on #{container_id}"
        )
      )
    })?;

  Ok((root, AttrValue::from(feed_url)))
}
