use clubcal_core::config::CloudSettings;
use clubcal_core::{
  CalendarError,
  CalendarResult
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
  #[wasm_bindgen(
    js_namespace = klouds,
    js_name = create,
    catch
  )]
  fn klouds_create(
    options: &JsValue
  ) -> Result<JsValue, JsValue>;
}

/// Options object handed to `klouds.create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KloudsOptions<'a> {
  selector:     &'a str,
  layer_count:  u32,
  speed:        f64,
  cloud_color1: &'a str,
  cloud_color2: &'a str,
  bg_color:     &'a str
}

impl<'a> From<&'a CloudSettings>
  for KloudsOptions<'a>
{
  fn from(
    settings: &'a CloudSettings
  ) -> Self {
    Self {
      selector:     &settings.selector,
      layer_count:  settings.layer_count,
      speed:        settings.speed,
      cloud_color1: &settings
        .cloud_color_1,
      cloud_color2: &settings
        .cloud_color_2,
      bg_color:     &settings.bg_color
    }
  }
}

/// Starts the header cloud animation. Never fails loudly: a missing
/// canvas, no WebGL or a throwing library only get logged.
pub fn start(
  settings: &CloudSettings,
  container_id: &str
) {
  match try_start(settings, container_id)
  {
    | Ok(true) => {
      tracing::info!("cloud animation started");
    }
    | Ok(false) => {
      tracing::debug!(
        "cloud animation not requested"
      );
    }
    | Err(error) => {
      tracing::warn!(
        %error,
        "problem with animated clouds"
      );
    }
  }
}

fn try_start(
  settings: &CloudSettings,
  container_id: &str
) -> CalendarResult<bool> {
  if !settings.enabled {
    return Ok(false);
  }

  let has_container = web_sys::window()
    .and_then(|window| {
      window.document()
    })
    .and_then(|document| {
      document
        .get_element_by_id(container_id)
    })
    .is_some();
  if !has_container {
    return Ok(false);
  }

  if !webgl_supported() {
    return Err(
      CalendarError::AnimationUnavailable(
        "WebGL is not available".to_string()
      )
    );
  }

  let options =
    serde_wasm_bindgen::to_value(
      &KloudsOptions::from(settings)
    )
    .map_err(|err| {
      CalendarError::AnimationUnavailable(
        err.to_string()
      )
    })?;

  klouds_create(&options).map_err(
    |err| {
      CalendarError::AnimationUnavailable(
        format!("klouds.create threw: {err:?}")
      )
    }
  )?;
  Ok(true)
}

/// True when the browser exposes WebGL and a throwaway canvas hands
/// out a context.
pub fn webgl_supported() -> bool {
  let Some(window) = web_sys::window()
  else {
    return false;
  };

  let has_webgl = js_sys::Reflect::has(
    &window,
    &JsValue::from_str(
      "WebGLRenderingContext"
    )
  )
  .unwrap_or(false);
  if !has_webgl {
    return false;
  }

  let Some(canvas) = window
    .document()
    .and_then(|document| {
      document
        .create_element("canvas")
        .ok()
    })
    .and_then(|element| {
      element
        .dyn_into::<HtmlCanvasElement>()
        .ok()
    })
  else {
    return false;
  };

  ["webgl", "experimental-webgl"]
    .into_iter()
    .any(|kind| {
      matches!(
        canvas.get_context(kind),
        Ok(Some(_))
      )
    })
}

#[cfg(test)]
mod tests {
  use clubcal_core::config::CloudSettings;

  use super::KloudsOptions;

  #[test]
  fn options_use_library_key_names() {
    let settings = CloudSettings::default();
    let value = serde_json::to_value(
      KloudsOptions::from(&settings)
    )
    .expect("serialize options");

    assert_eq!(value["selector"], "#klouds");
    assert_eq!(value["layerCount"], 45);
    assert_eq!(value["speed"], 1.0);
    assert_eq!(
      value["cloudColor1"],
      "#c8dff0"
    );
    assert_eq!(
      value["cloudColor2"],
      "#ffffff"
    );
    assert_eq!(value["bgColor"], "#ddf0fe");
  }
}
