use clubcal_core::config::DomIds;
use clubcal_core::{
  CalendarError,
  FilterOption
};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{
  Document,
  HtmlInputElement,
  HtmlSelectElement
};
use yew::Callback;

/// The category select and past-events checkbox the page ships with.
/// Either may be missing; the calendar still renders without them.
pub struct PageControls {
  filter:      Option<HtmlSelectElement>,
  past_events: Option<HtmlInputElement>
}

impl PageControls {
  pub fn find(dom: &DomIds) -> Self {
    let document = web_sys::window()
      .and_then(|window| window.document());
    let Some(document) = document else {
      return Self {
        filter:      None,
        past_events: None
      };
    };

    Self {
      filter:      lookup(
        &document,
        &dom.filter_id
      ),
      past_events: lookup(
        &document,
        &dom.past_events_id
      )
    }
  }

  /// Appends one `<option>` per category after whatever the page put
  /// in the select.
  pub fn append_options(
    &self,
    options: &[FilterOption]
  ) {
    let Some(select) = &self.filter else {
      return;
    };
    let Some(document) = select.owner_document()
    else {
      return;
    };

    for option in options {
      let appended = document
        .create_element("option")
        .and_then(|element| {
          element.set_attribute(
            "value",
            &option.value
          )?;
          element.set_text_content(Some(
            &option.label
          ));
          select.append_child(&element)
        });
      if let Err(err) = appended {
        tracing::warn!(
          value = %option.value,
          error = ?err,
          "could not add filter option"
        );
      }
    }
  }

  /// Listens for `change` on both controls. Dropping the returned
  /// listeners detaches them.
  pub fn bind(
    &self,
    on_filter: Callback<String>,
    on_toggle_past: Callback<bool>
  ) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    if let Some(select) = &self.filter {
      let target = select.clone();
      listeners.push(EventListener::new(
        select,
        "change",
        move |_| {
          on_filter.emit(target.value());
        }
      ));
    }

    if let Some(input) = &self.past_events {
      let target = input.clone();
      listeners.push(EventListener::new(
        input,
        "change",
        move |_| {
          on_toggle_past
            .emit(target.checked());
        }
      ));
    }

    listeners
  }
}

fn lookup<T: JsCast>(
  document: &Document,
  id: &str
) -> Option<T> {
  let found = document
    .get_element_by_id(id)
    .and_then(|element| {
      element.dyn_into::<T>().ok()
    });
  if found.is_none() {
    tracing::warn!(
      error = %CalendarError::MissingElement(
        format!("#{id}")
      ),
      "page control not found"
    );
  }
  found
}
