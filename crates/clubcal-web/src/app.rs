use std::rc::Rc;

use chrono::{
  Local,
  Utc
};
use clubcal_core::event::Event as FeedEvent;
use clubcal_core::filter::categories;
use clubcal_core::render::rebuild;
use clubcal_core::{
  CalendarConfig,
  CalendarState,
  FilterOption
};
use gloo::console::log;
use yew::{
  AttrValue,
  Callback,
  Html,
  Properties,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_reducer
};

use crate::components::EventCardView;
use crate::controls::PageControls;
use crate::feed::fetch_feed;

#[derive(Properties, PartialEq)]
pub struct AppProps {
  pub feed_url: AttrValue,
  pub config:   Rc<CalendarConfig>
}

#[derive(Clone, Default, PartialEq)]
struct CalendarStore {
  state:   CalendarState,
  options: Vec<FilterOption>
}

enum CalendarAction {
  Loaded(Vec<FeedEvent>),
  SetFilter(String),
  ShowPast(bool)
}

impl CalendarStore {
  /// Applies one action in place and returns a short description for
  /// the debug log.
  fn apply(
    &mut self,
    action: CalendarAction
  ) -> (&'static str, String) {
    match action {
      | CalendarAction::Loaded(events) => {
        self.state.load(events);
        self.options =
          categories(self.state.events());
        (
          "feed.loaded",
          format!(
            "{} events, {} categories",
            self.state.events().len(),
            self.options.len()
          )
        )
      }
      | CalendarAction::SetFilter(
        filter
      ) => {
        self.state.set_filter(filter);
        (
          "filter.changed",
          self
            .state
            .current_filter()
            .to_string()
        )
      }
      | CalendarAction::ShowPast(show) => {
        self.state.set_show_past_events(
          show
        );
        (
          "past.toggled",
          (if show { "on" } else { "off" })
            .to_string()
        )
      }
    }
  }
}

impl Reducible for CalendarStore {
  type Action = CalendarAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    let (event, detail) = next.apply(action);
    ui_debug(event, &detail);
    Rc::new(next)
  }
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
  let store =
    use_reducer(CalendarStore::default);

  {
    let store = store.clone();
    use_effect_with(
      props.feed_url.clone(),
      move |feed_url| {
        let feed_url = feed_url.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            match fetch_feed(&feed_url)
              .await
            {
              | Ok(events) => {
                store.dispatch(
                  CalendarAction::Loaded(
                    events
                  )
                );
              }
              | Err(error) => {
                tracing::error!(
                  %error,
                  url = %feed_url,
                  "problem loading the events feed"
                );
              }
            }
          }
        );
        || ()
      }
    );
  }

  {
    use_effect_with((), move |_| {
      ui_debug(
        "app.mounted",
        "calendar widget mounted"
      );
      || ()
    });
  }

  {
    let store = store.clone();
    let dom = props.config.dom.clone();
    use_effect_with((), move |_| {
      let on_filter = {
        let store = store.clone();
        Callback::from(
          move |filter: String| {
            store.dispatch(
              CalendarAction::SetFilter(
                filter
              )
            );
          }
        )
      };
      let on_toggle_past =
        Callback::from(move |show: bool| {
          store.dispatch(
            CalendarAction::ShowPast(show)
          );
        });

      let listeners = PageControls::find(&dom)
        .bind(on_filter, on_toggle_past);
      move || drop(listeners)
    });
  }

  {
    let dom = props.config.dom.clone();
    use_effect_with(
      store.options.clone(),
      move |options| {
        PageControls::find(&dom)
          .append_options(options);
        || ()
      }
    );
  }

  let cards = rebuild(
    &store.state,
    Utc::now(),
    &Local,
    &props.config
  );

  html! {
      <>
          {
              for cards.into_iter().map(|card| {
                  let key = card.dom_id.clone();
                  html! {
                      <EventCardView {key} {card} />
                  }
              })
          }
      </>
  }
}

fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
