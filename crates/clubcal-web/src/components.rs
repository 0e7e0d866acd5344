use clubcal_core::datetime::DateBadge;
use clubcal_core::EventCard;
use yew::{
  AttrValue,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct EventCardViewProps {
  pub card: EventCard
}

/// One event. Class names match the site stylesheet: `title`, `when`,
/// `date` (with `month`, `day`, `dayofweek`, `year`), `where`, `what`.
#[function_component(EventCardView)]
pub fn event_card_view(
  props: &EventCardViewProps
) -> Html {
  let card = &props.card;
  let view = &card.view;
  let category =
    (!card.category.is_empty())
      .then(|| card.category.clone());

  html! {
      <div
          id={card.dom_id.clone()}
          class={classes!("event", category)}
      >
          <DateBadgeView badge={view.when.badge.clone()} />
          <b class="title">{ view.title.clone() }</b>
          <div class="when">{ view.when.text.clone() }</div>
          <div class="where">
              {
                  match &view.location_html {
                      | Some(markup) => Html::from_html_unchecked(
                          AttrValue::from(markup.clone())
                      ),
                      | None => html! {}
                  }
              }
          </div>
          <div class={classes!(
              "what",
              view.description_filled.then_some("filled")
          )}>
              {
                  Html::from_html_unchecked(
                      AttrValue::from(view.description_html.clone())
                  )
              }
          </div>
      </div>
  }
}

#[derive(Properties, PartialEq)]
struct DateBadgeViewProps {
  badge: Option<DateBadge>
}

#[function_component(DateBadgeView)]
fn date_badge_view(
  props: &DateBadgeViewProps
) -> Html {
  let Some(badge) = &props.badge else {
    return html! {
        <div class="date">
            <span class="month"></span>
            <span class="day"></span>
            <span class="dayofweek"></span>
            <span class="year"></span>
        </div>
    };
  };

  html! {
      <div class="date">
          <span class="month">{ badge.month.clone() }</span>
          <span class="day">{ badge.day }</span>
          <span class="dayofweek">{ badge.weekday.clone() }</span>
          <span class="year">{ badge.year }</span>
      </div>
  }
}
