pub mod config;
pub mod datetime;
pub mod error;
pub mod event;
pub mod feed;
pub mod filter;
pub mod format;
pub mod render;
pub mod state;

pub use config::CalendarConfig;
pub use error::{
  CalendarError,
  CalendarResult
};
pub use event::Event;
pub use filter::FilterOption;
pub use format::EventView;
pub use render::EventCard;
pub use state::CalendarState;
