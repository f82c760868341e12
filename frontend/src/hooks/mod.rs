pub mod use_events;
pub mod use_in_view;

pub use use_events::use_events;
pub use use_in_view::{use_in_view, InViewOptions};
