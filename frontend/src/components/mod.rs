pub mod event_card;
pub mod event_modal;
pub mod events;
pub mod toast;
