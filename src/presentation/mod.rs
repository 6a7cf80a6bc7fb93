// Presentation layer - Card rendering and HTTP handlers
pub mod app_state;
pub mod card_view;
pub mod charts;
pub mod handlers;
pub mod markup;
