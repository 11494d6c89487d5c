pub mod app;
pub mod events;
pub mod layout;
pub mod render;
pub mod terminal;
