pub mod events;
pub mod pad;
