//! Events domain - map-pinned campus events with no relations

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CreateEventInput, UpdateEventInput};
pub use models::Event;
