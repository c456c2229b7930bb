//! Cubicle actions - entry-point business logic called from the HTTP routes

pub mod mutations;
pub mod queries;

pub use mutations::{create_cubicle, delete_cubicle, update_cubicle};
pub use queries::{available_cubicles, filter_cubicles, get_cubicle, list_cubicles};
