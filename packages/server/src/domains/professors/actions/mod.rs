//! Professor actions - entry-point business logic called from the HTTP routes

pub mod mutations;
pub mod queries;

pub use mutations::{create_professor, delete_professor, update_professor};
pub use queries::{filter_professors, get_professor, list_professors, professors_without_cubicle};
