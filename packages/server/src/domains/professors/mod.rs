//! Professors domain
//!
//! Professors are keyed by a code derived from their name. Deleting or
//! renaming a professor cascades onto the cubicles assigned to them.

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CreateProfessorInput, ProfessorFilter, UpdateProfessorInput};
pub use models::{Professor, ProfessorDetail, Shift};
