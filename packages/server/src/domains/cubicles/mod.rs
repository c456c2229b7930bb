//! Cubicles domain
//!
//! Cubicles are keyed by a composite of building, number and floor and may
//! be assigned to at most one professor.

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CreateCubicleInput, CubicleFilter, UpdateCubicleInput};
pub use models::{Cubicle, CubicleDetail, CubicleSummary};
