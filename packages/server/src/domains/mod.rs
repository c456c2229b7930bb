// Business domains
pub mod assignments;
pub mod auth;
pub mod codes;
pub mod cubicles;
pub mod events;
pub mod professors;
