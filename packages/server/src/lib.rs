// Campus Directory - API Core
//
// Backend for the campus directory: staff authentication (password + TOTP),
// CRUD over events, cubicles and professors, and a realtime feed of every
// mutation.
//
// Business logic lives per-domain in domains/*; HTTP wiring in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
