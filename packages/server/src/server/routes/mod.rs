// HTTP routes
pub mod auth;
pub mod cubicles;
pub mod events;
pub mod health;
pub mod professors;
pub mod stream;

pub use auth::*;
pub use cubicles::*;
pub use events::*;
pub use health::*;
pub use professors::*;
pub use stream::*;
