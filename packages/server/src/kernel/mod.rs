//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod locks;
pub mod memory_store;
pub mod notifier;
pub mod postgres_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{connect_store, ServerDeps};
pub use locks::KeyedLocks;
pub use memory_store::MemoryDocumentStore;
pub use notifier::{Notification, Notifier};
pub use postgres_store::PostgresDocumentStore;
pub use test_dependencies::{test_server_deps, FailingDocumentStore};
pub use traits::*;
