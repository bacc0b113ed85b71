//! In-memory adapters for task ports.

mod store;

pub use store::InMemoryTaskStore;
