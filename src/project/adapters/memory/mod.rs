//! In-memory adapters for project ports.

mod store;

pub use store::InMemoryProjectStore;
