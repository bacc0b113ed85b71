//! In-memory adapters for job ports.

mod job;

pub use job::InMemoryJobRepository;
