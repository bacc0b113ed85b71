//! Port contracts for recurring jobs.

pub mod repository;

pub use repository::{JobRepository, JobRepositoryError, JobRepositoryResult};
