//! Port contracts for generated tasks and task templates.

pub mod filter;
pub mod repository;

pub use filter::TaskFilter;
pub use repository::{
    TaskRepository, TaskRepositoryError, TaskRepositoryResult, TaskStore, TaskTemplateCatalog,
};
