//! Port contracts for lifecycle projects.

pub mod repository;

pub use repository::{
    PhaseCatalog, ProjectHistoryLog, ProjectRepository, ProjectRepositoryError,
    ProjectRepositoryResult, ProjectStore,
};
