//! Application services for task generation and progress tracking.

mod generation;
mod orchestrator;
mod progress;

pub use generation::{TaskGenerationError, TaskGenerationResult, TaskGenerationService};
pub use orchestrator::{DailyTaskOrchestrator, GenerationFailure, GenerationReport};
pub use progress::{
    TaskProgressError, TaskProgressResult, TaskProgressService, UpdateTaskStatusRequest,
};
