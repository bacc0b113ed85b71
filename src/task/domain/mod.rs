//! Domain model for generated tasks and the templates they come from.
//!
//! A task belongs to exactly one owner, either a project (through a phase
//! task template) or a job (through a job task template). One generation
//! pass per owner and due date is tracked by a [`GenerationKey`].

mod error;
mod ids;
mod owner;
mod task;
mod template;
mod window;

pub use error::{ParseTaskStatusError, ParseTimeWindowError, TaskDomainError};
pub use ids::{OperatorId, TaskId, TaskTemplateId};
pub use owner::{GenerationKey, GenerationOwner, TaskOwner};
pub use task::{PersistedTaskData, Task, TaskStatus};
pub use template::{PersistedTaskTemplateData, TaskTemplate, TemplateParent};
pub use window::TimeWindow;
