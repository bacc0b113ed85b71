//! Application services for project lifecycles and phase advancement.

mod advancement;
mod lifecycle;

pub use advancement::{
    AdvancementFailure, AdvancementReport, PhaseAdvancement, PhaseAdvancementService,
    ProjectCompletion,
};
pub use lifecycle::{
    ChangeProjectStatusRequest, CreateProjectRequest, ProjectLifecycleError,
    ProjectLifecycleResult, ProjectLifecycleService,
};
