//! Identifier types for the task domain.

use crate::identifiers::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for a generated task.
    TaskId
}

uuid_identifier! {
    /// Unique identifier for a phase or job task template.
    TaskTemplateId
}

uuid_identifier! {
    /// Identifier of the operator who worked a task.
    OperatorId
}
