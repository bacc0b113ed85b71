//! Identifier and ordering types for the project domain.

use crate::identifiers::uuid_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_identifier! {
    /// Unique identifier for a lifecycle project.
    ProjectId
}

uuid_identifier! {
    /// Unique identifier for a lifecycle or job template.
    TemplateId
}

uuid_identifier! {
    /// Unique identifier for a template phase.
    PhaseId
}

uuid_identifier! {
    /// Unique identifier for a project history entry.
    HistoryEntryId
}

/// Position of a phase within its template.
///
/// Values are unique per template and totally ordered; gaps are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseOrder(i32);

impl PhaseOrder {
    /// Creates a phase order from its index.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PhaseOrder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
