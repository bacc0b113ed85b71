//! Query filter for task listings.

use crate::task::domain::{GenerationOwner, Task, TaskStatus, TimeWindow};
use chrono::NaiveDate;

/// Criteria a task must meet to be listed. Unset criteria match every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    owner: Option<GenerationOwner>,
    due_date: Option<NaiveDate>,
    status: Option<TaskStatus>,
    time_window: Option<TimeWindow>,
    limit: Option<usize>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to one owner.
    #[must_use]
    pub const fn for_owner(mut self, owner: GenerationOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Restricts the listing to one due date.
    #[must_use]
    pub const fn due_on(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the listing to one time window.
    #[must_use]
    pub const fn in_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = Some(time_window);
        self
    }

    /// Caps the number of tasks returned.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the owner criterion.
    #[must_use]
    pub const fn owner(&self) -> Option<GenerationOwner> {
        self.owner
    }

    /// Returns the due date criterion.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the status criterion.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the time window criterion.
    #[must_use]
    pub const fn time_window(&self) -> Option<TimeWindow> {
        self.time_window
    }

    /// Returns the result cap.
    #[must_use]
    pub const fn max_results(&self) -> Option<usize> {
        self.limit
    }

    /// Returns `true` when `task` meets every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.owner
            .is_none_or(|owner| task.owner().generation_owner() == owner)
            && self.due_date.is_none_or(|date| task.due_date() == date)
            && self.status.is_none_or(|status| task.status() == status)
            && self
                .time_window
                .is_none_or(|window| task.time_window() == Some(window))
    }
}
