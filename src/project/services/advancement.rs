//! Time-based phase advancement across active projects.

use super::{ProjectLifecycleError, ProjectLifecycleResult};
use crate::project::{
    domain::{
        HistoryAction, HistoryEntry, Phase, PhaseId, Project, ProjectId, ProjectStatus,
        whole_days_between,
    },
    ports::ProjectStore,
};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A project moved from one phase to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAdvancement {
    /// Advanced project.
    pub project_id: ProjectId,
    /// Phase the project left.
    pub from_phase: PhaseId,
    /// Phase the project entered.
    pub to_phase: PhaseId,
}

/// A project that finished its last phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectCompletion {
    /// Completed project.
    pub project_id: ProjectId,
    /// Last phase of the template.
    pub final_phase: PhaseId,
}

/// A project whose advancement check failed.
#[derive(Debug)]
pub struct AdvancementFailure {
    /// Project being checked.
    pub project_id: ProjectId,
    /// Failure cause.
    pub error: ProjectLifecycleError,
}

/// Outcome of one advancement sweep.
#[derive(Debug, Default)]
pub struct AdvancementReport {
    /// Projects moved to their next phase.
    pub advanced: Vec<PhaseAdvancement>,
    /// Projects completed because no phase was left.
    pub completed: Vec<ProjectCompletion>,
    /// Projects whose check failed; the rest of the sweep still ran.
    pub failures: Vec<AdvancementFailure>,
}

enum Outcome {
    NotDue,
    Advanced(PhaseAdvancement),
    Completed(ProjectCompletion),
}

/// Moves projects whose current phase outlived its duration.
#[derive(Clone)]
pub struct PhaseAdvancementService<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> PhaseAdvancementService<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a new advancement service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Checks every active project and advances or completes the due ones.
    ///
    /// A project is due once the whole days since its current phase started
    /// reach the phase duration. Phases without a duration never advance
    /// here. Failures are isolated per project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectLifecycleError::Repository`] when active projects
    /// cannot be listed.
    pub async fn check_and_advance_phases(&self) -> ProjectLifecycleResult<AdvancementReport> {
        let projects = self.store.list_active().await?;
        let mut report = AdvancementReport::default();

        for project in projects {
            let project_id = project.id();
            match self.advance_if_due(project).await {
                Ok(Outcome::NotDue) => {}
                Ok(Outcome::Advanced(advancement)) => report.advanced.push(advancement),
                Ok(Outcome::Completed(completion)) => report.completed.push(completion),
                Err(error) => {
                    warn!(project_id = %project_id, error = %error, "phase advancement failed");
                    report.failures.push(AdvancementFailure { project_id, error });
                }
            }
        }

        info!(
            advanced = report.advanced.len(),
            completed = report.completed.len(),
            failed = report.failures.len(),
            "phase advancement sweep finished"
        );
        Ok(report)
    }

    async fn advance_if_due(&self, mut project: Project) -> ProjectLifecycleResult<Outcome> {
        let project_id = project.id();
        let Some(phase_id) = project.current_phase_id() else {
            return Ok(Outcome::NotDue);
        };
        let Some(phase) = self.store.find_phase(phase_id).await? else {
            debug!(project_id = %project_id, phase_id = %phase_id, "current phase missing");
            return Ok(Outcome::NotDue);
        };
        let Some(duration_days) = phase.auto_advance_after_days() else {
            return Ok(Outcome::NotDue);
        };

        let phase_started_at = self
            .store
            .latest(project_id, phase_id, HistoryAction::PhaseStarted)
            .await?
            .map_or_else(|| project.started_at(), |entry| entry.created_at());
        let days_in_phase = whole_days_between(phase_started_at, self.clock.utc());
        if days_in_phase < i64::from(duration_days) {
            return Ok(Outcome::NotDue);
        }

        match self
            .store
            .next_phase(phase.template_id(), phase.order())
            .await?
        {
            Some(next) => self
                .advance(&mut project, &phase, &next, days_in_phase)
                .await
                .map(Outcome::Advanced),
            None => self
                .complete(&mut project, &phase)
                .await
                .map(Outcome::Completed),
        }
    }

    async fn advance(
        &self,
        project: &mut Project,
        from: &Phase,
        to: &Phase,
        days_in_phase: i64,
    ) -> ProjectLifecycleResult<PhaseAdvancement> {
        // History goes first: the next phase's start must exist before the
        // project points at it.
        self.record(
            project.id(),
            Some(from.id()),
            HistoryAction::PhaseCompleted,
            json!({ "days_in_phase": days_in_phase, "auto_advanced": true }),
        )
        .await?;
        self.record(
            project.id(),
            Some(to.id()),
            HistoryAction::PhaseStarted,
            json!({ "auto_advanced": true }),
        )
        .await?;

        project.enter_phase(to.id(), &*self.clock);
        self.store.update(project).await?;

        info!(
            project_id = %project.id(),
            from_phase = from.name(),
            to_phase = to.name(),
            days_in_phase,
            "project advanced to next phase"
        );
        Ok(PhaseAdvancement {
            project_id: project.id(),
            from_phase: from.id(),
            to_phase: to.id(),
        })
    }

    async fn complete(
        &self,
        project: &mut Project,
        last: &Phase,
    ) -> ProjectLifecycleResult<ProjectCompletion> {
        project.transition_to(ProjectStatus::Completed, &*self.clock)?;
        self.record(
            project.id(),
            None,
            HistoryAction::ProjectCompleted,
            json!({ "auto_completed": true }),
        )
        .await?;
        self.store.update(project).await?;

        info!(project_id = %project.id(), "project completed after final phase");
        Ok(ProjectCompletion {
            project_id: project.id(),
            final_phase: last.id(),
        })
    }

    async fn record(
        &self,
        project_id: ProjectId,
        phase_id: Option<PhaseId>,
        action: HistoryAction,
        metadata: serde_json::Value,
    ) -> ProjectLifecycleResult<()> {
        let entry = HistoryEntry::record(project_id, phase_id, action, metadata, &*self.clock);
        self.store.append(&entry).await?;
        Ok(())
    }
}
