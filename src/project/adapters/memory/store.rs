//! In-memory store for projects, templates, phases, and history.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{
        HistoryAction, HistoryEntry, HistoryEntryId, Phase, PhaseId, PhaseOrder, Project,
        ProjectId, Template, TemplateId,
    },
    ports::{
        PhaseCatalog, ProjectHistoryLog, ProjectRepository, ProjectRepositoryError,
        ProjectRepositoryResult,
    },
};

/// Thread-safe in-memory project store implementing every project port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, Project>,
    templates: HashMap<TemplateId, Template>,
    phases: HashMap<PhaseId, Phase>,
    history: Vec<HistoryEntry>,
}

impl InMemoryProjectStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InMemoryProjectState {
    fn phases_of(&self, template_id: TemplateId) -> impl Iterator<Item = &Phase> {
        self.phases
            .values()
            .filter(move |phase| phase.template_id() == template_id)
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectStore {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        *slot = project.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_active(&self) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut active: Vec<Project> = state
            .projects
            .values()
            .filter(|project| project.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|project| (project.started_at(), project.id()));
        Ok(active)
    }
}

#[async_trait]
impl PhaseCatalog for InMemoryProjectStore {
    async fn store_template(&self, template: &Template) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.templates.contains_key(&template.id()) {
            return Err(ProjectRepositoryError::DuplicateTemplate(template.id()));
        }
        state.templates.insert(template.id(), template.clone());
        Ok(())
    }

    async fn store_phase(&self, phase: &Phase) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let template_id = phase.template_id();
        if !state.templates.contains_key(&template_id) {
            return Err(ProjectRepositoryError::UnknownTemplate(template_id));
        }
        if state.phases.contains_key(&phase.id()) {
            return Err(ProjectRepositoryError::DuplicatePhase(phase.id()));
        }
        if state
            .phases_of(template_id)
            .any(|existing| existing.order() == phase.order())
        {
            return Err(ProjectRepositoryError::DuplicatePhaseOrder {
                template_id,
                order: phase.order(),
            });
        }
        state.phases.insert(phase.id(), phase.clone());
        Ok(())
    }

    async fn find_template(&self, id: TemplateId) -> ProjectRepositoryResult<Option<Template>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.templates.get(&id).cloned())
    }

    async fn find_phase(&self, id: PhaseId) -> ProjectRepositoryResult<Option<Phase>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.phases.get(&id).cloned())
    }

    async fn first_phase(&self, template_id: TemplateId) -> ProjectRepositoryResult<Option<Phase>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .phases_of(template_id)
            .min_by_key(|phase| phase.order())
            .cloned())
    }

    async fn next_phase(
        &self,
        template_id: TemplateId,
        after: PhaseOrder,
    ) -> ProjectRepositoryResult<Option<Phase>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .phases_of(template_id)
            .filter(|phase| phase.order() > after)
            .min_by_key(|phase| phase.order())
            .cloned())
    }
}

#[async_trait]
impl ProjectHistoryLog for InMemoryProjectStore {
    async fn append(&self, entry: &HistoryEntry) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let entry_id: HistoryEntryId = entry.id();
        if state.history.iter().any(|existing| existing.id() == entry_id) {
            return Err(ProjectRepositoryError::DuplicateHistoryEntry(entry_id));
        }
        state.history.push(entry.clone());
        Ok(())
    }

    async fn latest(
        &self,
        project_id: ProjectId,
        phase_id: PhaseId,
        action: HistoryAction,
    ) -> ProjectRepositoryResult<Option<HistoryEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        // Later appends win timestamp ties.
        Ok(state
            .history
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                entry.project_id() == project_id
                    && entry.phase_id() == Some(phase_id)
                    && entry.action() == action
            })
            .max_by_key(|(position, entry)| (entry.created_at(), *position))
            .map(|(_, entry)| entry.clone()))
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<Vec<HistoryEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut entries: Vec<(usize, HistoryEntry)> = state
            .history
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.project_id() == project_id)
            .map(|(position, entry)| (position, entry.clone()))
            .collect();
        entries.sort_by(|(left_pos, left), (right_pos, right)| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then(right_pos.cmp(left_pos))
        });
        Ok(entries.into_iter().map(|(_, entry)| entry).collect())
    }
}
