//! In-memory store for generated tasks and task templates.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        GenerationKey, GenerationOwner, Task, TaskId, TaskTemplate, TaskTemplateId,
        TemplateParent,
    },
    ports::{
        TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskTemplateCatalog,
    },
};

/// Thread-safe in-memory task store implementing every task port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    claims: HashSet<GenerationKey>,
    templates: HashMap<TaskTemplateId, TaskTemplate>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn insert_generated(
        &self,
        key: &GenerationKey,
        tasks: &[Task],
    ) -> TaskRepositoryResult<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().map_err(lock_error)?;
        if state.claims.contains(key) {
            return Err(TaskRepositoryError::AlreadyGenerated(*key));
        }
        let mut batch_ids = HashSet::new();
        for task in tasks {
            if state.tasks.contains_key(&task.id()) || !batch_ids.insert(task.id()) {
                return Err(TaskRepositoryError::DuplicateTask(task.id()));
            }
        }

        state.claims.insert(*key);
        for task in tasks {
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            left.cmp_schedule(right)
                .then_with(|| left.id().cmp(&right.id()))
        });
        if let Some(limit) = filter.max_results() {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    async fn latest_due_date(
        &self,
        owner: GenerationOwner,
    ) -> TaskRepositoryResult<Option<NaiveDate>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.owner().generation_owner() == owner)
            .map(Task::due_date)
            .max())
    }
}

#[async_trait]
impl TaskTemplateCatalog for InMemoryTaskStore {
    async fn store_template(&self, template: &TaskTemplate) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.templates.contains_key(&template.id()) {
            return Err(TaskRepositoryError::DuplicateTemplate(template.id()));
        }
        state.templates.insert(template.id(), template.clone());
        Ok(())
    }

    async fn templates_for(
        &self,
        parent: TemplateParent,
    ) -> TaskRepositoryResult<Vec<TaskTemplate>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut templates: Vec<TaskTemplate> = state
            .templates
            .values()
            .filter(|template| template.parent() == parent)
            .cloned()
            .collect();
        templates.sort_by_key(|template| (template.order_index(), template.id()));
        Ok(templates)
    }
}
