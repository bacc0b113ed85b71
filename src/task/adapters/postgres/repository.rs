//! `PostgreSQL` store implementing the task ports.

use super::{
    models::{JobTaskRow, NewGenerationRow, PhaseTaskRow, TaskRow},
    schema::{job_tasks, phase_tasks, task_generations, tasks},
};
use crate::job::domain::JobId;
use crate::project::domain::{PhaseId, ProjectId};
use crate::task::{
    domain::{
        GenerationKey, GenerationOwner, OperatorId, PersistedTaskData, PersistedTaskTemplateData,
        Task, TaskId, TaskOwner, TaskStatus, TaskTemplate, TaskTemplateId, TemplateParent,
        TimeWindow,
    },
    ports::{
        TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        TaskTemplateCatalog,
    },
};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::max;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn insert_generated(
        &self,
        key: &GenerationKey,
        batch: &[Task],
    ) -> TaskRepositoryResult<()> {
        let Some(claim) = generation_claim(key, batch) else {
            return Ok(());
        };
        let claimed_key = *key;
        let rows: Vec<TaskRow> = batch.iter().map(to_task_row).collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                diesel::insert_into(task_generations::table)
                    .values(&claim)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::AlreadyGenerated(claimed_key)
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(tasks::table)
                    .values(&rows)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            rows.first().map_or_else(
                                || TaskRepositoryError::persistence(err),
                                |row| TaskRepositoryError::DuplicateTask(TaskId::from_uuid(row.id)),
                            )
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_task_row(task);

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(tasks::table.filter(tasks::id.eq(row.id)))
                .set((
                    tasks::title.eq(&row.title),
                    tasks::description.eq(&row.description),
                    tasks::time_window.eq(&row.time_window),
                    tasks::scheduled_time.eq(row.scheduled_time),
                    tasks::status.eq(&row.status),
                    tasks::completion_notes.eq(&row.completion_notes),
                    tasks::completed_at.eq(row.completed_at),
                    tasks::completed_by.eq(row.completed_by),
                    tasks::updated_at.eq(row.updated_at),
                ))
                .execute(connection)?;

            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let criteria = *filter;
        let limit = criteria
            .max_results()
            .map(i64::try_from)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            query = match criteria.owner() {
                Some(GenerationOwner::Project(project_id)) => {
                    query.filter(tasks::project_id.eq(project_id.into_inner()))
                }
                Some(GenerationOwner::Job(job_id)) => {
                    query.filter(tasks::job_id.eq(job_id.into_inner()))
                }
                None => query,
            };
            if let Some(due_date) = criteria.due_date() {
                query = query.filter(tasks::due_date.eq(due_date));
            }
            if let Some(status) = criteria.status() {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(window) = criteria.time_window() {
                query = query.filter(tasks::time_window.eq(window.as_str()));
            }
            if let Some(max_rows) = limit {
                query = query.limit(max_rows);
            }

            let rows = query
                .order((
                    tasks::due_date.asc(),
                    tasks::scheduled_time.asc().nulls_last(),
                    tasks::sequence.asc(),
                    tasks::id.asc(),
                ))
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn latest_due_date(
        &self,
        owner: GenerationOwner,
    ) -> TaskRepositoryResult<Option<NaiveDate>> {
        self.run_blocking(move |connection| {
            let latest = match owner {
                GenerationOwner::Project(project_id) => tasks::table
                    .filter(tasks::project_id.eq(project_id.into_inner()))
                    .select(max(tasks::due_date))
                    .first::<Option<NaiveDate>>(connection)?,
                GenerationOwner::Job(job_id) => tasks::table
                    .filter(tasks::job_id.eq(job_id.into_inner()))
                    .select(max(tasks::due_date))
                    .first::<Option<NaiveDate>>(connection)?,
            };
            Ok(latest)
        })
        .await
    }
}

#[async_trait]
impl TaskTemplateCatalog for PostgresTaskStore {
    async fn store_template(&self, template: &TaskTemplate) -> TaskRepositoryResult<()> {
        let template_id = template.id();
        let duplicate = move |err: DieselError| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                TaskRepositoryError::DuplicateTemplate(template_id)
            }
            _ => TaskRepositoryError::persistence(err),
        };

        match template.parent() {
            TemplateParent::Phase(phase_id) => {
                let row = PhaseTaskRow {
                    id: template_id.into_inner(),
                    phase_id: phase_id.into_inner(),
                    title: template.title().to_owned(),
                    description: template.description().map(str::to_owned),
                    time_window: template.time_window().map(|window| window.as_str().to_owned()),
                    scheduled_time: template.scheduled_time(),
                    order_index: template.order_index(),
                };
                self.run_blocking(move |connection| {
                    diesel::insert_into(phase_tasks::table)
                        .values(&row)
                        .execute(connection)
                        .map_err(duplicate)?;
                    Ok(())
                })
                .await
            }
            TemplateParent::Job(job_id) => {
                let row = JobTaskRow {
                    id: template_id.into_inner(),
                    job_id: job_id.into_inner(),
                    title: template.title().to_owned(),
                    description: template.description().map(str::to_owned),
                    time_window: template.time_window().map(|window| window.as_str().to_owned()),
                    scheduled_time: template.scheduled_time(),
                    order_index: template.order_index(),
                };
                self.run_blocking(move |connection| {
                    diesel::insert_into(job_tasks::table)
                        .values(&row)
                        .execute(connection)
                        .map_err(duplicate)?;
                    Ok(())
                })
                .await
            }
        }
    }

    async fn templates_for(
        &self,
        parent: TemplateParent,
    ) -> TaskRepositoryResult<Vec<TaskTemplate>> {
        self.run_blocking(move |connection| match parent {
            TemplateParent::Phase(phase_id) => {
                let rows = phase_tasks::table
                    .filter(phase_tasks::phase_id.eq(phase_id.into_inner()))
                    .order((phase_tasks::order_index.asc(), phase_tasks::id.asc()))
                    .select(PhaseTaskRow::as_select())
                    .load::<PhaseTaskRow>(connection)?;
                rows.into_iter()
                    .map(|row| {
                        template_from_parts(TemplateRowParts {
                            id: row.id,
                            parent: TemplateParent::Phase(PhaseId::from_uuid(row.phase_id)),
                            title: row.title,
                            description: row.description,
                            time_window: row.time_window,
                            scheduled_time: row.scheduled_time,
                            order_index: row.order_index,
                        })
                    })
                    .collect()
            }
            TemplateParent::Job(job_id) => {
                let rows = job_tasks::table
                    .filter(job_tasks::job_id.eq(job_id.into_inner()))
                    .order((job_tasks::order_index.asc(), job_tasks::id.asc()))
                    .select(JobTaskRow::as_select())
                    .load::<JobTaskRow>(connection)?;
                rows.into_iter()
                    .map(|row| {
                        template_from_parts(TemplateRowParts {
                            id: row.id,
                            parent: TemplateParent::Job(JobId::from_uuid(row.job_id)),
                            title: row.title,
                            description: row.description,
                            time_window: row.time_window,
                            scheduled_time: row.scheduled_time,
                            order_index: row.order_index,
                        })
                    })
                    .collect()
            }
        })
        .await
    }
}

struct TemplateRowParts {
    id: uuid::Uuid,
    parent: TemplateParent,
    title: String,
    description: Option<String>,
    time_window: Option<String>,
    scheduled_time: Option<chrono::NaiveTime>,
    order_index: i32,
}

fn template_from_parts(parts: TemplateRowParts) -> TaskRepositoryResult<TaskTemplate> {
    Ok(TaskTemplate::from_persisted(PersistedTaskTemplateData {
        id: TaskTemplateId::from_uuid(parts.id),
        parent: parts.parent,
        title: parts.title,
        description: parts.description,
        time_window: parse_window(parts.time_window.as_deref())?,
        scheduled_time: parts.scheduled_time,
        order_index: parts.order_index,
    }))
}

fn parse_window(raw: Option<&str>) -> TaskRepositoryResult<Option<TimeWindow>> {
    raw.map(TimeWindow::try_from)
        .transpose()
        .map_err(TaskRepositoryError::persistence)
}

fn to_task_row(task: &Task) -> TaskRow {
    let (project_id, phase_task_id, job_id, job_task_id) = match *task.owner() {
        TaskOwner::Project {
            project_id,
            phase_task_id,
        } => (
            Some(project_id.into_inner()),
            Some(phase_task_id.into_inner()),
            None,
            None,
        ),
        TaskOwner::Job {
            job_id,
            job_task_id,
        } => (
            None,
            None,
            Some(job_id.into_inner()),
            Some(job_task_id.into_inner()),
        ),
    };

    TaskRow {
        id: task.id().into_inner(),
        project_id,
        phase_task_id,
        job_id,
        job_task_id,
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        time_window: task.time_window().map(|window| window.as_str().to_owned()),
        scheduled_time: task.scheduled_time(),
        sequence: task.sequence(),
        sequential: task.is_sequential(),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        completion_notes: task.completion_notes().map(str::to_owned),
        completed_at: task.completed_at(),
        completed_by: task.completed_by().map(OperatorId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("task {0} must reference exactly one project or job with its template")]
struct AmbiguousOwnerRow(uuid::Uuid);

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let owner = match (row.project_id, row.phase_task_id, row.job_id, row.job_task_id) {
        (Some(project_id), Some(phase_task_id), None, None) => TaskOwner::Project {
            project_id: ProjectId::from_uuid(project_id),
            phase_task_id: TaskTemplateId::from_uuid(phase_task_id),
        },
        (None, None, Some(job_id), Some(job_task_id)) => TaskOwner::Job {
            job_id: JobId::from_uuid(job_id),
            job_task_id: TaskTemplateId::from_uuid(job_task_id),
        },
        _ => return Err(TaskRepositoryError::persistence(AmbiguousOwnerRow(row.id))),
    };
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        owner,
        title: row.title,
        description: row.description,
        time_window: parse_window(row.time_window.as_deref())?,
        scheduled_time: row.scheduled_time,
        sequence: row.sequence,
        sequential: row.sequential,
        due_date: row.due_date,
        status,
        completion_notes: row.completion_notes,
        completed_at: row.completed_at,
        completed_by: row.completed_by.map(OperatorId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

/// Claim row stamped with the batch's creation time.
fn generation_claim(key: &GenerationKey, batch: &[Task]) -> Option<NewGenerationRow> {
    batch.first().map(|task| NewGenerationRow {
        owner_kind: key.owner().kind().to_owned(),
        owner_id: key.owner().id(),
        due_date: key.due_date(),
        claimed_at: task.created_at(),
    })
}
