//! `PostgreSQL` store implementing the project ports.

use super::{
    models::{HistoryRow, NewProjectRow, PhaseRow, ProjectRow, TemplateRow},
    schema::{phases, project_history, projects, templates},
};
use crate::project::{
    domain::{
        HistoryAction, HistoryEntry, HistoryEntryId, PersistedHistoryEntry, PersistedPhaseData,
        PersistedProjectData, Phase, PhaseId, PhaseOrder, Project, ProjectId, ProjectStatus,
        Template, TemplateId, TemplateKind,
    },
    ports::{
        PhaseCatalog, ProjectHistoryLog, ProjectRepository, ProjectRepositoryError,
        ProjectRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

const PHASE_ORDER_CONSTRAINT: &str = "phases_template_id_order_index_key";

/// `PostgreSQL`-backed project store.
#[derive(Debug, Clone)]
pub struct PostgresProjectStore {
    pool: ProjectPgPool,
}

impl PostgresProjectStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectStore {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_project_row(project);

        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let row = to_new_project_row(project);

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(projects::table.filter(projects::id.eq(row.id)))
                .set(&row)
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_active(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .filter(projects::status.eq(ProjectStatus::Active.as_str()))
                .order((projects::started_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }
}

#[async_trait]
impl PhaseCatalog for PostgresProjectStore {
    async fn store_template(&self, template: &Template) -> ProjectRepositoryResult<()> {
        let template_id = template.id();
        let row = to_template_row(template)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(templates::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateTemplate(template_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn store_phase(&self, phase: &Phase) -> ProjectRepositoryResult<()> {
        let phase_id = phase.id();
        let template_id = phase.template_id();
        let order = phase.order();
        let row = to_phase_row(phase)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(phases::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some(PHASE_ORDER_CONSTRAINT) =>
                    {
                        ProjectRepositoryError::DuplicatePhaseOrder { template_id, order }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicatePhase(phase_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        ProjectRepositoryError::UnknownTemplate(template_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_template(&self, id: TemplateId) -> ProjectRepositoryResult<Option<Template>> {
        self.run_blocking(move |connection| {
            let row = templates::table
                .filter(templates::id.eq(id.into_inner()))
                .select(TemplateRow::as_select())
                .first::<TemplateRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_template).transpose()
        })
        .await
    }

    async fn find_phase(&self, id: PhaseId) -> ProjectRepositoryResult<Option<Phase>> {
        self.run_blocking(move |connection| {
            let row = phases::table
                .filter(phases::id.eq(id.into_inner()))
                .select(PhaseRow::as_select())
                .first::<PhaseRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_phase).transpose()
        })
        .await
    }

    async fn first_phase(&self, template_id: TemplateId) -> ProjectRepositoryResult<Option<Phase>> {
        self.run_blocking(move |connection| {
            let row = phases::table
                .filter(phases::template_id.eq(template_id.into_inner()))
                .order(phases::order_index.asc())
                .select(PhaseRow::as_select())
                .first::<PhaseRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_phase).transpose()
        })
        .await
    }

    async fn next_phase(
        &self,
        template_id: TemplateId,
        after: PhaseOrder,
    ) -> ProjectRepositoryResult<Option<Phase>> {
        self.run_blocking(move |connection| {
            let row = phases::table
                .filter(phases::template_id.eq(template_id.into_inner()))
                .filter(phases::order_index.gt(after.value()))
                .order(phases::order_index.asc())
                .select(PhaseRow::as_select())
                .first::<PhaseRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_phase).transpose()
        })
        .await
    }
}

#[async_trait]
impl ProjectHistoryLog for PostgresProjectStore {
    async fn append(&self, entry: &HistoryEntry) -> ProjectRepositoryResult<()> {
        let entry_id = entry.id();
        let row = to_history_row(entry);

        self.run_blocking(move |connection| {
            diesel::insert_into(project_history::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateHistoryEntry(entry_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn latest(
        &self,
        project_id: ProjectId,
        phase_id: PhaseId,
        action: HistoryAction,
    ) -> ProjectRepositoryResult<Option<HistoryEntry>> {
        self.run_blocking(move |connection| {
            let row = project_history::table
                .filter(project_history::project_id.eq(project_id.into_inner()))
                .filter(project_history::phase_id.eq(phase_id.into_inner()))
                .filter(project_history::action.eq(action.as_str()))
                .order((
                    project_history::created_at.desc(),
                    project_history::seq.desc(),
                ))
                .select(HistoryRow::as_select())
                .first::<HistoryRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_history).transpose()
        })
        .await
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<Vec<HistoryEntry>> {
        self.run_blocking(move |connection| {
            let rows = project_history::table
                .filter(project_history::project_id.eq(project_id.into_inner()))
                .order((
                    project_history::created_at.desc(),
                    project_history::seq.desc(),
                ))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_history).collect()
        })
        .await
    }
}

fn to_new_project_row(project: &Project) -> NewProjectRow {
    NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().to_owned(),
        template_id: project.template_id().map(TemplateId::into_inner),
        current_phase_id: project.current_phase_id().map(PhaseId::into_inner),
        status: project.status().as_str().to_owned(),
        started_at: project.started_at(),
        completed_at: project.completed_at(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        name,
        template_id,
        current_phase_id,
        status: persisted_status,
        started_at,
        completed_at,
        created_at,
        updated_at,
    } = row;

    let status = ProjectStatus::try_from(persisted_status.as_str())
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        name,
        template_id: template_id.map(TemplateId::from_uuid),
        current_phase_id: current_phase_id.map(PhaseId::from_uuid),
        status,
        started_at,
        completed_at,
        created_at,
        updated_at,
    }))
}

fn to_template_row(template: &Template) -> ProjectRepositoryResult<TemplateRow> {
    let interval_days = template
        .interval_days()
        .map(i32::try_from)
        .transpose()
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(TemplateRow {
        id: template.id().into_inner(),
        name: template.name().to_owned(),
        kind: template.kind().as_str().to_owned(),
        interval_days,
        created_at: template.created_at(),
    })
}

fn row_to_template(row: TemplateRow) -> ProjectRepositoryResult<Template> {
    let kind =
        TemplateKind::try_from(row.kind.as_str()).map_err(ProjectRepositoryError::persistence)?;
    let interval_days = row
        .interval_days
        .map(u32::try_from)
        .transpose()
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(Template::from_persisted(
        TemplateId::from_uuid(row.id),
        row.name,
        kind,
        interval_days,
        row.created_at,
    ))
}

fn to_phase_row(phase: &Phase) -> ProjectRepositoryResult<PhaseRow> {
    let duration_days = phase
        .duration_days()
        .map(i32::try_from)
        .transpose()
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(PhaseRow {
        id: phase.id().into_inner(),
        template_id: phase.template_id().into_inner(),
        name: phase.name().to_owned(),
        description: phase.description().map(str::to_owned),
        order_index: phase.order().value(),
        duration_days,
        requires_sequential: phase.requires_sequential(),
    })
}

fn row_to_phase(row: PhaseRow) -> ProjectRepositoryResult<Phase> {
    let duration_days = row
        .duration_days
        .map(u32::try_from)
        .transpose()
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(Phase::from_persisted(PersistedPhaseData {
        id: PhaseId::from_uuid(row.id),
        template_id: TemplateId::from_uuid(row.template_id),
        name: row.name,
        description: row.description,
        order: PhaseOrder::new(row.order_index),
        duration_days,
        requires_sequential: row.requires_sequential,
    }))
}

fn to_history_row(entry: &HistoryEntry) -> HistoryRow {
    HistoryRow {
        id: entry.id().into_inner(),
        project_id: entry.project_id().into_inner(),
        phase_id: entry.phase_id().map(PhaseId::into_inner),
        action: entry.action().as_str().to_owned(),
        metadata: entry.metadata().clone(),
        created_at: entry.created_at(),
    }
}

fn row_to_history(row: HistoryRow) -> ProjectRepositoryResult<HistoryEntry> {
    let action =
        HistoryAction::try_from(row.action.as_str()).map_err(ProjectRepositoryError::persistence)?;

    Ok(HistoryEntry::from_persisted(PersistedHistoryEntry {
        id: HistoryEntryId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        phase_id: row.phase_id.map(PhaseId::from_uuid),
        action,
        metadata: row.metadata,
        created_at: row.created_at,
    }))
}
