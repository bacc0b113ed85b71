//! `PostgreSQL` repository implementation for recurring jobs.

use super::{
    models::{JobRow, NewJobRow},
    schema::jobs,
};
use crate::job::{
    domain::{Job, JobCategory, JobId, JobStatus, PersistedJobData},
    ports::{JobRepository, JobRepositoryError, JobRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by job adapters.
pub type JobPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed job repository.
#[derive(Debug, Clone)]
pub struct PostgresJobRepository {
    pool: JobPgPool,
}

impl PostgresJobRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: JobPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> JobRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> JobRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(JobRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(JobRepositoryError::persistence)?
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let new_row = to_new_row(job)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(jobs::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        JobRepositoryError::DuplicateJob(job_id)
                    }
                    _ => JobRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let row = to_new_row(job)?;

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(jobs::table.filter(jobs::id.eq(row.id)))
                .set((
                    jobs::name.eq(&row.name),
                    jobs::description.eq(&row.description),
                    jobs::interval_days.eq(row.interval_days),
                    jobs::status.eq(&row.status),
                    jobs::requires_sequential.eq(row.requires_sequential),
                    jobs::category.eq(&row.category),
                    jobs::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(JobRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(JobRepositoryError::NotFound(job_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        self.run_blocking(move |connection| {
            let row = jobs::table
                .filter(jobs::id.eq(id.into_inner()))
                .select(JobRow::as_select())
                .first::<JobRow>(connection)
                .optional()
                .map_err(JobRepositoryError::persistence)?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn list_active(&self) -> JobRepositoryResult<Vec<Job>> {
        self.run_blocking(move |connection| {
            let rows = jobs::table
                .filter(jobs::status.eq(JobStatus::Active.as_str()))
                .order((jobs::created_at.asc(), jobs::id.asc()))
                .select(JobRow::as_select())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }
}

fn to_new_row(job: &Job) -> JobRepositoryResult<NewJobRow> {
    let interval_days =
        i32::try_from(job.interval_days()).map_err(JobRepositoryError::persistence)?;

    Ok(NewJobRow {
        id: job.id().into_inner(),
        name: job.name().to_owned(),
        description: job.description().map(str::to_owned),
        interval_days,
        status: job.status().as_str().to_owned(),
        requires_sequential: job.requires_sequential(),
        category: job.category().map(|category| category.as_str().to_owned()),
        created_at: job.created_at(),
        updated_at: job.updated_at(),
    })
}

fn row_to_job(row: JobRow) -> JobRepositoryResult<Job> {
    let JobRow {
        id,
        name,
        description,
        interval_days: persisted_interval,
        status: persisted_status,
        requires_sequential,
        category: persisted_category,
        created_at,
        updated_at,
    } = row;

    let interval_days =
        u32::try_from(persisted_interval).map_err(JobRepositoryError::persistence)?;
    let status =
        JobStatus::try_from(persisted_status.as_str()).map_err(JobRepositoryError::persistence)?;
    let category = persisted_category
        .as_deref()
        .map(JobCategory::try_from)
        .transpose()
        .map_err(JobRepositoryError::persistence)?;

    Ok(Job::from_persisted(PersistedJobData {
        id: JobId::from_uuid(id),
        name,
        description,
        interval_days,
        status,
        requires_sequential,
        category,
        created_at,
        updated_at,
    }))
}
