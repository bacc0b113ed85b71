//! Shared test helpers for `PostgreSQL` integration tests.

use crate::test_helpers::SettableClock;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use hatchery::job::adapters::postgres::PostgresJobRepository;
use hatchery::project::adapters::postgres::PostgresProjectStore;
use hatchery::task::adapters::postgres::PostgresTaskStore;
use rstest::fixture;
use std::sync::Arc;
use uuid::Uuid;

/// Boxed error type for fallible test setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the test server.
pub const TEST_DATABASE_URL_ENV: &str = "HATCHERY_TEST_DATABASE_URL";

/// SQL creating the scheduler tables.
pub const CREATE_SCHEDULER_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_scheduler/up.sql");

/// Schema dropped when the guard goes out of scope.
pub struct TestSchema {
    admin_url: String,
    name: String,
}

impl TestSchema {
    fn create(admin_url: &str) -> Result<Self, BoxError> {
        let name = format!("hatchery_test_{}", Uuid::new_v4().simple());
        let mut conn = PgConnection::establish(admin_url)?;
        conn.batch_execute(&format!("CREATE SCHEMA {name}"))?;
        Ok(Self {
            admin_url: admin_url.to_owned(),
            name,
        })
    }

    /// Connection URL that resolves unqualified tables in this schema.
    pub fn url(&self) -> String {
        let separator = if self.admin_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}options=-csearch_path%3D{}",
            self.admin_url, self.name
        )
    }
}

impl Drop for TestSchema {
    fn drop(&mut self) {
        if let Ok(mut conn) = PgConnection::establish(&self.admin_url) {
            conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name))
                .ok();
        }
    }
}

/// Migrated schema with every store bound to it.
pub struct PreparedStores {
    /// Schema guard; dropping it removes the tables.
    pub schema: TestSchema,
    pub projects: Arc<PostgresProjectStore>,
    pub jobs: Arc<PostgresJobRepository>,
    pub tasks: Arc<PostgresTaskStore>,
    pub clock: Arc<SettableClock>,
}

fn prepare(admin_url: &str) -> Result<PreparedStores, BoxError> {
    let schema = TestSchema::create(admin_url)?;
    let mut conn = PgConnection::establish(&schema.url())?;
    conn.batch_execute(CREATE_SCHEDULER_SQL)?;

    let manager = ConnectionManager::<PgConnection>::new(schema.url());
    let pool = Pool::builder().max_size(2).build(manager)?;

    Ok(PreparedStores {
        schema,
        projects: Arc::new(PostgresProjectStore::new(pool.clone())),
        jobs: Arc::new(PostgresJobRepository::new(pool.clone())),
        tasks: Arc::new(PostgresTaskStore::new(pool)),
        clock: Arc::new(SettableClock::on(2024, 3, 1)),
    })
}

/// Provides migrated stores, or `None` when no test server is configured.
///
/// # Errors
///
/// Returns an error if the schema cannot be created or migrated.
#[fixture]
pub fn prepared_stores() -> Result<Option<PreparedStores>, BoxError> {
    std::env::var(TEST_DATABASE_URL_ENV)
        .ok()
        .map(|url| prepare(&url))
        .transpose()
}
