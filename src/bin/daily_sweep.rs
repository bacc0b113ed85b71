//! Runs one phase advancement sweep followed by one task generation pass.
//!
//! Usage:
//!
//! ```text
//! daily_sweep <pass> [config-dir]
//! ```
//!
//! The `pass` must be `daily`, `regular`, `open_shop`, or `close_shop`.
//! Configuration is read from `hatchery.json` in `config-dir` (default: the
//! working directory) and overridden from `HATCHERY_*` environment
//! variables. Cadence belongs to the caller, typically cron.

use camino::Utf8PathBuf;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use hatchery::config::{ConfigError, DEFAULT_CONFIG_FILE, SchedulerConfig};
use hatchery::job::adapters::postgres::PostgresJobRepository;
use hatchery::job::domain::JobCategory;
use hatchery::project::adapters::postgres::PostgresProjectStore;
use hatchery::project::services::{PhaseAdvancementService, ProjectLifecycleError};
use hatchery::task::adapters::postgres::PostgresTaskStore;
use hatchery::task::services::{DailyTaskOrchestrator, GenerationReport, TaskGenerationError};
use hatchery::telemetry::{TelemetryError, init_tracing};
use mockable::DefaultClock;
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during a sweep.
#[derive(Debug, Error)]
enum SweepError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("connection pool init failed: {0}")]
    Pool(#[source] diesel::r2d2::PoolError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("phase advancement failed: {0}")]
    Advancement(#[from] ProjectLifecycleError),
    #[error("task generation failed: {0}")]
    Generation(#[from] TaskGenerationError),
}

/// Generation pass selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Daily,
    Regular,
    Category(JobCategory),
}

impl Pass {
    fn parse(arg: &str) -> Result<Self, SweepError> {
        match arg {
            "daily" => Ok(Self::Daily),
            "regular" => Ok(Self::Regular),
            other => JobCategory::try_from(other).map(Self::Category).map_err(|_| {
                SweepError::InvalidArgs(format!(
                    "unknown pass '{other}'; expected daily, regular, open_shop, or close_shop"
                ))
            }),
        }
    }
}

fn main() -> Result<(), BoxError> {
    let args = collect_args()?;
    run(args.into_iter()).map_err(Into::into)
}

fn collect_args() -> Result<Vec<String>, SweepError> {
    env::args_os()
        .skip(1)
        .map(|arg_os| {
            arg_os
                .into_string()
                .map_err(|_| SweepError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Pass, Utf8PathBuf), SweepError> {
    let pass_arg = args
        .next()
        .ok_or_else(|| SweepError::InvalidArgs("missing pass".into()))?;
    let pass = Pass::parse(&pass_arg)?;
    let config_dir = args.next().map_or_else(|| Utf8PathBuf::from("."), Utf8PathBuf::from);
    if args.next().is_some() {
        return Err(SweepError::InvalidArgs("unexpected extra argument".into()));
    }
    Ok((pass, config_dir))
}

fn run(args: impl Iterator<Item = String>) -> Result<(), SweepError> {
    let (pass, config_dir) = parse_args(args)?;
    let config = SchedulerConfig::load(&config_dir, DEFAULT_CONFIG_FILE)?;
    init_tracing(&config.logging)?;

    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .build(manager)
        .map_err(SweepError::Pool)?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(SweepError::RuntimeInit)?;

    let clock = Arc::new(DefaultClock);
    let projects = Arc::new(PostgresProjectStore::new(pool.clone()));
    let jobs = Arc::new(PostgresJobRepository::new(pool.clone()));
    let tasks = Arc::new(PostgresTaskStore::new(pool));

    runtime.block_on(async {
        let advancement = PhaseAdvancementService::new(Arc::clone(&projects), Arc::clone(&clock))
            .check_and_advance_phases()
            .await?;
        info!(
            advanced = advancement.advanced.len(),
            completed = advancement.completed.len(),
            failed = advancement.failures.len(),
            "advancement sweep done"
        );

        let orchestrator =
            DailyTaskOrchestrator::new(tasks, projects, jobs, clock, config.categories);
        let report = match pass {
            Pass::Daily => orchestrator.generate_daily_tasks(None).await?,
            Pass::Regular => orchestrator.generate_regular_tasks(None).await?,
            Pass::Category(category) => {
                orchestrator
                    .generate_tasks_by_category(category, None)
                    .await?
            }
        };
        log_report(&report);
        Ok::<(), SweepError>(())
    })
}

fn log_report(report: &GenerationReport) {
    for failure in &report.failures {
        warn!(owner = %failure.owner, error = %failure.error, "owner skipped");
    }
    info!(
        task_count = report.tasks.len(),
        failed = report.failures.len(),
        "generation pass done"
    );
}
