//! Shared world state for scheduling BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use crate::test_helpers::{SettableClock, parse_date};
use chrono::NaiveDate;
use hatchery::job::{
    adapters::memory::InMemoryJobRepository,
    domain::{CategoryKeywords, Job},
};
use hatchery::project::{
    adapters::memory::InMemoryProjectStore,
    domain::{Phase, Project, Template},
    services::{AdvancementReport, PhaseAdvancementService},
};
use hatchery::task::{
    adapters::memory::InMemoryTaskStore,
    domain::Task,
    services::DailyTaskOrchestrator,
};
use rstest::fixture;

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator = DailyTaskOrchestrator<
    InMemoryTaskStore,
    InMemoryProjectStore,
    InMemoryJobRepository,
    SettableClock,
>;

/// Scenario world for scheduling behaviour tests.
pub struct SchedulingWorld {
    pub clock: Arc<SettableClock>,
    pub projects: Arc<InMemoryProjectStore>,
    pub jobs: Arc<InMemoryJobRepository>,
    pub tasks: Arc<InMemoryTaskStore>,
    pub template: Option<Template>,
    pub phases: HashMap<String, Phase>,
    pub project: Option<Project>,
    pub named_jobs: HashMap<String, Job>,
    pub sweeps: Vec<AdvancementReport>,
    pub generated: Option<Vec<Task>>,
}

impl SchedulingWorld {
    /// Creates a world with empty stores and the clock at 2024-06-15.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SettableClock::on(2024, 6, 15)),
            projects: Arc::new(InMemoryProjectStore::new()),
            jobs: Arc::new(InMemoryJobRepository::new()),
            tasks: Arc::new(InMemoryTaskStore::new()),
            template: None,
            phases: HashMap::new(),
            project: None,
            named_jobs: HashMap::new(),
            sweeps: Vec::new(),
            generated: None,
        }
    }

    pub fn advancement(&self) -> PhaseAdvancementService<InMemoryProjectStore, SettableClock> {
        PhaseAdvancementService::new(Arc::clone(&self.projects), Arc::clone(&self.clock))
    }

    pub fn orchestrator(&self) -> TestOrchestrator {
        DailyTaskOrchestrator::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.projects),
            Arc::clone(&self.jobs),
            Arc::clone(&self.clock),
            CategoryKeywords::default(),
        )
    }

    pub fn template(&self) -> Result<&Template, eyre::Report> {
        self.template
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing lifecycle template in scenario world"))
    }

    pub fn phase(&self, name: &str) -> Result<&Phase, eyre::Report> {
        self.phases
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown phase {name:?} in scenario world"))
    }

    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    pub fn job(&self, name: &str) -> Result<&Job, eyre::Report> {
        self.named_jobs
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown job {name:?} in scenario world"))
    }

    pub fn generated(&self) -> Result<&[Task], eyre::Report> {
        self.generated
            .as_deref()
            .ok_or_else(|| eyre::eyre!("no generation ran in scenario"))
    }
}

impl Default for SchedulingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SchedulingWorld {
    SchedulingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a scenario date such as `2024-06-15`.
pub fn scenario_date(value: &str) -> Result<NaiveDate, eyre::Report> {
    parse_date(value).map_err(|err| eyre::eyre!("invalid scenario date {value:?}: {err}"))
}

/// Splits a comma-separated title list.
pub fn split_titles(titles: &str) -> Vec<&str> {
    titles
        .split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .collect()
}
