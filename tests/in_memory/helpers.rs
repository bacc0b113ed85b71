//! Shared test helpers for in-memory integration tests.

use crate::test_helpers::SettableClock;
use ::hatchery::job::{adapters::memory::InMemoryJobRepository, domain::CategoryKeywords};
use ::hatchery::project::{
    adapters::memory::InMemoryProjectStore,
    domain::{Phase, PhaseOrder, Template, TemplateKind},
    ports::PhaseCatalog,
    services::{PhaseAdvancementService, ProjectLifecycleService},
};
use ::hatchery::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{TaskTemplate, TemplateParent, TimeWindow},
    ports::TaskTemplateCatalog,
    services::{DailyTaskOrchestrator, TaskProgressService},
};
use rstest::fixture;
use std::sync::Arc;

/// Orchestrator over in-memory stores.
pub type TestOrchestrator = DailyTaskOrchestrator<
    InMemoryTaskStore,
    InMemoryProjectStore,
    InMemoryJobRepository,
    SettableClock,
>;

/// In-memory stores sharing one clock.
pub struct Hatchery {
    pub tasks: Arc<InMemoryTaskStore>,
    pub projects: Arc<InMemoryProjectStore>,
    pub jobs: Arc<InMemoryJobRepository>,
    pub clock: Arc<SettableClock>,
}

/// Lifecycle template with a timed phase followed by an open-ended one.
pub struct TwoPhaseLifecycle {
    pub template: Template,
    pub first: Phase,
    pub second: Phase,
}

impl Hatchery {
    pub fn lifecycle(&self) -> ProjectLifecycleService<InMemoryProjectStore, SettableClock> {
        ProjectLifecycleService::new(Arc::clone(&self.projects), Arc::clone(&self.clock))
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

    pub fn progress(&self) -> TaskProgressService<InMemoryTaskStore, SettableClock> {
        TaskProgressService::new(Arc::clone(&self.tasks), Arc::clone(&self.clock))
    }

    /// Stores phase `first` lasting `first_days` and an open-ended phase
    /// `second`, each carrying the given task titles.
    pub async fn two_phase_lifecycle(
        &self,
        first_days: u32,
        first_tasks: &[&str],
        second_tasks: &[&str],
    ) -> TwoPhaseLifecycle {
        let template = Template::new("Seahorse", TemplateKind::Lifecycle, &*self.clock)
            .expect("valid template");
        self.projects
            .store_template(&template)
            .await
            .expect("template should store");

        let first = Phase::new(template.id(), "Broodstock", PhaseOrder::new(0))
            .expect("valid phase")
            .with_duration_days(first_days)
            .requiring_sequential();
        let second =
            Phase::new(template.id(), "Grow-out", PhaseOrder::new(1)).expect("valid phase");
        for phase in [&first, &second] {
            self.projects
                .store_phase(phase)
                .await
                .expect("phase should store");
        }

        self.add_templates(TemplateParent::Phase(first.id()), first_tasks)
            .await;
        self.add_templates(TemplateParent::Phase(second.id()), second_tasks)
            .await;

        TwoPhaseLifecycle {
            template,
            first,
            second,
        }
    }

    pub async fn add_templates(&self, parent: TemplateParent, titles: &[&str]) {
        for (order_index, title) in (0..).zip(titles) {
            let template = TaskTemplate::new(parent, *title, order_index)
                .expect("valid task template")
                .with_time_window(TimeWindow::Morning);
            self.tasks
                .store_template(&template)
                .await
                .expect("task template should store");
        }
    }
}

/// Provides fresh stores with the clock at 2024-03-01 09:00 UTC.
#[fixture]
pub fn hatchery() -> Hatchery {
    Hatchery {
        tasks: Arc::new(InMemoryTaskStore::new()),
        projects: Arc::new(InMemoryProjectStore::new()),
        jobs: Arc::new(InMemoryJobRepository::new()),
        clock: Arc::new(SettableClock::on(2024, 3, 1)),
    }
}
