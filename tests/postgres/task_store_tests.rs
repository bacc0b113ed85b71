//! Task generation and progress against `PostgreSQL`.

use super::helpers::{BoxError, PreparedStores, prepared_stores};
use crate::test_helpers::{SettableClock, parse_date};
use hatchery::job::{
    adapters::postgres::PostgresJobRepository,
    domain::{CategoryKeywords, Job},
    ports::JobRepository,
};
use hatchery::project::{
    adapters::postgres::PostgresProjectStore,
    domain::{Phase, PhaseOrder, Project, Template, TemplateKind},
    ports::{PhaseCatalog, ProjectRepository},
};
use hatchery::task::{
    adapters::postgres::PostgresTaskStore,
    domain::{GenerationOwner, Task, TaskStatus, TaskTemplate, TemplateParent, TimeWindow},
    ports::{TaskFilter, TaskRepository, TaskTemplateCatalog},
    services::{DailyTaskOrchestrator, TaskProgressService, UpdateTaskStatusRequest},
};
use rstest::rstest;
use std::sync::Arc;

async fn add_templates(
    stores: &PreparedStores,
    parent: TemplateParent,
    titles: &[&str],
) -> Result<(), BoxError> {
    for (order_index, title) in (0..).zip(titles) {
        let template =
            TaskTemplate::new(parent, *title, order_index)?.with_time_window(TimeWindow::Morning);
        stores.tasks.store_template(&template).await?;
    }
    Ok(())
}

async fn project_with_tasks(stores: &PreparedStores, titles: &[&str]) -> Result<Project, BoxError> {
    let template = Template::new("Seahorse", TemplateKind::Lifecycle, &*stores.clock)?;
    stores.projects.store_template(&template).await?;
    let phase = Phase::new(template.id(), "Broodstock", PhaseOrder::new(0))?.requiring_sequential();
    stores.projects.store_phase(&phase).await?;
    add_templates(stores, TemplateParent::Phase(phase.id()), titles).await?;
    let project = Project::new("Batch 9", Some(template.id()), Some(phase.id()), &*stores.clock)?;
    stores.projects.store(&project).await?;
    Ok(project)
}

async fn job_with_tasks(
    stores: &PreparedStores,
    name: &str,
    interval_days: u32,
    titles: &[&str],
) -> Result<Job, BoxError> {
    let job = Job::new(name, interval_days, &*stores.clock)?;
    stores.jobs.store(&job).await?;
    add_templates(stores, TemplateParent::Job(job.id()), titles).await?;
    Ok(job)
}

type PgOrchestrator = DailyTaskOrchestrator<
    PostgresTaskStore,
    PostgresProjectStore,
    PostgresJobRepository,
    SettableClock,
>;

fn orchestrator(stores: &PreparedStores) -> PgOrchestrator {
    DailyTaskOrchestrator::new(
        Arc::clone(&stores.tasks),
        Arc::clone(&stores.projects),
        Arc::clone(&stores.jobs),
        Arc::clone(&stores.clock),
        CategoryKeywords::default(),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_pass_claims_each_owner_once(
    prepared_stores: Result<Option<PreparedStores>, BoxError>,
) -> Result<(), BoxError> {
    let Some(stores) = prepared_stores? else {
        return Ok(());
    };
    let project = project_with_tasks(&stores, &["Check pairs", "Feed broodstock"]).await?;
    job_with_tasks(&stores, "Evening Feed", 1, &["Mysis"]).await?;

    let first = orchestrator(&stores).generate_daily_tasks(None).await?;
    let second = orchestrator(&stores).generate_daily_tasks(None).await?;

    assert_eq!(first.tasks.len(), 3);
    assert!(first.failures.is_empty());
    assert!(second.tasks.is_empty());

    let listed = stores
        .tasks
        .find(&TaskFilter::new().for_owner(GenerationOwner::Project(project.id())))
        .await?;
    let titles: Vec<&str> = listed.iter().map(Task::title).collect();
    assert_eq!(titles, vec!["Check pairs", "Feed broodstock"]);
    assert!(listed.iter().all(Task::is_sequential));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn job_interval_uses_latest_generation(
    prepared_stores: Result<Option<PreparedStores>, BoxError>,
) -> Result<(), BoxError> {
    let Some(stores) = prepared_stores? else {
        return Ok(());
    };
    let job = job_with_tasks(&stores, "Water test", 7, &["Ammonia", "Nitrite"]).await?;
    let generation = orchestrator(&stores);
    let service = generation.generation();

    let seeded = service
        .generate_tasks_for_job(job.id(), Some(parse_date("2024-01-01")?))
        .await?;
    let early = service
        .generate_tasks_for_job(job.id(), Some(parse_date("2024-01-05")?))
        .await?;
    let due = service
        .generate_tasks_for_job(job.id(), Some(parse_date("2024-01-08")?))
        .await?;

    assert_eq!(seeded.len(), 2);
    assert!(early.is_empty());
    assert_eq!(due.len(), 2);
    assert_eq!(
        stores
            .tasks
            .latest_due_date(GenerationOwner::Job(job.id()))
            .await?,
        Some(parse_date("2024-01-08")?)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_is_persisted(
    prepared_stores: Result<Option<PreparedStores>, BoxError>,
) -> Result<(), BoxError> {
    let Some(stores) = prepared_stores? else {
        return Ok(());
    };
    let job = job_with_tasks(&stores, "Evening Feed", 1, &["Mysis"]).await?;
    let generated = orchestrator(&stores)
        .generation()
        .generate_tasks_for_job(job.id(), None)
        .await?;
    let task = generated.first().ok_or("task missing")?;

    TaskProgressService::new(Arc::clone(&stores.tasks), Arc::clone(&stores.clock))
        .update_status(
            UpdateTaskStatusRequest::new(task.id(), "completed").with_notes("All tanks fed"),
        )
        .await?;

    let stored = stores
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or("task missing after update")?;
    assert_eq!(stored.status(), TaskStatus::Completed);
    assert_eq!(stored.completion_notes(), Some("All tanks fed"));
    assert!(stored.completed_at().is_some());
    Ok(())
}
