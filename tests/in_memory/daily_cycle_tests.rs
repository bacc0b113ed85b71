//! Advancement, generation, and progress across consecutive days.

use super::helpers::{Hatchery, hatchery};
use crate::test_helpers::parse_date;
use chrono::Duration;
use ::hatchery::job::{domain::Job, ports::JobRepository};
use ::hatchery::project::services::CreateProjectRequest;
use ::hatchery::task::{
    domain::{Task, TaskStatus, TemplateParent},
    ports::TaskFilter,
    services::{TaskProgressError, UpdateTaskStatusRequest},
};
use rstest::rstest;

async fn store_job(hatchery: &Hatchery, name: &str, interval_days: u32, titles: &[&str]) -> Job {
    let job = Job::new(name, interval_days, &*hatchery.clock).expect("valid job");
    hatchery.jobs.store(&job).await.expect("job should store");
    hatchery
        .add_templates(TemplateParent::Job(job.id()), titles)
        .await;
    job
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    let mut names: Vec<&str> = tasks.iter().map(Task::title).collect();
    names.sort_unstable();
    names
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_runs_follow_phases_and_intervals(hatchery: Hatchery) {
    let lifecycle = hatchery
        .two_phase_lifecycle(3, &["Check pairs", "Feed broodstock"], &["Grade fry"])
        .await;
    hatchery
        .lifecycle()
        .create_project(
            CreateProjectRequest::new("Batch 21").with_template(lifecycle.template.id()),
        )
        .await
        .expect("project should be created");
    store_job(&hatchery, "Water change", 7, &["Drain 20%"]).await;
    store_job(&hatchery, "Open Shop Checklist", 1, &["Lights on"]).await;

    let first_day = hatchery
        .orchestrator()
        .generate_daily_tasks(None)
        .await
        .expect("daily pass should run");
    assert_eq!(
        titles(&first_day.tasks),
        vec!["Check pairs", "Drain 20%", "Feed broodstock", "Lights on"]
    );

    hatchery.clock.advance(Duration::days(4));
    hatchery
        .advancement()
        .check_and_advance_phases()
        .await
        .expect("sweep should run");
    let fifth_day = hatchery
        .orchestrator()
        .generate_daily_tasks(None)
        .await
        .expect("daily pass should run");
    assert_eq!(titles(&fifth_day.tasks), vec!["Grade fry", "Lights on"]);
    assert!(fifth_day.failures.is_empty());

    let repeat = hatchery
        .orchestrator()
        .generate_daily_tasks(None)
        .await
        .expect("daily pass should run");
    assert!(repeat.tasks.is_empty(), "a second run on the same day adds nothing");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sequential_phase_tasks_complete_in_order(hatchery: Hatchery) {
    let lifecycle = hatchery
        .two_phase_lifecycle(3, &["Check pairs", "Feed broodstock"], &[])
        .await;
    let project = hatchery
        .lifecycle()
        .create_project(
            CreateProjectRequest::new("Batch 22").with_template(lifecycle.template.id()),
        )
        .await
        .expect("project should be created");
    let due = parse_date("2024-03-01").expect("valid date");
    assert_eq!(hatchery.clock.today(), due);

    let mut tasks = hatchery
        .orchestrator()
        .generation()
        .generate_tasks_for_project(project.id(), None)
        .await
        .expect("generation should succeed");
    tasks.sort_by(Task::cmp_schedule);
    let [check, feed] = tasks.as_slice() else {
        panic!("expected two tasks, got {}", tasks.len());
    };

    let progress = hatchery.progress();
    let blocked = progress
        .update_status(UpdateTaskStatusRequest::new(feed.id(), "completed"))
        .await;
    assert!(matches!(
        blocked,
        Err(TaskProgressError::OutOfSequence { blocked_by, .. }) if blocked_by == check.id()
    ));

    progress
        .update_status(UpdateTaskStatusRequest::new(check.id(), "completed"))
        .await
        .expect("first task completes");
    progress
        .update_status(UpdateTaskStatusRequest::new(feed.id(), "completed"))
        .await
        .expect("second task completes once the first is done");

    let open = progress
        .list_tasks(
            &TaskFilter::new()
                .due_on(due)
                .with_status(TaskStatus::Pending),
        )
        .await
        .expect("listing should succeed");
    assert!(open.is_empty());
}
