//! Phase advancement sweeps over lifecycle projects.

use super::helpers::{Hatchery, hatchery};
use chrono::Duration;
use ::hatchery::project::{
    domain::{HistoryAction, ProjectStatus},
    ports::ProjectRepository,
    services::CreateProjectRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn timed_phase_advances_once(hatchery: Hatchery) {
    let lifecycle = hatchery.two_phase_lifecycle(3, &[], &[]).await;
    let project = hatchery
        .lifecycle()
        .create_project(
            CreateProjectRequest::new("Batch 12").with_template(lifecycle.template.id()),
        )
        .await
        .expect("project should be created");
    hatchery.clock.advance(Duration::days(4));

    let first = hatchery
        .advancement()
        .check_and_advance_phases()
        .await
        .expect("sweep should run");
    let second = hatchery
        .advancement()
        .check_and_advance_phases()
        .await
        .expect("sweep should run");

    assert_eq!(first.advanced.len(), 1);
    assert!(second.advanced.is_empty() && second.completed.is_empty());

    let stored = hatchery
        .projects
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project exists");
    assert_eq!(stored.current_phase_id(), Some(lifecycle.second.id()));
    assert_eq!(stored.status(), ProjectStatus::Active);

    let history = hatchery
        .lifecycle()
        .history(project.id())
        .await
        .expect("history should load");
    let completed_first = history.iter().any(|entry| {
        entry.action() == HistoryAction::PhaseCompleted
            && entry.phase_id() == Some(lifecycle.first.id())
    });
    let started_second = history.iter().any(|entry| {
        entry.action() == HistoryAction::PhaseStarted
            && entry.phase_id() == Some(lifecycle.second.id())
    });
    assert!(completed_first, "phase_completed for the first phase");
    assert!(started_second, "phase_started for the second phase");
}

#[rstest]
#[case(2, 0)]
#[case(3, 1)]
#[tokio::test(flavor = "multi_thread")]
async fn advancement_counts_whole_days(
    hatchery: Hatchery,
    #[case] days_elapsed: i64,
    #[case] expected_advances: usize,
) {
    let lifecycle = hatchery.two_phase_lifecycle(3, &[], &[]).await;
    hatchery
        .lifecycle()
        .create_project(
            CreateProjectRequest::new("Batch 13").with_template(lifecycle.template.id()),
        )
        .await
        .expect("project should be created");
    hatchery.clock.advance(Duration::days(days_elapsed));

    let report = hatchery
        .advancement()
        .check_and_advance_phases()
        .await
        .expect("sweep should run");

    assert_eq!(report.advanced.len(), expected_advances);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_ended_phase_stays_put(hatchery: Hatchery) {
    let lifecycle = hatchery.two_phase_lifecycle(3, &[], &[]).await;
    let project = hatchery
        .lifecycle()
        .create_project(
            CreateProjectRequest::new("Batch 14")
                .with_template(lifecycle.template.id())
                .with_initial_phase(lifecycle.second.id()),
        )
        .await
        .expect("project should be created");
    hatchery.clock.advance(Duration::days(365));

    let report = hatchery
        .advancement()
        .check_and_advance_phases()
        .await
        .expect("sweep should run");

    assert!(report.advanced.is_empty() && report.completed.is_empty());
    let stored = hatchery
        .projects
        .find_by_id(project.id())
        .await
        .expect("lookup should succeed")
        .expect("project exists");
    assert_eq!(stored.current_phase_id(), Some(lifecycle.second.id()));
}
