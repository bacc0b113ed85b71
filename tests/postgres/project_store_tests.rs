//! Project, phase, and history persistence against `PostgreSQL`.

use super::helpers::{BoxError, PreparedStores, prepared_stores};
use chrono::Duration;
use hatchery::project::{
    domain::{
        HistoryAction, HistoryEntry, Phase, PhaseOrder, Project, ProjectStatus, Template,
        TemplateKind,
    },
    ports::{PhaseCatalog, ProjectHistoryLog, ProjectRepository, ProjectRepositoryError},
    services::{CreateProjectRequest, PhaseAdvancementService, ProjectLifecycleService},
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

async fn two_phases(stores: &PreparedStores) -> Result<(Template, Phase, Phase), BoxError> {
    let template = Template::new("Clownfish", TemplateKind::Lifecycle, &*stores.clock)?;
    stores.projects.store_template(&template).await?;
    let first = Phase::new(template.id(), "Larval", PhaseOrder::new(0))?.with_duration_days(3);
    let second = Phase::new(template.id(), "Grow-out", PhaseOrder::new(1))?;
    stores.projects.store_phase(&first).await?;
    stores.projects.store_phase(&second).await?;
    Ok((template, first, second))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn phases_are_walked_in_order(
    prepared_stores: Result<Option<PreparedStores>, BoxError>,
) -> Result<(), BoxError> {
    let Some(stores) = prepared_stores? else {
        return Ok(());
    };
    let (template, first, second) = two_phases(&stores).await?;

    let opening = stores.projects.first_phase(template.id()).await?;
    let following = stores
        .projects
        .next_phase(template.id(), first.order())
        .await?;
    let after_last = stores
        .projects
        .next_phase(template.id(), second.order())
        .await?;

    assert_eq!(opening.map(|phase| phase.id()), Some(first.id()));
    assert_eq!(following.map(|phase| phase.id()), Some(second.id()));
    assert!(after_last.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_phase_order_is_rejected(
    prepared_stores: Result<Option<PreparedStores>, BoxError>,
) -> Result<(), BoxError> {
    let Some(stores) = prepared_stores? else {
        return Ok(());
    };
    let (template, _, _) = two_phases(&stores).await?;
    let clash = Phase::new(template.id(), "Quarantine", PhaseOrder::new(1))?;

    let result = stores.projects.store_phase(&clash).await;

    assert!(matches!(
        result,
        Err(ProjectRepositoryError::DuplicatePhaseOrder { template_id, order })
            if template_id == template.id() && order == PhaseOrder::new(1)
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_advances_and_records_history(
    prepared_stores: Result<Option<PreparedStores>, BoxError>,
) -> Result<(), BoxError> {
    let Some(stores) = prepared_stores? else {
        return Ok(());
    };
    let (template, first, second) = two_phases(&stores).await?;
    let lifecycle =
        ProjectLifecycleService::new(Arc::clone(&stores.projects), Arc::clone(&stores.clock));
    let project = lifecycle
        .create_project(CreateProjectRequest::new("Batch 3").with_template(template.id()))
        .await?;
    stores.clock.advance(Duration::days(4));

    let report =
        PhaseAdvancementService::new(Arc::clone(&stores.projects), Arc::clone(&stores.clock))
            .check_and_advance_phases()
            .await?;

    assert_eq!(report.advanced.len(), 1);
    let stored = stores
        .projects
        .find_by_id(project.id())
        .await?
        .ok_or("project missing")?;
    assert_eq!(stored.current_phase_id(), Some(second.id()));
    assert_eq!(stored.status(), ProjectStatus::Active);

    let completed = stores
        .projects
        .latest(project.id(), first.id(), HistoryAction::PhaseCompleted)
        .await?;
    assert!(completed.is_some());
    let started = stores
        .projects
        .latest(project.id(), second.id(), HistoryAction::PhaseStarted)
        .await?;
    assert!(started.is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn later_append_wins_timestamp_tie(
    prepared_stores: Result<Option<PreparedStores>, BoxError>,
) -> Result<(), BoxError> {
    let Some(stores) = prepared_stores? else {
        return Ok(());
    };
    let (template, first, _) = two_phases(&stores).await?;
    let project = Project::new("Batch 4", Some(template.id()), Some(first.id()), &*stores.clock)?;
    stores.projects.store(&project).await?;
    let earlier = HistoryEntry::record(
        project.id(),
        Some(first.id()),
        HistoryAction::PhaseStarted,
        json!({ "attempt": 1 }),
        &*stores.clock,
    );
    let later = HistoryEntry::record(
        project.id(),
        Some(first.id()),
        HistoryAction::PhaseStarted,
        json!({ "attempt": 2 }),
        &*stores.clock,
    );
    stores.projects.append(&earlier).await?;
    stores.projects.append(&later).await?;

    let latest = stores
        .projects
        .latest(project.id(), first.id(), HistoryAction::PhaseStarted)
        .await?
        .ok_or("history entry missing")?;
    let listed = stores.projects.list_for_project(project.id()).await?;

    assert_eq!(latest.id(), later.id());
    assert_eq!(listed.first().map(HistoryEntry::id), Some(later.id()));
    Ok(())
}
