//! Then steps for scheduling BDD scenarios.

use super::world::{SchedulingWorld, run_async};
use eyre::WrapErr;
use hatchery::project::{
    domain::{HistoryAction, Project, ProjectStatus},
    ports::{ProjectHistoryLog, ProjectRepository},
};
use hatchery::task::domain::{GenerationOwner, Task};
use rstest_bdd_macros::then;

fn reload_project(world: &SchedulingWorld) -> Result<Project, eyre::Report> {
    let project_id = world.project()?.id();
    run_async(world.projects.find_by_id(project_id))
        .wrap_err("reload project")?
        .ok_or_else(|| eyre::eyre!("project {project_id} disappeared"))
}

#[then(r#"the project is in phase "{name}""#)]
fn project_in_phase(world: &SchedulingWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.phase(&name)?.id();
    let project = reload_project(world)?;
    eyre::ensure!(
        project.current_phase_id() == Some(expected),
        "expected phase {name:?}, found {:?}",
        project.current_phase_id()
    );
    Ok(())
}

#[then(r#"the history records "{action}" for phase "{name}""#)]
fn history_records(
    world: &SchedulingWorld,
    action: String,
    name: String,
) -> Result<(), eyre::Report> {
    let expected_action = HistoryAction::try_from(action.as_str())?;
    let phase_id = world.phase(&name)?.id();
    let project_id = world.project()?.id();
    let history = run_async(world.projects.list_for_project(project_id))
        .wrap_err("load project history")?;
    let recorded = history
        .iter()
        .any(|entry| entry.action() == expected_action && entry.phase_id() == Some(phase_id));
    eyre::ensure!(recorded, "no {action} entry for phase {name:?}");
    Ok(())
}

#[then("the latest sweep advanced no project")]
fn latest_sweep_idle(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let report = world
        .sweeps
        .last()
        .ok_or_else(|| eyre::eyre!("no sweep ran in scenario"))?;
    eyre::ensure!(
        report.advanced.is_empty() && report.completed.is_empty(),
        "expected an idle sweep, advanced {} and completed {}",
        report.advanced.len(),
        report.completed.len()
    );
    Ok(())
}

#[then("the project is completed")]
fn project_completed(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let project = reload_project(world)?;
    eyre::ensure!(
        project.status() == ProjectStatus::Completed,
        "expected completed project, found {}",
        project.status().as_str()
    );
    eyre::ensure!(project.completed_at().is_some(), "completion time missing");
    Ok(())
}

#[then("no tasks are generated")]
fn no_tasks_generated(world: &SchedulingWorld) -> Result<(), eyre::Report> {
    let tasks = world.generated()?;
    eyre::ensure!(tasks.is_empty(), "expected no tasks, found {}", tasks.len());
    Ok(())
}

#[then("exactly {count:usize} tasks are generated")]
fn tasks_generated(world: &SchedulingWorld, count: usize) -> Result<(), eyre::Report> {
    let tasks = world.generated()?;
    eyre::ensure!(
        tasks.len() == count,
        "expected {count} tasks, found {}",
        tasks.len()
    );
    Ok(())
}

#[then(r#"the pass generated tasks for job "{name}" only"#)]
fn pass_generated_for_job_only(world: &SchedulingWorld, name: String) -> Result<(), eyre::Report> {
    let owner = GenerationOwner::Job(world.job(&name)?.id());
    let tasks = world.generated()?;
    eyre::ensure!(!tasks.is_empty(), "pass generated nothing");
    let strays: Vec<&str> = tasks
        .iter()
        .filter(|task| task.owner().generation_owner() != owner)
        .map(Task::title)
        .collect();
    eyre::ensure!(strays.is_empty(), "unexpected tasks {strays:?}");
    Ok(())
}
