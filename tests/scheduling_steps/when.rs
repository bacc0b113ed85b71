//! When steps for scheduling BDD scenarios.

use super::world::{SchedulingWorld, run_async, scenario_date};
use eyre::WrapErr;
use hatchery::job::domain::JobCategory;
use rstest_bdd_macros::when;

#[when("the advancement sweep runs")]
fn advancement_sweep_runs(world: &mut SchedulingWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.advancement().check_and_advance_phases())
        .wrap_err("run advancement sweep")?;
    world.sweeps.push(report);
    Ok(())
}

#[when(r#"tasks are generated for the project on "{date}""#)]
fn generate_for_project(world: &mut SchedulingWorld, date: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let due_date = scenario_date(&date)?;
    let orchestrator = world.orchestrator();
    let tasks = run_async(
        orchestrator
            .generation()
            .generate_tasks_for_project(project_id, Some(due_date)),
    )
    .wrap_err("generate project tasks")?;
    world.generated = Some(tasks);
    Ok(())
}

#[when(r#"tasks are generated for job "{name}" on "{date}""#)]
fn generate_for_job(
    world: &mut SchedulingWorld,
    name: String,
    date: String,
) -> Result<(), eyre::Report> {
    let job_id = world.job(&name)?.id();
    let due_date = scenario_date(&date)?;
    let orchestrator = world.orchestrator();
    let tasks = run_async(
        orchestrator
            .generation()
            .generate_tasks_for_job(job_id, Some(due_date)),
    )
    .wrap_err("generate job tasks")?;
    world.generated = Some(tasks);
    Ok(())
}

#[when(r#"the "{category}" category pass runs on "{date}""#)]
fn category_pass_runs(
    world: &mut SchedulingWorld,
    category: String,
    date: String,
) -> Result<(), eyre::Report> {
    let parsed = JobCategory::try_from(category.as_str())?;
    let due_date = scenario_date(&date)?;
    let report = run_async(
        world
            .orchestrator()
            .generate_tasks_by_category(parsed, Some(due_date)),
    )
    .wrap_err("run category pass")?;
    eyre::ensure!(report.failures.is_empty(), "category pass reported failures");
    world.generated = Some(report.tasks);
    Ok(())
}

#[when(r#"the regular pass runs on "{date}""#)]
fn regular_pass_runs(world: &mut SchedulingWorld, date: String) -> Result<(), eyre::Report> {
    let due_date = scenario_date(&date)?;
    let report = run_async(world.orchestrator().generate_regular_tasks(Some(due_date)))
        .wrap_err("run regular pass")?;
    eyre::ensure!(report.failures.is_empty(), "regular pass reported failures");
    world.generated = Some(report.tasks);
    Ok(())
}
