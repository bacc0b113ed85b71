//! Given steps for scheduling BDD scenarios.

use super::world::{SchedulingWorld, run_async, scenario_date, split_titles};
use chrono::Duration;
use eyre::WrapErr;
use hatchery::job::{domain::Job, ports::JobRepository};
use hatchery::project::{
    domain::{Phase, PhaseOrder, Project, Template, TemplateKind},
    ports::{PhaseCatalog, ProjectRepository},
};
use hatchery::task::{
    domain::{TaskTemplate, TemplateParent},
    ports::TaskTemplateCatalog,
};
use mockable::Clock;
use rstest_bdd_macros::given;

fn store_phase(world: &mut SchedulingWorld, phase: Phase) -> Result<(), eyre::Report> {
    run_async(world.projects.store_phase(&phase)).wrap_err("store phase")?;
    world.phases.insert(phase.name().to_owned(), phase);
    Ok(())
}

fn store_templates(
    world: &SchedulingWorld,
    parent: TemplateParent,
    titles: &str,
) -> Result<(), eyre::Report> {
    for (order_index, title) in (0..).zip(split_titles(titles)) {
        let template = TaskTemplate::new(parent, title, order_index)?;
        run_async(world.tasks.store_template(&template)).wrap_err("store task template")?;
    }
    Ok(())
}

#[given("a lifecycle template")]
fn lifecycle_template(world: &mut SchedulingWorld) -> Result<(), eyre::Report> {
    let template = Template::new("Clownfish", TemplateKind::Lifecycle, &*world.clock)?;
    run_async(world.projects.store_template(&template)).wrap_err("store template")?;
    world.template = Some(template);
    Ok(())
}

#[given(r#"phase "{name}" at order {order:i32} lasting {days:u32} days"#)]
fn timed_phase(
    world: &mut SchedulingWorld,
    name: String,
    order: i32,
    days: u32,
) -> Result<(), eyre::Report> {
    let phase = Phase::new(world.template()?.id(), name, PhaseOrder::new(order))?
        .with_duration_days(days);
    store_phase(world, phase)
}

#[given(r#"phase "{name}" at order {order:i32} without a duration"#)]
fn open_ended_phase(
    world: &mut SchedulingWorld,
    name: String,
    order: i32,
) -> Result<(), eyre::Report> {
    let phase = Phase::new(world.template()?.id(), name, PhaseOrder::new(order))?;
    store_phase(world, phase)
}

#[given(r#"phase "{name}" has tasks "{titles}""#)]
fn phase_has_tasks(
    world: &mut SchedulingWorld,
    name: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let parent = TemplateParent::Phase(world.phase(&name)?.id());
    store_templates(world, parent, &titles)
}

#[given(r#"a project currently in phase "{name}" that started {days:i64} days ago"#)]
fn project_in_phase(
    world: &mut SchedulingWorld,
    name: String,
    days: i64,
) -> Result<(), eyre::Report> {
    let phase = world.phase(&name)?;
    let started_at = world.clock.utc() - Duration::days(days);
    let project = Project::new(
        "Batch 7",
        Some(phase.template_id()),
        Some(phase.id()),
        &*world.clock,
    )?
    .with_started_at(started_at);
    run_async(world.projects.store(&project)).wrap_err("store project")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a job "{name}" repeating every {days:u32} days with tasks "{titles}""#)]
fn job_with_tasks(
    world: &mut SchedulingWorld,
    name: String,
    days: u32,
    titles: String,
) -> Result<(), eyre::Report> {
    let job = Job::new(name.as_str(), days, &*world.clock)?;
    run_async(world.jobs.store(&job)).wrap_err("store job")?;
    store_templates(world, TemplateParent::Job(job.id()), &titles)?;
    world.named_jobs.insert(name, job);
    Ok(())
}

#[given(r#"tasks for job "{name}" were generated on "{date}""#)]
fn job_generated_on(
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
    .wrap_err("seed earlier job generation")?;
    eyre::ensure!(!tasks.is_empty(), "seed generation produced no tasks");
    Ok(())
}
