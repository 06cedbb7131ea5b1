//! When steps for task status transition BDD scenarios.

use super::world::{TransitionWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::task::services::{AssignTaskRequest, ChangeStatusRequest};

#[when(r#""{actor}" moves the task to "{status}""#)]
fn move_task(
    world: &mut TransitionWorld,
    actor: String,
    status: String,
) -> Result<(), eyre::Report> {
    let actor_user = world.user(&actor)?;
    let task_id = world.task()?.id();

    let result = run_async(
        world
            .transitions
            .change_status(&actor_user, ChangeStatusRequest::new(task_id, status)),
    );
    if let Ok(ref outcome) = result {
        world.task = Some(outcome.task().clone());
    }
    world.last_transition = Some(result);
    Ok(())
}

#[when(r#"the owner assigns the task to "{name}""#)]
fn owner_assigns(world: &mut TransitionWorld, name: String) -> Result<(), eyre::Report> {
    let candidate = world.user(&name)?;
    let owner = world.owner()?;
    let task_id = world.task()?.id();

    let result = run_async(
        world
            .assignments
            .assign(&owner, AssignTaskRequest::new(task_id, candidate.id())),
    );
    if let Ok(ref task) = result {
        world.task = Some(task.clone());
    }
    world.last_assignment = Some(result);
    Ok(())
}
