//! End-to-end task journeys against the in-memory store.

use super::helpers::{Harness, harness};
use rstest::rstest;
use taskboard::task::{
    domain::{Role, StatusChangeRecord, TaskStatus},
    services::{
        AssignTaskRequest, BoardRequest, ChangeStatusRequest, TaskQuery, TaskRequest,
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_travels_from_to_do_to_close(harness: Harness) -> Result<(), eyre::Report> {
    let owner = harness.register("olivia", Role::Owner).await?;
    let developer = harness.register("devon", Role::Developer).await?;
    let tester = harness.register("tess", Role::Tester).await?;

    let board = harness
        .boards
        .create_board(&owner, BoardRequest::new("Release 1.0"))
        .await?;
    let task = harness
        .boards
        .create_task(
            &owner,
            board.id(),
            TaskRequest::new("Implement login", "Password login"),
        )
        .await?;
    harness
        .labels
        .add_label(&owner, task.id(), "backend")
        .await?;

    harness
        .assignments
        .assign(&owner, AssignTaskRequest::new(task.id(), developer.id()))
        .await?;
    for status in ["in-progress", "testing"] {
        harness
            .transitions
            .change_status(&developer, ChangeStatusRequest::new(task.id(), status))
            .await?;
    }

    let in_testing = harness.boards.list_tasks(&developer, &TaskQuery::new()).await?;
    eyre::ensure!(
        in_testing.is_empty(),
        "developer should be released once testing starts"
    );

    harness
        .assignments
        .assign(&owner, AssignTaskRequest::new(task.id(), tester.id()))
        .await?;
    harness
        .transitions
        .change_status(&tester, ChangeStatusRequest::new(task.id(), "dev-review"))
        .await?;
    for status in ["done", "close"] {
        harness
            .transitions
            .change_status(&owner, ChangeStatusRequest::new(task.id(), status))
            .await?;
    }

    let history = harness.history.list_for_task(task.id(), &owner).await?;
    let actors: Vec<&str> = history.iter().map(StatusChangeRecord::actor_name).collect();
    eyre::ensure!(
        actors == ["devon", "devon", "tess", "olivia", "olivia"],
        "unexpected actors: {actors:?}"
    );
    let last = history
        .last()
        .ok_or_else(|| eyre::eyre!("history should not be empty"))?;
    eyre::ensure!(
        last.to_status() == TaskStatus::Close,
        "task should end closed"
    );

    let filtered = harness
        .boards
        .list_tasks(&owner, &TaskQuery::new().with_label("BACK"))
        .await?;
    eyre::ensure!(filtered.len() == 1, "label filter should find the task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owners_see_only_their_own_history(harness: Harness) -> Result<(), eyre::Report> {
    let first_owner = harness.register("olivia", Role::Owner).await?;
    let second_owner = harness.register("oscar", Role::Owner).await?;

    for owner in [&first_owner, &second_owner] {
        let board = harness
            .boards
            .create_board(owner, BoardRequest::new("Board"))
            .await?;
        let task = harness
            .boards
            .create_task(owner, board.id(), TaskRequest::new("Task", "Work"))
            .await?;
        harness
            .transitions
            .change_status(owner, ChangeStatusRequest::new(task.id(), "in-progress"))
            .await?;
    }

    let first = harness.history.list_for_owner(&first_owner).await?;
    let second = harness.history.list_for_owner(&second_owner).await?;

    eyre::ensure!(first.len() == 1, "expected one record for the first owner");
    eyre::ensure!(second.len() == 1, "expected one record for the second owner");
    eyre::ensure!(
        first.first().map(StatusChangeRecord::task_id)
            != second.first().map(StatusChangeRecord::task_id),
        "owners should see different tasks"
    );
    Ok(())
}
