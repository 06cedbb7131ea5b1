//! Racing transitions against a single task.

use std::sync::Arc;

use super::helpers::{Harness, harness};
use rstest::rstest;
use taskboard::task::{
    domain::{Role, TaskStatus},
    ports::{StatusHistoryRepository, TaskRepository},
    services::{BoardRequest, ChangeStatusRequest, ErrorKind, TaskRequest},
};

const RACERS: usize = 8;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_racer_commits_a_transition(harness: Harness) -> Result<(), eyre::Report> {
    let owner = harness.register("olivia", Role::Owner).await?;
    let board = harness
        .boards
        .create_board(&owner, BoardRequest::new("Race"))
        .await?;
    let task = harness
        .boards
        .create_task(&owner, board.id(), TaskRequest::new("Contended", "Work"))
        .await?;

    let transitions = Arc::new(harness.transitions);
    let mut handles = Vec::with_capacity(RACERS);
    for _ in 0..RACERS {
        let service = Arc::clone(&transitions);
        let actor = owner.clone();
        let task_id = task.id();
        handles.push(tokio::spawn(async move {
            service
                .change_status(&actor, ChangeStatusRequest::new(task_id, "done"))
                .await
        }));
    }

    let mut committed = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(_) => committed += 1,
            Err(err) => eyre::ensure!(
                matches!(err.kind(), ErrorKind::NoOpTransition | ErrorKind::Conflict),
                "unexpected racer error: {err}"
            ),
        }
    }

    eyre::ensure!(committed == 1, "expected one commit, got {committed}");
    let history = harness.store.find_status_changes(&[task.id()]).await?;
    eyre::ensure!(history.len() == 1, "expected one history record");
    let stored = harness
        .store
        .find_task(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(stored.status() == TaskStatus::Done, "task should be done");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_different_targets_never_loses_a_record(
    harness: Harness,
) -> Result<(), eyre::Report> {
    let owner = harness.register("olivia", Role::Owner).await?;
    let board = harness
        .boards
        .create_board(&owner, BoardRequest::new("Race"))
        .await?;
    let task = harness
        .boards
        .create_task(&owner, board.id(), TaskRequest::new("Contended", "Work"))
        .await?;

    let transitions = Arc::new(harness.transitions);
    let handles: Vec<_> = ["in-progress", "testing", "done"]
        .into_iter()
        .map(|status| {
            let service = Arc::clone(&transitions);
            let actor = owner.clone();
            let task_id = task.id();
            tokio::spawn(async move {
                service
                    .change_status(&actor, ChangeStatusRequest::new(task_id, status))
                    .await
            })
        })
        .collect();

    let mut committed = 0_usize;
    for handle in handles {
        if handle.await?.is_ok() {
            committed += 1;
        }
    }

    let history = harness.store.find_status_changes(&[task.id()]).await?;
    eyre::ensure!(
        history.len() == committed,
        "history has {} records for {committed} commits",
        history.len()
    );
    let stored = harness
        .store
        .find_task(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    let last = history
        .last()
        .ok_or_else(|| eyre::eyre!("at least one racer should commit"))?;
    eyre::ensure!(
        last.to_status() == stored.status(),
        "latest record should match the stored status"
    );
    Ok(())
}
