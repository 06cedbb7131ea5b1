//! Version-guarded task writes against `PostgreSQL`.

use std::sync::Arc;

use super::helpers::PgHarness;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskboard::task::{
    domain::{StatusChange, StatusChangeRecord, TaskId, TaskStatus},
    ports::{RepositoryError, StatusHistoryRepository, TaskRepository},
    services::{ChangeStatusRequest, ErrorKind},
};

#[rstest]
fn transition_commits_status_and_history_together(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_transition_commit")?;
    let (owner, _board, task) = harness.seed()?;

    let outcome = harness.runtime.block_on(
        harness
            .transitions
            .change_status(&owner, ChangeStatusRequest::new(task.id(), "in-progress")),
    )?;

    let stored = harness
        .runtime
        .block_on(harness.store.find_task(task.id()))?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    let history = harness
        .runtime
        .block_on(harness.store.find_status_changes(&[task.id()]))?;
    eyre::ensure!(
        stored.status() == TaskStatus::InProgress,
        "status should be persisted"
    );
    eyre::ensure!(
        stored.version() == task.version().next(),
        "version should advance by one"
    );
    eyre::ensure!(
        history == vec![outcome.record().clone()],
        "history should hold exactly the committed record"
    );
    Ok(())
}

#[rstest]
fn stale_transition_leaves_no_history_row(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_transition_stale")?;
    let (owner, _board, task) = harness.seed()?;
    let mut stale = task.clone();
    harness.runtime.block_on(
        harness
            .transitions
            .change_status(&owner, ChangeStatusRequest::new(task.id(), "in-progress")),
    )?;

    let change = StatusChange::between(TaskStatus::ToDo, TaskStatus::Done)?;
    stale.apply_status_change(change, &*harness.clock)?;
    let record = StatusChangeRecord::new(&stale, owner.name(), change, &*harness.clock);
    let result = harness
        .runtime
        .block_on(harness.store.apply_transition(&stale, task.version(), &record));

    eyre::ensure!(
        matches!(result, Err(RepositoryError::VersionConflict { task_id, .. }) if task_id == task.id()),
        "stale write should conflict, got {result:?}"
    );
    let history = harness
        .runtime
        .block_on(harness.store.find_status_changes(&[task.id()]))?;
    eyre::ensure!(history.len() == 1, "losing write must not add history");
    eyre::ensure!(
        history.iter().all(|entry| entry.id() != record.id()),
        "losing record must be rolled back"
    );
    let stored = harness
        .runtime
        .block_on(harness.store.find_task(task.id()))?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(
        stored.status() == TaskStatus::InProgress,
        "stored status should be the winner's"
    );
    Ok(())
}

#[rstest]
fn update_task_checks_version_and_existence(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_transition_update")?;
    let (owner, _board, task) = harness.seed()?;
    harness.runtime.block_on(
        harness
            .transitions
            .change_status(&owner, ChangeStatusRequest::new(task.id(), "testing")),
    )?;

    let stale = harness
        .runtime
        .block_on(harness.store.update_task(&task, task.version()));
    eyre::ensure!(
        matches!(stale, Err(RepositoryError::VersionConflict { .. })),
        "stale update should conflict, got {stale:?}"
    );

    harness
        .runtime
        .block_on(harness.boards.delete_task(&owner, task.id()))?;
    let missing = harness
        .runtime
        .block_on(harness.store.update_task(&task, task.version()));
    eyre::ensure!(
        matches!(missing, Err(RepositoryError::NotFound { entity: "task", .. })),
        "update of a deleted task should be not found, got {missing:?}"
    );
    Ok(())
}

#[rstest]
fn racing_transitions_commit_once(shared_test_cluster: &'static TestCluster) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_transition_race")?;
    let (owner, _board, task) = harness.seed()?;
    let task_id: TaskId = task.id();

    let results = harness.runtime.block_on(async {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let racer = Arc::clone(&harness.transitions);
                let actor = owner.clone();
                tokio::spawn(async move {
                    racer
                        .change_status(&actor, ChangeStatusRequest::new(task_id, "done"))
                        .await
                })
            })
            .collect();
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await?);
        }
        Ok::<_, eyre::Report>(results)
    })?;

    let committed = results.iter().filter(|result| result.is_ok()).count();
    eyre::ensure!(committed == 1, "expected one commit, got {committed}");
    for err in results.iter().filter_map(|result| result.as_ref().err()) {
        eyre::ensure!(
            matches!(err.kind(), ErrorKind::NoOpTransition | ErrorKind::Conflict),
            "unexpected racer error: {err}"
        );
    }
    let history = harness
        .runtime
        .block_on(harness.store.find_status_changes(&[task_id]))?;
    eyre::ensure!(history.len() == 1, "exactly one history row expected");
    Ok(())
}
