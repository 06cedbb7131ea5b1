//! Status history ordering and retention against `PostgreSQL`.

use super::helpers::PgHarness;
use chrono::Utc;
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::rstest;
use taskboard::task::{
    domain::{
        PersistedStatusChangeData, StatusChangeId, StatusChangeRecord, TaskStatus,
    },
    ports::{LabelRepository, StatusHistoryRepository},
    services::ChangeStatusRequest,
};

#[rstest]
fn equal_timestamps_keep_insertion_order(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_history_ties")?;
    let (_owner, board, task) = harness.seed()?;
    let created_at = Utc::now();
    let steps = [
        (TaskStatus::ToDo, TaskStatus::InProgress),
        (TaskStatus::InProgress, TaskStatus::Testing),
        (TaskStatus::Testing, TaskStatus::DevReview),
    ];

    let mut appended = Vec::with_capacity(steps.len());
    for (from, to) in steps {
        let record = StatusChangeRecord::from_persisted(PersistedStatusChangeData {
            id: StatusChangeId::new(),
            task_id: task.id(),
            board_id: board.id(),
            actor_name: "olivia".to_owned(),
            from,
            to,
            detail: format!("Change status from {from} to {to}."),
            created_at,
        });
        harness
            .runtime
            .block_on(harness.store.append_status_change(&record))?;
        appended.push(record.id());
    }

    let by_task = harness
        .runtime
        .block_on(harness.store.find_status_changes(&[task.id()]))?;
    let by_board = harness
        .runtime
        .block_on(harness.store.find_status_changes_by_boards(&[board.id()]))?;
    let task_order: Vec<StatusChangeId> = by_task.iter().map(StatusChangeRecord::id).collect();
    let board_order: Vec<StatusChangeId> = by_board.iter().map(StatusChangeRecord::id).collect();
    eyre::ensure!(task_order == appended, "ties should keep insertion order");
    eyre::ensure!(board_order == appended, "board view should use the same order");
    Ok(())
}

#[rstest]
fn deleting_a_task_drops_labels_and_keeps_history(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let harness = PgHarness::prepare(shared_test_cluster, "pg_history_delete")?;
    let (owner, board, task) = harness.seed()?;
    harness
        .runtime
        .block_on(harness.labels.add_label(&owner, task.id(), "backend"))?;
    harness.runtime.block_on(
        harness
            .transitions
            .change_status(&owner, ChangeStatusRequest::new(task.id(), "in-progress")),
    )?;

    harness
        .runtime
        .block_on(harness.boards.delete_task(&owner, task.id()))?;

    let labels = harness
        .runtime
        .block_on(harness.store.find_labels_by_tasks(&[task.id()]))?;
    eyre::ensure!(labels.is_empty(), "labels should go with the task");

    let owner_view = harness
        .runtime
        .block_on(harness.history.list_for_owner(&owner))?;
    let task_view = harness
        .runtime
        .block_on(harness.history.list_for_task(task.id(), &owner))?;
    eyre::ensure!(owner_view.len() == 1, "owner should still see the record");
    eyre::ensure!(task_view == owner_view, "task view should match owner view");

    let board_delete = harness
        .runtime
        .block_on(harness.boards.delete_board(&owner, board.id()));
    eyre::ensure!(
        board_delete.is_err(),
        "a board with history should not be deleted"
    );
    Ok(())
}
