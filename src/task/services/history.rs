//! Status history log: append and ownership-filtered reads.

use super::{
    TaskBoardError, TaskBoardResult,
    access::{load_task, owned_board, require_owner},
};
use crate::task::{
    domain::{Board, BoardId, StatusChange, StatusChangeRecord, TaskId, TaskStatus, User},
    ports::TaskBoardStore,
};
use mockable::Clock;
use std::sync::Arc;

/// Append-only log of task status changes.
#[derive(Clone)]
pub struct StatusHistoryLog<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> StatusHistoryLog<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a history log over `store`.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Appends an already-built record.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskBoardError::Repository`] when storage fails. The
    /// append is not retried.
    pub async fn append(&self, record: &StatusChangeRecord) -> TaskBoardResult<()> {
        self.store.append_status_change(record).await?;
        Ok(())
    }

    /// Builds and appends the record for a transition the caller has already
    /// authorized and applied.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`] for unknown tasks,
    /// [`TaskBoardError::Transition`] when `from == to`, and
    /// [`super::TaskBoardError::Repository`] when storage fails.
    pub async fn record_transition(
        &self,
        task_id: TaskId,
        actor_name: &str,
        from: TaskStatus,
        to: TaskStatus,
    ) -> TaskBoardResult<StatusChangeRecord> {
        let task = load_task(&*self.store, task_id).await?;
        let change = StatusChange::between(from, to)?;
        let record = StatusChangeRecord::new(&task, actor_name, change, &*self.clock);
        self.append(&record).await?;
        tracing::info!(%task_id, actor = actor_name, %from, %to, "status change recorded");
        Ok(record)
    }

    /// Lists a task's history, oldest first. Only the board owner may read
    /// it. History of a deleted task stays readable through the board the
    /// records were written against.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`] when the task neither exists
    /// nor has history, [`TaskBoardError::Unauthorized`] when `actor` does
    /// not own the task's board, and [`TaskBoardError::Repository`] when
    /// storage fails.
    pub async fn list_for_task(
        &self,
        task_id: TaskId,
        actor: &User,
    ) -> TaskBoardResult<Vec<StatusChangeRecord>> {
        let records = self.store.find_status_changes(&[task_id]).await?;
        let board_id = match self.store.find_task(task_id).await? {
            Some(task) => task.board_id(),
            None => records
                .first()
                .map(StatusChangeRecord::board_id)
                .ok_or(TaskBoardError::TaskNotFound(task_id))?,
        };
        owned_board(&*self.store, board_id, actor).await?;
        tracing::debug!(%task_id, count = records.len(), "listed task history");
        Ok(records)
    }

    /// Lists the history of every task on boards owned by `owner`, oldest
    /// first. Records of deleted tasks are included.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthorized`] when `owner` is not an
    /// owner-role user and [`TaskBoardError::Repository`] when storage
    /// fails.
    pub async fn list_for_owner(&self, owner: &User) -> TaskBoardResult<Vec<StatusChangeRecord>> {
        require_owner(owner)?;
        let boards = self.store.find_boards_by_owner(owner.id()).await?;
        let board_ids: Vec<BoardId> = boards.iter().map(Board::id).collect();
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.store.find_status_changes_by_boards(&board_ids).await?;
        tracing::debug!(owner = %owner.id(), count = records.len(), "listed owner history");
        Ok(records)
    }
}
