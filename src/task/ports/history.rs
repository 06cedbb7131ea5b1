//! Append-only status history port.

use super::RepositoryResult;
use crate::task::domain::{BoardId, StatusChangeRecord, TaskId};
use async_trait::async_trait;

/// Storage for immutable status change records.
///
/// There are no update or delete operations by contract.
#[async_trait]
pub trait StatusHistoryRepository: Send + Sync {
    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns [`super::RepositoryError::Duplicate`] when the record ID is
    /// already present, or a persistence error from the store.
    async fn append_status_change(&self, record: &StatusChangeRecord) -> RepositoryResult<()>;

    /// Returns the records of the given tasks ordered by `created_at`
    /// ascending, with insertion order breaking ties.
    async fn find_status_changes(
        &self,
        task_ids: &[TaskId],
    ) -> RepositoryResult<Vec<StatusChangeRecord>>;

    /// Returns the records of tasks on the given boards, including tasks
    /// that have since been deleted, in the same order as
    /// [`Self::find_status_changes`].
    async fn find_status_changes_by_boards(
        &self,
        board_ids: &[BoardId],
    ) -> RepositoryResult<Vec<StatusChangeRecord>>;
}
