//! Repository ports for users, boards, tasks and labels.
//!
//! Method names are distinct across ports so one store can implement all of
//! them without call-site ambiguity.

use crate::task::domain::{
    Board, BoardId, Label, LabelId, StatusChangeRecord, Task, TaskId, TaskVersion, User, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Lookup of users resolved by the authentication collaborator.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Stores a user record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the user already exists.
    async fn store_user(&self, user: &User) -> RepositoryResult<()>;

    /// Finds a user by identifier. Returns `None` when absent.
    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>>;
}

/// Board persistence contract.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Stores a new board.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the board already exists.
    async fn store_board(&self, board: &Board) -> RepositoryResult<()>;

    /// Persists changes to an existing board.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the board does not exist.
    async fn update_board(&self, board: &Board) -> RepositoryResult<()>;

    /// Finds a board by identifier. Returns `None` when absent.
    async fn find_board(&self, id: BoardId) -> RepositoryResult<Option<Board>>;

    /// Returns every board owned by `owner_id`, oldest first.
    async fn find_boards_by_owner(&self, owner_id: UserId) -> RepositoryResult<Vec<Board>>;

    /// Deletes a board.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the board does not exist.
    async fn delete_board(&self, id: BoardId) -> RepositoryResult<()>;
}

/// Task persistence contract.
///
/// Every write is a compare-and-swap on the task version read by the caller.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the task already exists.
    async fn store_task(&self, task: &Task) -> RepositoryResult<()>;

    /// Persists a mutated task if the stored version still equals
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the task does not exist and
    /// [`RepositoryError::VersionConflict`] when another write won.
    async fn update_task(&self, task: &Task, expected: TaskVersion) -> RepositoryResult<()>;

    /// Persists a status transition and appends its history record as one
    /// atomic unit, guarded by the same version check as
    /// [`TaskRepository::update_task`].
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::VersionConflict`] when another write won;
    /// in that case neither the task nor the history changes.
    async fn apply_transition(
        &self,
        task: &Task,
        expected: TaskVersion,
        record: &StatusChangeRecord,
    ) -> RepositoryResult<()>;

    /// Finds a task by identifier. Returns `None` when absent.
    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>>;

    /// Returns every task on the given boards.
    async fn find_tasks_by_boards(&self, board_ids: &[BoardId]) -> RepositoryResult<Vec<Task>>;

    /// Returns every task assigned to `assignee`.
    async fn find_tasks_by_assignee(&self, assignee: UserId) -> RepositoryResult<Vec<Task>>;

    /// Deletes a task together with its labels. History records are kept.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the task does not exist.
    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()>;
}

/// Label persistence contract.
#[async_trait]
pub trait LabelRepository: Send + Sync {
    /// Stores a new label.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Duplicate`] when the label already exists
    /// and [`RepositoryError::DuplicateLabelTitle`] when the task already
    /// has a label with the same title, ignoring case.
    async fn store_label(&self, label: &Label) -> RepositoryResult<()>;

    /// Persists a renamed label.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the label does not exist
    /// and [`RepositoryError::DuplicateLabelTitle`] when another label on
    /// the task already uses the new title.
    async fn update_label(&self, label: &Label) -> RepositoryResult<()>;

    /// Finds a label by identifier. Returns `None` when absent.
    async fn find_label(&self, id: LabelId) -> RepositoryResult<Option<Label>>;

    /// Returns the labels of the given tasks, oldest first.
    async fn find_labels_by_tasks(&self, task_ids: &[TaskId]) -> RepositoryResult<Vec<Label>>;

    /// Deletes a label.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the label does not exist.
    async fn delete_label(&self, id: LabelId) -> RepositoryResult<()>;
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate {entity} identifier: {id}")]
    Duplicate {
        /// Kind of record.
        entity: &'static str,
        /// Conflicting identifier.
        id: String,
    },

    /// A task already has a label with this title, ignoring case.
    #[error("task {task_id} already has label '{title}'")]
    DuplicateLabelTitle {
        /// Labelled task.
        task_id: TaskId,
        /// Title that clashed.
        title: String,
    },

    /// The record was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Missing identifier.
        id: String,
    },

    /// The task changed since it was read.
    #[error("task {task_id} was modified concurrently (expected version {expected})")]
    VersionConflict {
        /// Contended task.
        task_id: TaskId,
        /// Version the writer read.
        expected: TaskVersion,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a [`RepositoryError::Duplicate`].
    #[must_use]
    pub fn duplicate(entity: &'static str, id: impl ToString) -> Self {
        Self::Duplicate {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a [`RepositoryError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
