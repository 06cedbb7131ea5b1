//! Error types for task board domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A board, task or label title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// A title exceeds the configured length limit.
    #[error("title exceeds {max} character limit")]
    TitleTooLong {
        /// Configured maximum length in characters.
        max: usize,
    },

    /// A task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// A user name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyUserName,

    /// A status change was applied to a task whose status no longer matches
    /// the change's origin.
    #[error("task {task_id} is in status {actual}, change expected {expected}")]
    StatusMismatch {
        /// Task the change was applied to.
        task_id: TaskId,
        /// Status the change was authorized from.
        expected: TaskStatus,
        /// Status the task actually has.
        actual: TaskStatus,
    },
}

/// Error returned while parsing task statuses from requests or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing user roles from storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
