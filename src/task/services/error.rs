//! Service-level error taxonomy.

use crate::task::{
    domain::{
        AssignmentDenial, BoardId, LabelId, TaskDomainError, TaskId, TransitionDenial, UserId,
    },
    ports::RepositoryError,
};
use thiserror::Error;

/// Errors returned by task board services.
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// A label title is already used on the task.
    #[error("label '{0}' already exists on this task")]
    DuplicateLabel(String),

    /// The board still has tasks or status history and cannot be deleted.
    #[error("board {0} still has tasks or status history")]
    BoardNotEmpty(BoardId),

    /// The actor may not perform the operation.
    #[error("not authorized to perform this operation")]
    Unauthorized,

    /// The transition authority refused the requested status.
    #[error(transparent)]
    Transition(#[from] TransitionDenial),

    /// The candidate cannot be assigned to the task.
    #[error(transparent)]
    Assignment(#[from] AssignmentDenial),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The board does not exist.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The label does not exist.
    #[error("label not found: {0}")]
    LabelNotFound(LabelId),

    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Another request changed the task first and the request no longer
    /// applies cleanly.
    #[error("task {0} was modified concurrently, reload and retry")]
    ConcurrentModification(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Coarse error classes a surrounding transport maps to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed input.
    Validation,
    /// The actor lacks permission.
    Authorization,
    /// The requested status equals the current one.
    NoOpTransition,
    /// The status is unknown or the edge is not permitted.
    UnknownTransition,
    /// A referenced record does not exist.
    NotFound,
    /// A concurrent write won.
    Conflict,
    /// Storage failed.
    Storage,
}

impl TaskBoardError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_)
            | Self::DuplicateLabel(_)
            | Self::BoardNotEmpty(_)
            | Self::Assignment(_)
            | Self::Repository(RepositoryError::DuplicateLabelTitle { .. }) => {
                ErrorKind::Validation
            }
            Self::Unauthorized => ErrorKind::Authorization,
            Self::Transition(TransitionDenial::SameStatus(_)) => ErrorKind::NoOpTransition,
            Self::Transition(
                TransitionDenial::UnknownStatus(_) | TransitionDenial::NotPermitted { .. },
            ) => ErrorKind::UnknownTransition,
            Self::TaskNotFound(_)
            | Self::BoardNotFound(_)
            | Self::LabelNotFound(_)
            | Self::UserNotFound(_)
            | Self::Repository(RepositoryError::NotFound { .. }) => ErrorKind::NotFound,
            Self::ConcurrentModification(_)
            | Self::Repository(RepositoryError::VersionConflict { .. }) => ErrorKind::Conflict,
            Self::Repository(
                RepositoryError::Duplicate { .. } | RepositoryError::Persistence(_),
            ) => ErrorKind::Storage,
        }
    }
}

/// Result type for task board service operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;
