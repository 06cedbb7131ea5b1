//! Role and status compatibility rules for task assignment.

use super::{Role, TaskStatus};
use thiserror::Error;

/// Reasons a candidate cannot be assigned to a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignmentDenial {
    /// Owners are never assignees.
    #[error("cannot assign to an owner")]
    OwnerCandidate,

    /// Developers only take tasks in `to-do` or `in-progress`.
    #[error("cannot assign to developer in this status")]
    DeveloperStatus(TaskStatus),

    /// Testers only take tasks in `testing`.
    #[error("cannot assign to tester in this status")]
    TesterStatus(TaskStatus),
}

/// Checks whether a user with `role` may hold a task in `status`.
///
/// # Errors
///
/// Returns the matching [`AssignmentDenial`] when the role cannot hold a
/// task in that status.
pub const fn check_assignment(role: Role, status: TaskStatus) -> Result<(), AssignmentDenial> {
    match role {
        Role::Owner => Err(AssignmentDenial::OwnerCandidate),
        Role::Developer => match status {
            TaskStatus::ToDo | TaskStatus::InProgress => Ok(()),
            _ => Err(AssignmentDenial::DeveloperStatus(status)),
        },
        Role::Tester => match status {
            TaskStatus::Testing => Ok(()),
            _ => Err(AssignmentDenial::TesterStatus(status)),
        },
    }
}

/// Returns `true` when a user with `role` may hold a task in `status`.
#[must_use]
pub const fn role_accepts_status(role: Role, status: TaskStatus) -> bool {
    check_assignment(role, status).is_ok()
}
