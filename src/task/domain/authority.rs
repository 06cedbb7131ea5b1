//! Role-based authorization of task status transitions.
//!
//! All transition rules live in one table keyed by `(role, from)`. The
//! authority is pure: it reads nothing but its arguments and its policy, so
//! identical inputs always produce identical decisions.

use super::{Role, TaskStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status change that the authority has allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusChange {
    from: TaskStatus,
    to: TaskStatus,
}

impl StatusChange {
    /// Describes a change between two distinct statuses without applying
    /// any role rules. For callers that authorized the change themselves.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionDenial::SameStatus`] when `from == to`.
    pub fn between(from: TaskStatus, to: TaskStatus) -> Result<Self, TransitionDenial> {
        if from == to {
            return Err(TransitionDenial::SameStatus(from));
        }
        Ok(Self { from, to })
    }

    /// Returns the status the task leaves.
    #[must_use]
    pub const fn from(self) -> TaskStatus {
        self.from
    }

    /// Returns the status the task enters.
    #[must_use]
    pub const fn to(self) -> TaskStatus {
        self.to
    }

    /// Returns the human-readable history detail for this change.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskboard::task::domain::{Role, TaskStatus, authorize};
    ///
    /// let change = authorize(Role::Developer, TaskStatus::ToDo, TaskStatus::InProgress)
    ///     .expect("developers may start work");
    /// assert_eq!(change.detail(), "Change status from to-do to in-progress.");
    /// ```
    #[must_use]
    pub fn detail(self) -> String {
        format!("Change status from {} to {}.", self.from, self.to)
    }
}

/// Reasons the authority refuses a transition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionDenial {
    /// The requested status equals the current one.
    #[error("no-op: same status.")]
    SameStatus(TaskStatus),

    /// The requested status is not part of the workflow.
    #[error("unknown status")]
    UnknownStatus(String),

    /// The edge is outside the actor's permitted set.
    #[error("transition not permitted for this role")]
    NotPermitted {
        /// Role of the requesting actor.
        role: Role,
        /// Current task status.
        from: TaskStatus,
        /// Requested task status.
        to: TaskStatus,
    },
}

/// How far owners may move tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OwnerTransitionPolicy {
    /// Owners may move a task between any two distinct statuses.
    #[default]
    Unrestricted,
    /// Owners may only move a task later in the workflow.
    ForwardOnly,
}

/// Decides whether an actor may move a task between two statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionAuthority {
    owner_policy: OwnerTransitionPolicy,
}

impl TransitionAuthority {
    /// Creates an authority with the given owner policy.
    #[must_use]
    pub const fn new(owner_policy: OwnerTransitionPolicy) -> Self {
        Self { owner_policy }
    }

    /// Returns the owner policy in force.
    #[must_use]
    pub const fn owner_policy(&self) -> OwnerTransitionPolicy {
        self.owner_policy
    }

    /// Authorizes a transition between two known statuses.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionDenial::SameStatus`] when `from == to` and
    /// [`TransitionDenial::NotPermitted`] when the edge is outside the role's
    /// permitted set.
    pub fn authorize(
        &self,
        role: Role,
        from: TaskStatus,
        to: TaskStatus,
    ) -> Result<StatusChange, TransitionDenial> {
        if from == to {
            return Err(TransitionDenial::SameStatus(from));
        }
        if !self.permits(role, from, to) {
            return Err(TransitionDenial::NotPermitted { role, from, to });
        }
        Ok(StatusChange { from, to })
    }

    /// Authorizes a transition to a status supplied as raw text.
    ///
    /// Any accepted spelling of the current status is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionDenial::UnknownStatus`] when `requested` does not
    /// name a workflow status, otherwise the errors of
    /// [`TransitionAuthority::authorize`].
    pub fn authorize_requested(
        &self,
        role: Role,
        current: TaskStatus,
        requested: &str,
    ) -> Result<StatusChange, TransitionDenial> {
        let target = TaskStatus::try_from(requested)
            .map_err(|err| TransitionDenial::UnknownStatus(err.0))?;
        self.authorize(role, current, target)
    }

    /// Returns every status `role` may move a task to from `from`.
    #[must_use]
    pub fn permitted_targets(&self, role: Role, from: TaskStatus) -> Vec<TaskStatus> {
        TaskStatus::ALL
            .into_iter()
            .filter(|to| *to != from && self.permits(role, from, *to))
            .collect()
    }

    fn permits(&self, role: Role, from: TaskStatus, to: TaskStatus) -> bool {
        match role {
            Role::Owner => match self.owner_policy {
                OwnerTransitionPolicy::Unrestricted => true,
                OwnerTransitionPolicy::ForwardOnly => from.precedes(to),
            },
            Role::Developer | Role::Tester => restricted_targets(role, from).contains(&to),
        }
    }
}

/// Permitted targets for the non-owner roles.
const fn restricted_targets(role: Role, from: TaskStatus) -> &'static [TaskStatus] {
    match (role, from) {
        (Role::Developer, TaskStatus::ToDo) => &[TaskStatus::InProgress],
        (Role::Developer, TaskStatus::InProgress) => &[TaskStatus::Testing],
        (Role::Tester, TaskStatus::Testing) => &[TaskStatus::DevReview],
        _ => &[],
    }
}

/// Authorizes a transition with the default (unrestricted owner) policy.
///
/// # Errors
///
/// See [`TransitionAuthority::authorize`].
pub fn authorize(
    role: Role,
    from: TaskStatus,
    to: TaskStatus,
) -> Result<StatusChange, TransitionDenial> {
    TransitionAuthority::default().authorize(role, from, to)
}
