//! Users as resolved by the authentication collaborator.

use super::{Role, TaskDomainError, UserId};
use serde::{Deserialize, Serialize};

/// An authenticated user acting on boards and tasks.
///
/// The crate never authenticates anyone; callers hand over a `User` built
/// from whatever their authentication layer resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    role: Role,
}

impl User {
    /// Creates a user with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyUserName`] when the name is blank.
    pub fn new(name: impl Into<String>, role: Role) -> Result<Self, TaskDomainError> {
        Self::with_id(UserId::new(), name, role)
    }

    /// Creates a user with a known identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyUserName`] when the name is blank.
    pub fn with_id(
        id: UserId,
        name: impl Into<String>,
        role: Role,
    ) -> Result<Self, TaskDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyUserName);
        }
        Ok(Self {
            id,
            name: trimmed.to_owned(),
            role,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name recorded in history entries.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` for owner-role users.
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self.role, Role::Owner)
    }
}
