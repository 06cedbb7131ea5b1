//! Task aggregate root.

use super::{
    AssignmentDenial, BoardId, StatusChange, TaskDomainError, TaskId, TaskStatus, TaskVersion,
    Title, User, UserId, check_assignment,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Editable task fields supplied at creation and on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    title: Title,
    description: String,
    due_date: Option<NaiveDate>,
}

impl TaskDetails {
    /// Creates validated task details.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] when the description is
    /// blank.
    pub fn new(title: Title, description: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = description.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        Ok(Self {
            title,
            description: trimmed.to_owned(),
            due_date: None,
        })
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    board_id: BoardId,
    title: Title,
    description: String,
    status: TaskStatus,
    assignee: Option<UserId>,
    due_date: Option<NaiveDate>,
    version: TaskVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Board the task belongs to.
    pub board_id: BoardId,
    /// Task title.
    pub title: Title,
    /// Task description.
    pub description: String,
    /// Current workflow status.
    pub status: TaskStatus,
    /// Assigned user, if any.
    pub assignee: Option<UserId>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optimistic concurrency version.
    pub version: TaskVersion,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new unassigned task in `to-do` on the given board.
    #[must_use]
    pub fn new(board_id: BoardId, details: TaskDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            board_id,
            title: details.title,
            description: details.description,
            status: TaskStatus::ToDo,
            assignee: None,
            due_date: details.due_date,
            version: TaskVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            title: data.title,
            description: data.description,
            status: data.status,
            assignee: data.assignee,
            due_date: data.due_date,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning board.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns `true` when `user_id` is the current assignee.
    #[must_use]
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.assignee == Some(user_id)
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the optimistic concurrency version.
    #[must_use]
    pub const fn version(&self) -> TaskVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the editable task fields.
    pub fn update_details(&mut self, details: TaskDetails, clock: &impl Clock) {
        self.title = details.title;
        self.description = details.description;
        self.due_date = details.due_date;
        self.touch(clock);
    }

    /// Applies an authorized status change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::StatusMismatch`] when the task is no longer
    /// in the status the change was authorized from.
    pub fn apply_status_change(
        &mut self,
        change: StatusChange,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status != change.from() {
            return Err(TaskDomainError::StatusMismatch {
                task_id: self.id,
                expected: change.from(),
                actual: self.status,
            });
        }
        self.status = change.to();
        self.touch(clock);
        Ok(())
    }

    /// Assigns the task to `candidate`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssignmentDenial`] when the candidate's role cannot hold
    /// a task in the current status.
    pub fn assign(&mut self, candidate: &User, clock: &impl Clock) -> Result<(), AssignmentDenial> {
        check_assignment(candidate.role(), self.status)?;
        self.assignee = Some(candidate.id());
        self.touch(clock);
        Ok(())
    }

    /// Removes the current assignee.
    pub fn unassign(&mut self, clock: &impl Clock) {
        self.assignee = None;
        self.touch(clock);
    }

    /// Bumps the version and the `updated_at` timestamp.
    fn touch(&mut self, clock: &impl Clock) {
        self.version = self.version.next();
        self.updated_at = clock.utc();
    }
}
