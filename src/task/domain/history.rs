//! Immutable audit records of task status changes.

use super::{BoardId, StatusChange, StatusChangeId, Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One entry in a task's status history.
///
/// Records are written once per successful transition and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRecord {
    id: StatusChangeId,
    task_id: TaskId,
    board_id: BoardId,
    actor_name: String,
    from: TaskStatus,
    to: TaskStatus,
    detail: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStatusChangeData {
    /// Record identifier.
    pub id: StatusChangeId,
    /// Task whose status changed.
    pub task_id: TaskId,
    /// Board the task belonged to when the change was made.
    pub board_id: BoardId,
    /// Name of the actor who made the change.
    pub actor_name: String,
    /// Status before the change.
    pub from: TaskStatus,
    /// Status after the change.
    pub to: TaskStatus,
    /// Stored description of the change.
    pub detail: String,
    /// Time the change was recorded.
    pub created_at: DateTime<Utc>,
}

impl StatusChangeRecord {
    /// Builds the record for an authorized change to `task`.
    ///
    /// The record keeps the task's board so it stays readable by the board
    /// owner after the task is deleted.
    #[must_use]
    pub fn new(
        task: &Task,
        actor_name: impl Into<String>,
        change: StatusChange,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: StatusChangeId::new(),
            task_id: task.id(),
            board_id: task.board_id(),
            actor_name: actor_name.into(),
            from: change.from(),
            to: change.to(),
            detail: change.detail(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStatusChangeData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            board_id: data.board_id,
            actor_name: data.actor_name,
            from: data.from,
            to: data.to,
            detail: data.detail,
            created_at: data.created_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> StatusChangeId {
        self.id
    }

    /// Returns the task whose status changed.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the board the task belonged to.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the acting user's name.
    #[must_use]
    pub fn actor_name(&self) -> &str {
        &self.actor_name
    }

    /// Returns the status before the change.
    #[must_use]
    pub const fn from_status(&self) -> TaskStatus {
        self.from
    }

    /// Returns the status after the change.
    #[must_use]
    pub const fn to_status(&self) -> TaskStatus {
        self.to
    }

    /// Returns the description of the change.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns when the change was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
