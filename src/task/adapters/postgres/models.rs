//! Diesel row models for task board persistence.

use super::schema::{boards, status_changes, task_labels, tasks, users};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Row model for users.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Role name.
    pub role: String,
}

/// Row model for boards.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct BoardRow {
    /// Board identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: uuid::Uuid,
    /// Board title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for tasks.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning board.
    pub board_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Assigned user, if any.
    pub assignee_id: Option<uuid::Uuid>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for task labels.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_labels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LabelRow {
    /// Label identifier.
    pub id: uuid::Uuid,
    /// Labelled task.
    pub task_id: uuid::Uuid,
    /// Label title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query result row for status history records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = status_changes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusChangeRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Task whose status changed.
    pub task_id: uuid::Uuid,
    /// Board the task belonged to.
    pub board_id: uuid::Uuid,
    /// Acting user's name.
    pub actor_name: String,
    /// Status before the change.
    pub from_status: String,
    /// Status after the change.
    pub to_status: String,
    /// Stored change description.
    pub detail: String,
    /// Time the change was recorded.
    pub created_at: DateTime<Utc>,
}

/// Insert model for status history records. `position` is assigned by the
/// database sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = status_changes)]
pub struct NewStatusChangeRow {
    /// Record identifier.
    pub id: uuid::Uuid,
    /// Task whose status changed.
    pub task_id: uuid::Uuid,
    /// Board the task belonged to.
    pub board_id: uuid::Uuid,
    /// Acting user's name.
    pub actor_name: String,
    /// Status before the change.
    pub from_status: String,
    /// Status after the change.
    pub to_status: String,
    /// Stored change description.
    pub detail: String,
    /// Time the change was recorded.
    pub created_at: DateTime<Utc>,
}
