//! Free-form labels attached to tasks.

use super::{LabelId, TaskId, Title};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A label on a single task. Titles are unique per task, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    id: LabelId,
    task_id: TaskId,
    title: Title,
    created_at: DateTime<Utc>,
}

impl Label {
    /// Creates a label for `task_id`.
    #[must_use]
    pub fn new(task_id: TaskId, title: Title, clock: &impl Clock) -> Self {
        Self {
            id: LabelId::new(),
            task_id,
            title,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a label from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: LabelId,
        task_id: TaskId,
        title: Title,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            title,
            created_at,
        }
    }

    /// Returns the label identifier.
    #[must_use]
    pub const fn id(&self) -> LabelId {
        self.id
    }

    /// Returns the labelled task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the label title.
    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the label title.
    pub fn rename(&mut self, title: Title) {
        self.title = title;
    }
}
