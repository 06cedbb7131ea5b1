//! Workflow status of a task.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task workflow status, declared in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not started.
    #[serde(rename = "to-do")]
    ToDo,
    /// A developer is implementing the task.
    #[serde(rename = "in-progress")]
    InProgress,
    /// A tester is verifying the work.
    #[serde(rename = "testing")]
    Testing,
    /// Testing finished; the work is back with development for review.
    #[serde(rename = "dev-review")]
    DevReview,
    /// The work is complete.
    #[serde(rename = "done")]
    Done,
    /// The task is closed.
    #[serde(rename = "close")]
    Close,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 6] = [
        Self::ToDo,
        Self::InProgress,
        Self::Testing,
        Self::DevReview,
        Self::Done,
        Self::Close,
    ];

    /// Returns the canonical wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "to-do",
            Self::InProgress => "in-progress",
            Self::Testing => "testing",
            Self::DevReview => "dev-review",
            Self::Done => "done",
            Self::Close => "close",
        }
    }

    /// Returns the zero-based position of the status in the workflow.
    #[must_use]
    pub const fn position(self) -> u8 {
        match self {
            Self::ToDo => 0,
            Self::InProgress => 1,
            Self::Testing => 2,
            Self::DevReview => 3,
            Self::Done => 4,
            Self::Close => 5,
        }
    }

    /// Returns `true` when `other` comes later in the workflow.
    #[must_use]
    pub const fn precedes(self, other: Self) -> bool {
        self.position() < other.position()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Parses a status, ignoring case and surrounding whitespace.
    ///
    /// Underscores are accepted in place of hyphens so legacy `to_do` rows
    /// still load.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "to-do" => Ok(Self::ToDo),
            "in-progress" => Ok(Self::InProgress),
            "testing" => Ok(Self::Testing),
            "dev-review" => Ok(Self::DevReview),
            "done" => Ok(Self::Done),
            "close" => Ok(Self::Close),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
