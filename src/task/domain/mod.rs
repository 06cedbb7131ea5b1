//! Domain model for the task board workflow.
//!
//! Boards own tasks, tasks move through a fixed workflow of statuses, and
//! every accepted move leaves an immutable history record. Transition and
//! assignment rules are pure functions of role and status; nothing in this
//! module touches storage.

mod assignment;
mod authority;
mod board;
mod error;
mod history;
mod ids;
mod label;
mod role;
mod status;
mod task;
mod title;
mod user;

pub use assignment::{AssignmentDenial, check_assignment, role_accepts_status};
pub use authority::{
    OwnerTransitionPolicy, StatusChange, TransitionAuthority, TransitionDenial, authorize,
};
pub use board::{Board, PersistedBoardData};
pub use error::{ParseRoleError, ParseTaskStatusError, TaskDomainError};
pub use history::{PersistedStatusChangeData, StatusChangeRecord};
pub use ids::{BoardId, LabelId, StatusChangeId, TaskId, TaskVersion, UserId};
pub use label::Label;
pub use role::Role;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDetails};
pub use title::Title;
pub use user::User;
