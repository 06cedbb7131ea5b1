//! Application services for the task board.

mod access;
mod assignment;
mod board;
mod error;
mod history;
mod labels;
mod transition;

pub use assignment::{AssignTaskRequest, AssignmentService};
pub use board::{BoardRequest, BoardService, SortDirection, TaskQuery, TaskRequest, TaskSortKey};
pub use error::{ErrorKind, TaskBoardError, TaskBoardResult};
pub use history::StatusHistoryLog;
pub use labels::LabelService;
pub use transition::{ChangeStatusRequest, StatusTransitionService, TransitionOutcome};
