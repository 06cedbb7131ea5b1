//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by task board
//! services.

pub mod history;
pub mod repository;

pub use history::StatusHistoryRepository;
pub use repository::{
    BoardRepository, LabelRepository, RepositoryError, RepositoryResult, TaskRepository,
    UserDirectory,
};

/// Every port a task board service needs, implemented by one store.
pub trait TaskBoardStore:
    UserDirectory + BoardRepository + TaskRepository + LabelRepository + StatusHistoryRepository
{
}

impl<T> TaskBoardStore for T where
    T: UserDirectory + BoardRepository + TaskRepository + LabelRepository + StatusHistoryRepository
{
}
