//! Lookup and ownership helpers shared by the services.

use super::{TaskBoardError, TaskBoardResult};
use crate::task::{
    domain::{Board, BoardId, Task, TaskId, User},
    ports::TaskBoardStore,
};

pub(super) async fn load_task<S: TaskBoardStore>(store: &S, id: TaskId) -> TaskBoardResult<Task> {
    store
        .find_task(id)
        .await?
        .ok_or(TaskBoardError::TaskNotFound(id))
}

pub(super) async fn load_board<S: TaskBoardStore>(
    store: &S,
    id: BoardId,
) -> TaskBoardResult<Board> {
    store
        .find_board(id)
        .await?
        .ok_or(TaskBoardError::BoardNotFound(id))
}

/// Loads a board and requires `actor` to own it.
pub(super) async fn owned_board<S: TaskBoardStore>(
    store: &S,
    id: BoardId,
    actor: &User,
) -> TaskBoardResult<Board> {
    let board = load_board(store, id).await?;
    if !actor.is_owner() || !board.is_owned_by(actor.id()) {
        tracing::warn!(board_id = %id, actor = %actor.id(), "actor does not own board");
        return Err(TaskBoardError::Unauthorized);
    }
    Ok(board)
}

/// Loads a task and requires `actor` to own the task's board.
pub(super) async fn owned_task<S: TaskBoardStore>(
    store: &S,
    id: TaskId,
    actor: &User,
) -> TaskBoardResult<Task> {
    let task = load_task(store, id).await?;
    owned_board(store, task.board_id(), actor).await?;
    Ok(task)
}

/// Requires `actor` to hold the owner role.
pub(super) fn require_owner(actor: &User) -> TaskBoardResult<()> {
    if actor.is_owner() {
        Ok(())
    } else {
        tracing::warn!(actor = %actor.id(), role = %actor.role(), "owner role required");
        Err(TaskBoardError::Unauthorized)
    }
}
