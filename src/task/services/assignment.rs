//! Task assignment orchestration.

use super::{TaskBoardError, TaskBoardResult, access::owned_task};
use crate::task::{
    domain::{Task, TaskId, User, UserId},
    ports::TaskBoardStore,
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for assigning a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignTaskRequest {
    task_id: TaskId,
    candidate_id: UserId,
}

impl AssignTaskRequest {
    /// Creates an assignment request.
    #[must_use]
    pub const fn new(task_id: TaskId, candidate_id: UserId) -> Self {
        Self {
            task_id,
            candidate_id,
        }
    }
}

/// Assigns tasks to developers and testers.
#[derive(Clone)]
pub struct AssignmentService<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> AssignmentService<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    /// Creates an assignment service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Assigns a task on behalf of the board owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`] or
    /// [`TaskBoardError::UserNotFound`] for unknown records,
    /// [`TaskBoardError::Unauthorized`] when `actor` does not own the board,
    /// [`TaskBoardError::Assignment`] when the candidate's role does not
    /// suit the task's status, and [`TaskBoardError::Repository`] on storage
    /// failure (including a lost version race).
    pub async fn assign(&self, actor: &User, request: AssignTaskRequest) -> TaskBoardResult<Task> {
        let AssignTaskRequest {
            task_id,
            candidate_id,
        } = request;

        let mut task = owned_task(&*self.store, task_id, actor).await?;
        let candidate = self
            .store
            .find_user(candidate_id)
            .await?
            .ok_or(TaskBoardError::UserNotFound(candidate_id))?;

        let expected = task.version();
        task.assign(&candidate, &*self.clock).inspect_err(|denial| {
            tracing::warn!(
                %task_id,
                candidate = %candidate_id,
                role = %candidate.role(),
                status = %task.status(),
                %denial,
                "assignment denied"
            );
        })?;
        self.store.update_task(&task, expected).await?;

        tracing::info!(%task_id, assignee = %candidate_id, "task assigned");
        Ok(task)
    }
}
