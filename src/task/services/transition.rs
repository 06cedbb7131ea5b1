//! Status transition orchestration.
//!
//! A transition is one unit of work: ownership check, authority decision,
//! status mutation and history append. The store commits the new status and
//! the history record together behind a version check, so two requests racing
//! from the same status can never both win.

use super::{
    TaskBoardError, TaskBoardResult,
    access::{load_task, owned_board},
};
use crate::config::TaskBoardConfig;
use crate::task::{
    domain::{
        Role, StatusChangeRecord, Task, TaskId, TransitionAuthority, User, role_accepts_status,
    },
    ports::{RepositoryError, TaskBoardStore},
};
use mockable::Clock;
use std::sync::Arc;

/// Request payload for moving a task to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStatusRequest {
    task_id: TaskId,
    requested_status: String,
}

impl ChangeStatusRequest {
    /// Creates a request. The status is parsed by the transition authority.
    #[must_use]
    pub fn new(task_id: TaskId, requested_status: impl Into<String>) -> Self {
        Self {
            task_id,
            requested_status: requested_status.into(),
        }
    }
}

/// Result of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    task: Task,
    record: StatusChangeRecord,
}

impl TransitionOutcome {
    /// Returns the task as persisted after the transition.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the appended history record.
    #[must_use]
    pub const fn record(&self) -> &StatusChangeRecord {
        &self.record
    }

    /// Splits the outcome into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Task, StatusChangeRecord) {
        (self.task, self.record)
    }
}

/// Applies role-gated status transitions to stored tasks.
#[derive(Clone)]
pub struct StatusTransitionService<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    authority: TransitionAuthority,
}

impl<S, C> StatusTransitionService<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default owner policy.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_config(store, clock, &TaskBoardConfig::default())
    }

    /// Creates a service using the owner policy from `config`.
    #[must_use]
    pub const fn with_config(store: Arc<S>, clock: Arc<C>, config: &TaskBoardConfig) -> Self {
        Self {
            store,
            clock,
            authority: TransitionAuthority::new(config.owner_transitions),
        }
    }

    /// Returns the transition authority used by this service.
    #[must_use]
    pub const fn authority(&self) -> &TransitionAuthority {
        &self.authority
    }

    /// Moves a task to the requested status on behalf of `actor`.
    ///
    /// Developers and testers must be the task's assignee; owners must own
    /// the task's board. If the new status does not suit the assignee's role
    /// the assignee is released in the same write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`] for unknown tasks,
    /// [`TaskBoardError::Unauthorized`] when the ownership precondition
    /// fails, [`TaskBoardError::Transition`] when the authority denies the
    /// move (also after losing a race to a concurrent transition),
    /// [`TaskBoardError::ConcurrentModification`] when a concurrent write
    /// won but the request would still be allowed, and
    /// [`TaskBoardError::Repository`] on storage failure.
    pub async fn change_status(
        &self,
        actor: &User,
        request: ChangeStatusRequest,
    ) -> TaskBoardResult<TransitionOutcome> {
        let ChangeStatusRequest {
            task_id,
            requested_status,
        } = request;

        let task = load_task(&*self.store, task_id).await?;
        self.require_transition_access(actor, &task).await?;
        self.commit(actor, task, &requested_status).await
    }

    async fn require_transition_access(&self, actor: &User, task: &Task) -> TaskBoardResult<()> {
        match actor.role() {
            Role::Owner => owned_board(&*self.store, task.board_id(), actor)
                .await
                .map(|_| ()),
            Role::Developer | Role::Tester => {
                if task.is_assigned_to(actor.id()) {
                    Ok(())
                } else {
                    tracing::warn!(
                        task_id = %task.id(),
                        actor = %actor.id(),
                        "actor is not the task assignee"
                    );
                    Err(TaskBoardError::Unauthorized)
                }
            }
        }
    }

    async fn commit(
        &self,
        actor: &User,
        mut task: Task,
        requested: &str,
    ) -> TaskBoardResult<TransitionOutcome> {
        let change = self
            .authority
            .authorize_requested(actor.role(), task.status(), requested)
            .inspect_err(|denial| {
                tracing::warn!(
                    task_id = %task.id(),
                    actor = %actor.name(),
                    role = %actor.role(),
                    from = %task.status(),
                    requested,
                    %denial,
                    "status transition denied"
                );
            })?;

        let expected = task.version();
        task.apply_status_change(change, &*self.clock)?;
        self.release_incompatible_assignee(actor, &mut task).await?;
        let record = StatusChangeRecord::new(&task, actor.name(), change, &*self.clock);

        match self.store.apply_transition(&task, expected, &record).await {
            Ok(()) => {
                tracing::info!(
                    task_id = %task.id(),
                    actor = %actor.name(),
                    from = %change.from(),
                    to = %change.to(),
                    "task status changed"
                );
                Ok(TransitionOutcome { task, record })
            }
            Err(RepositoryError::VersionConflict { task_id, .. }) => {
                tracing::warn!(%task_id, %expected, "status transition lost a concurrent write");
                let current = load_task(&*self.store, task_id).await?;
                Err(self.reject_stale(actor, &current, requested))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Re-runs the authority against the winning status so the loser sees
    /// the denial the new status produces.
    fn reject_stale(&self, actor: &User, current: &Task, requested: &str) -> TaskBoardError {
        match self
            .authority
            .authorize_requested(actor.role(), current.status(), requested)
        {
            Err(denial) => TaskBoardError::Transition(denial),
            Ok(_) => TaskBoardError::ConcurrentModification(current.id()),
        }
    }

    async fn release_incompatible_assignee(
        &self,
        actor: &User,
        task: &mut Task,
    ) -> TaskBoardResult<()> {
        let Some(assignee_id) = task.assignee() else {
            return Ok(());
        };
        let assignee_role = if assignee_id == actor.id() {
            Some(actor.role())
        } else {
            self.store
                .find_user(assignee_id)
                .await?
                .map(|user| user.role())
        };

        if let Some(role) = assignee_role
            && !role_accepts_status(role, task.status())
        {
            tracing::info!(
                task_id = %task.id(),
                assignee = %assignee_id,
                status = %task.status(),
                "releasing assignee incompatible with new status"
            );
            task.unassign(&*self.clock);
        }
        Ok(())
    }
}
