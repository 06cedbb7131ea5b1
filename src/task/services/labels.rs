//! Per-task label management for board owners.

use super::{TaskBoardError, TaskBoardResult, access::owned_task};
use crate::config::TaskBoardConfig;
use crate::task::{
    domain::{Label, LabelId, TaskId, Title, User},
    ports::{RepositoryError, TaskBoardStore},
};
use mockable::Clock;
use std::sync::Arc;

/// Adds, renames and removes task labels.
#[derive(Clone)]
pub struct LabelService<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: TaskBoardConfig,
}

impl<S, C> LabelService<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with default limits.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_config(store, clock, TaskBoardConfig::default())
    }

    /// Creates a service with custom limits.
    #[must_use]
    pub const fn with_config(store: Arc<S>, clock: Arc<C>, config: TaskBoardConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Adds a label to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::DuplicateLabel`] when the task already has a
    /// label with the same title (ignoring case), plus
    /// [`TaskBoardError::TaskNotFound`], [`TaskBoardError::Unauthorized`],
    /// [`TaskBoardError::Domain`] or [`TaskBoardError::Repository`].
    pub async fn add_label(
        &self,
        actor: &User,
        task_id: TaskId,
        title: &str,
    ) -> TaskBoardResult<Label> {
        owned_task(&*self.store, task_id, actor).await?;
        let title = Title::new(title, self.config.label_limit())?;
        self.ensure_unique(task_id, &title, None).await?;

        let label = Label::new(task_id, title, &*self.clock);
        self.store
            .store_label(&label)
            .await
            .map_err(label_write_error)?;
        tracing::info!(%task_id, label_id = %label.id(), "label added");
        Ok(label)
    }

    /// Lists a task's labels, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`],
    /// [`TaskBoardError::Unauthorized`] or [`TaskBoardError::Repository`].
    pub async fn list_labels(&self, actor: &User, task_id: TaskId) -> TaskBoardResult<Vec<Label>> {
        owned_task(&*self.store, task_id, actor).await?;
        Ok(self.store.find_labels_by_tasks(&[task_id]).await?)
    }

    /// Renames a label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::LabelNotFound`] and the errors of
    /// [`LabelService::add_label`].
    pub async fn rename_label(
        &self,
        actor: &User,
        label_id: LabelId,
        title: &str,
    ) -> TaskBoardResult<Label> {
        let mut label = self.owned_label(actor, label_id).await?;
        let title = Title::new(title, self.config.label_limit())?;
        self.ensure_unique(label.task_id(), &title, Some(label_id))
            .await?;

        label.rename(title);
        self.store
            .update_label(&label)
            .await
            .map_err(label_write_error)?;
        Ok(label)
    }

    /// Removes a label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::LabelNotFound`],
    /// [`TaskBoardError::Unauthorized`] or [`TaskBoardError::Repository`].
    pub async fn remove_label(&self, actor: &User, label_id: LabelId) -> TaskBoardResult<Label> {
        let label = self.owned_label(actor, label_id).await?;
        self.store.delete_label(label_id).await?;
        tracing::info!(task_id = %label.task_id(), %label_id, "label removed");
        Ok(label)
    }

    async fn owned_label(&self, actor: &User, label_id: LabelId) -> TaskBoardResult<Label> {
        let label = self
            .store
            .find_label(label_id)
            .await?
            .ok_or(TaskBoardError::LabelNotFound(label_id))?;
        owned_task(&*self.store, label.task_id(), actor).await?;
        Ok(label)
    }

    async fn ensure_unique(
        &self,
        task_id: TaskId,
        title: &Title,
        ignore: Option<LabelId>,
    ) -> TaskBoardResult<()> {
        let existing = self.store.find_labels_by_tasks(&[task_id]).await?;
        let clash = existing
            .iter()
            .filter(|label| Some(label.id()) != ignore)
            .any(|label| label.title().eq_ignore_case(title));
        if clash {
            return Err(TaskBoardError::DuplicateLabel(title.as_str().to_owned()));
        }
        Ok(())
    }
}

/// Reports a title clash caught by storage the same way as one caught by
/// [`LabelService::ensure_unique`].
fn label_write_error(err: RepositoryError) -> TaskBoardError {
    match err {
        RepositoryError::DuplicateLabelTitle { title, .. } => TaskBoardError::DuplicateLabel(title),
        other => other.into(),
    }
}
