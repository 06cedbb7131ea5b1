//! Board and task management for board owners, plus actor-scoped task
//! listing.

use super::{
    TaskBoardError, TaskBoardResult,
    access::{owned_board, owned_task, require_owner},
};
use crate::config::TaskBoardConfig;
use crate::task::{
    domain::{Board, BoardId, Role, Task, TaskDetails, TaskId, Title, User},
    ports::TaskBoardStore,
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;

/// Request payload for creating or updating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRequest {
    title: String,
    description: Option<String>,
}

impl BoardRequest {
    /// Creates a request with the board title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the board description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for creating or updating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    title: String,
    description: String,
    due_date: Option<NaiveDate>,
}

impl TaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: None,
        }
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Field used to order task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSortKey {
    /// Order by creation time.
    #[default]
    CreatedAt,
    /// Order by title, ignoring case.
    Title,
}

/// Sort direction for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Filters and ordering for [`BoardService::list_tasks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    search: Option<String>,
    label: Option<String>,
    sort_key: TaskSortKey,
    direction: SortDirection,
}

impl TaskQuery {
    /// Creates a query with no filters, oldest task first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps tasks whose title contains `text`, ignoring case.
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Keeps tasks carrying a label whose title contains `text`, ignoring
    /// case.
    #[must_use]
    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.label = Some(text.into());
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn sorted_by(mut self, key: TaskSortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.direction = direction;
        self
    }
}

/// Board and task management service.
#[derive(Clone)]
pub struct BoardService<S, C>
where
    S: TaskBoardStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: TaskBoardConfig,
}

impl<S, C> BoardService<S, C>
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

    /// Creates a board owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthorized`] for non-owner actors,
    /// [`TaskBoardError::Domain`] for invalid titles and
    /// [`TaskBoardError::Repository`] on storage failure.
    pub async fn create_board(&self, actor: &User, request: BoardRequest) -> TaskBoardResult<Board> {
        require_owner(actor)?;
        let title = Title::new(request.title, self.config.title_limit())?;
        let board = Board::new(actor.id(), title, request.description, &*self.clock);
        self.store.store_board(&board).await?;
        tracing::info!(board_id = %board.id(), owner = %actor.id(), "board created");
        Ok(board)
    }

    /// Renames a board and replaces its description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::BoardNotFound`],
    /// [`TaskBoardError::Unauthorized`], [`TaskBoardError::Domain`] or
    /// [`TaskBoardError::Repository`].
    pub async fn update_board(
        &self,
        actor: &User,
        board_id: BoardId,
        request: BoardRequest,
    ) -> TaskBoardResult<Board> {
        let mut board = owned_board(&*self.store, board_id, actor).await?;
        let title = Title::new(request.title, self.config.title_limit())?;
        board.rename(title, request.description, &*self.clock);
        self.store.update_board(&board).await?;
        Ok(board)
    }

    /// Deletes a board with no tasks and no status history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::BoardNotEmpty`] when tasks or status
    /// history remain on the board, plus the lookup and storage errors of
    /// [`BoardService::update_board`].
    pub async fn delete_board(&self, actor: &User, board_id: BoardId) -> TaskBoardResult<()> {
        owned_board(&*self.store, board_id, actor).await?;
        let remaining = self.store.find_tasks_by_boards(&[board_id]).await?;
        let history = self.store.find_status_changes_by_boards(&[board_id]).await?;
        if !remaining.is_empty() || !history.is_empty() {
            return Err(TaskBoardError::BoardNotEmpty(board_id));
        }
        self.store.delete_board(board_id).await?;
        tracing::info!(%board_id, "board deleted");
        Ok(())
    }

    /// Lists the boards owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Unauthorized`] for non-owner actors and
    /// [`TaskBoardError::Repository`] on storage failure.
    pub async fn list_boards(&self, actor: &User) -> TaskBoardResult<Vec<Board>> {
        require_owner(actor)?;
        Ok(self.store.find_boards_by_owner(actor.id()).await?)
    }

    /// Creates an unassigned `to-do` task on a board owned by `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::BoardNotFound`],
    /// [`TaskBoardError::Unauthorized`], [`TaskBoardError::Domain`] or
    /// [`TaskBoardError::Repository`].
    pub async fn create_task(
        &self,
        actor: &User,
        board_id: BoardId,
        request: TaskRequest,
    ) -> TaskBoardResult<Task> {
        owned_board(&*self.store, board_id, actor).await?;
        let details = self.task_details(request)?;
        let task = Task::new(board_id, details, &*self.clock);
        self.store.store_task(&task).await?;
        tracing::info!(task_id = %task.id(), %board_id, "task created");
        Ok(task)
    }

    /// Replaces a task's title, description and due date. The status is left
    /// alone; it only changes through transitions.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`],
    /// [`TaskBoardError::Unauthorized`], [`TaskBoardError::Domain`] or
    /// [`TaskBoardError::Repository`] (including a lost version race).
    pub async fn update_task(
        &self,
        actor: &User,
        task_id: TaskId,
        request: TaskRequest,
    ) -> TaskBoardResult<Task> {
        let mut task = owned_task(&*self.store, task_id, actor).await?;
        let details = self.task_details(request)?;
        let expected = task.version();
        task.update_details(details, &*self.clock);
        self.store.update_task(&task, expected).await?;
        Ok(task)
    }

    /// Deletes a task and its labels. Its history stays in the log.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`],
    /// [`TaskBoardError::Unauthorized`] or [`TaskBoardError::Repository`].
    pub async fn delete_task(&self, actor: &User, task_id: TaskId) -> TaskBoardResult<()> {
        owned_task(&*self.store, task_id, actor).await?;
        self.store.delete_task(task_id).await?;
        tracing::info!(%task_id, "task deleted");
        Ok(())
    }

    /// Lists the tasks visible to `actor`: tasks on their boards for owners,
    /// tasks assigned to them for developers and testers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] on storage failure.
    pub async fn list_tasks(&self, actor: &User, query: &TaskQuery) -> TaskBoardResult<Vec<Task>> {
        let mut tasks = match actor.role() {
            Role::Owner => {
                let boards = self.store.find_boards_by_owner(actor.id()).await?;
                let board_ids: Vec<BoardId> = boards.iter().map(Board::id).collect();
                if board_ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.store.find_tasks_by_boards(&board_ids).await?
            }
            Role::Developer | Role::Tester => {
                self.store.find_tasks_by_assignee(actor.id()).await?
            }
        };

        if let Some(search) = query.search.as_deref() {
            tasks.retain(|task| task.title().contains_ignore_case(search));
        }
        if let Some(label_filter) = query.label.as_deref() {
            let task_ids: Vec<TaskId> = tasks.iter().map(Task::id).collect();
            let labelled: HashSet<TaskId> = self
                .store
                .find_labels_by_tasks(&task_ids)
                .await?
                .iter()
                .filter(|label| label.title().contains_ignore_case(label_filter))
                .map(|label| label.task_id())
                .collect();
            tasks.retain(|task| labelled.contains(&task.id()));
        }

        sort_tasks(&mut tasks, query.sort_key, query.direction);
        tracing::debug!(actor = %actor.id(), count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    fn task_details(&self, request: TaskRequest) -> TaskBoardResult<TaskDetails> {
        let title = Title::new(request.title, self.config.title_limit())?;
        let mut details = TaskDetails::new(title, request.description)?;
        if let Some(due_date) = request.due_date {
            details = details.with_due_date(due_date);
        }
        Ok(details)
    }
}

fn sort_tasks(tasks: &mut [Task], key: TaskSortKey, direction: SortDirection) {
    match key {
        TaskSortKey::CreatedAt => tasks.sort_by_key(|task| (task.created_at(), task.id())),
        TaskSortKey::Title => {
            tasks.sort_by_cached_key(|task| (task.title().as_str().to_lowercase(), task.id()));
        }
    }
    if direction == SortDirection::Descending {
        tasks.reverse();
    }
}
