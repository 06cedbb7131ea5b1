//! In-memory task board store for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{
        Board, BoardId, Label, LabelId, StatusChangeRecord, Task, TaskId, TaskVersion, User,
        UserId,
    },
    ports::{
        BoardRepository, LabelRepository, RepositoryError, RepositoryResult,
        StatusHistoryRepository, TaskRepository, UserDirectory,
    },
};

/// Thread-safe in-memory store implementing every task board port.
///
/// All ports share one lock, so a transition's status update and history
/// append become visible together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskBoardStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    users: HashMap<UserId, User>,
    boards: HashMap<BoardId, Board>,
    tasks: HashMap<TaskId, Task>,
    labels: HashMap<LabelId, Label>,
    history: Vec<StatusChangeRecord>,
}

impl InMemoryTaskBoardStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, InMemoryState>> {
        self.state
            .read()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, InMemoryState>> {
        self.state
            .write()
            .map_err(|err| RepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

/// Rejects `label` when another label on its task has the same title.
fn check_label_title(state: &InMemoryState, label: &Label) -> RepositoryResult<()> {
    let clash = state.labels.values().any(|stored| {
        stored.id() != label.id()
            && stored.task_id() == label.task_id()
            && stored.title().eq_ignore_case(label.title())
    });
    if clash {
        return Err(RepositoryError::DuplicateLabelTitle {
            task_id: label.task_id(),
            title: label.title().as_str().to_owned(),
        });
    }
    Ok(())
}

/// Checks the stored version of `task` against `expected`.
fn check_version(state: &InMemoryState, task: &Task, expected: TaskVersion) -> RepositoryResult<()> {
    let stored = state
        .tasks
        .get(&task.id())
        .ok_or_else(|| RepositoryError::not_found("task", task.id()))?;
    if stored.version() != expected {
        return Err(RepositoryError::VersionConflict {
            task_id: task.id(),
            expected,
        });
    }
    Ok(())
}

#[async_trait]
impl UserDirectory for InMemoryTaskBoardStore {
    async fn store_user(&self, user: &User) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.users.contains_key(&user.id()) {
            return Err(RepositoryError::duplicate("user", user.id()));
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.get(&id).cloned())
    }
}

#[async_trait]
impl BoardRepository for InMemoryTaskBoardStore {
    async fn store_board(&self, board: &Board) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.boards.contains_key(&board.id()) {
            return Err(RepositoryError::duplicate("board", board.id()));
        }
        state.boards.insert(board.id(), board.clone());
        Ok(())
    }

    async fn update_board(&self, board: &Board) -> RepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .boards
            .get_mut(&board.id())
            .ok_or_else(|| RepositoryError::not_found("board", board.id()))?;
        *stored = board.clone();
        Ok(())
    }

    async fn find_board(&self, id: BoardId) -> RepositoryResult<Option<Board>> {
        let state = self.read()?;
        Ok(state.boards.get(&id).cloned())
    }

    async fn find_boards_by_owner(&self, owner_id: UserId) -> RepositoryResult<Vec<Board>> {
        let state = self.read()?;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|board| board.is_owned_by(owner_id))
            .cloned()
            .collect();
        boards.sort_by_key(|board| (board.created_at(), board.id()));
        Ok(boards)
    }

    async fn delete_board(&self, id: BoardId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        state
            .boards
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("board", id))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskBoardStore {
    async fn store_task(&self, task: &Task) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(RepositoryError::duplicate("task", task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task, expected: TaskVersion) -> RepositoryResult<()> {
        let mut state = self.write()?;
        check_version(&state, task, expected)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn apply_transition(
        &self,
        task: &Task,
        expected: TaskVersion,
        record: &StatusChangeRecord,
    ) -> RepositoryResult<()> {
        let mut state = self.write()?;
        check_version(&state, task, expected)?;
        if state.history.iter().any(|entry| entry.id() == record.id()) {
            return Err(RepositoryError::duplicate("status change", record.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        state.history.push(record.clone());
        Ok(())
    }

    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_tasks_by_boards(&self, board_ids: &[BoardId]) -> RepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| board_ids.contains(&task.board_id()))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }

    async fn find_tasks_by_assignee(&self, assignee: UserId) -> RepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.is_assigned_to(assignee))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        Ok(tasks)
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.remove(&id).is_none() {
            return Err(RepositoryError::not_found("task", id));
        }
        state.labels.retain(|_, label| label.task_id() != id);
        Ok(())
    }
}

#[async_trait]
impl LabelRepository for InMemoryTaskBoardStore {
    async fn store_label(&self, label: &Label) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.labels.contains_key(&label.id()) {
            return Err(RepositoryError::duplicate("label", label.id()));
        }
        check_label_title(&state, label)?;
        state.labels.insert(label.id(), label.clone());
        Ok(())
    }

    async fn update_label(&self, label: &Label) -> RepositoryResult<()> {
        let mut state = self.write()?;
        check_label_title(&state, label)?;
        let stored = state
            .labels
            .get_mut(&label.id())
            .ok_or_else(|| RepositoryError::not_found("label", label.id()))?;
        *stored = label.clone();
        Ok(())
    }

    async fn find_label(&self, id: LabelId) -> RepositoryResult<Option<Label>> {
        let state = self.read()?;
        Ok(state.labels.get(&id).cloned())
    }

    async fn find_labels_by_tasks(&self, task_ids: &[TaskId]) -> RepositoryResult<Vec<Label>> {
        let state = self.read()?;
        let mut labels: Vec<Label> = state
            .labels
            .values()
            .filter(|label| task_ids.contains(&label.task_id()))
            .cloned()
            .collect();
        labels.sort_by_key(|label| (label.created_at(), label.id()));
        Ok(labels)
    }

    async fn delete_label(&self, id: LabelId) -> RepositoryResult<()> {
        let mut state = self.write()?;
        state
            .labels
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("label", id))
    }
}

#[async_trait]
impl StatusHistoryRepository for InMemoryTaskBoardStore {
    async fn append_status_change(&self, record: &StatusChangeRecord) -> RepositoryResult<()> {
        let mut state = self.write()?;
        if state.history.iter().any(|entry| entry.id() == record.id()) {
            return Err(RepositoryError::duplicate("status change", record.id()));
        }
        state.history.push(record.clone());
        Ok(())
    }

    async fn find_status_changes(
        &self,
        task_ids: &[TaskId],
    ) -> RepositoryResult<Vec<StatusChangeRecord>> {
        let state = self.read()?;
        let mut records: Vec<StatusChangeRecord> = state
            .history
            .iter()
            .filter(|record| task_ids.contains(&record.task_id()))
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        records.sort_by_key(StatusChangeRecord::created_at);
        Ok(records)
    }

    async fn find_status_changes_by_boards(
        &self,
        board_ids: &[BoardId],
    ) -> RepositoryResult<Vec<StatusChangeRecord>> {
        let state = self.read()?;
        let mut records: Vec<StatusChangeRecord> = state
            .history
            .iter()
            .filter(|record| board_ids.contains(&record.board_id()))
            .cloned()
            .collect();
        records.sort_by_key(StatusChangeRecord::created_at);
        Ok(records)
    }
}
