//! `PostgreSQL` store implementing every task board port.

use super::{
    models::{BoardRow, LabelRow, NewStatusChangeRow, StatusChangeRow, TaskRow, UserRow},
    schema::{boards, status_changes, task_labels, tasks, users},
};
use crate::task::{
    domain::{
        Board, BoardId, Label, LabelId, PersistedBoardData, PersistedStatusChangeData,
        PersistedTaskData, Role, StatusChangeId, StatusChangeRecord, Task, TaskId, TaskStatus,
        TaskVersion, Title, User, UserId,
    },
    ports::{
        BoardRepository, LabelRepository, RepositoryError, RepositoryResult,
        StatusHistoryRepository, TaskRepository, UserDirectory,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by the task board store.
pub type TaskBoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task board store.
#[derive(Debug, Clone)]
pub struct PostgresTaskBoardStore {
    pool: TaskBoardPgPool,
}

impl PostgresTaskBoardStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskBoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RepositoryError::persistence)?
    }
}

/// Failure inside a guarded task write transaction.
#[derive(Debug, Error)]
enum GuardedWriteError {
    #[error(transparent)]
    Diesel(#[from] DieselError),
    #[error("task not found")]
    NotFound,
    #[error("task version conflict")]
    Conflict,
}

impl GuardedWriteError {
    fn into_repository(self, task_id: TaskId, expected: TaskVersion) -> RepositoryError {
        match self {
            Self::Diesel(err) => RepositoryError::persistence(err),
            Self::NotFound => RepositoryError::not_found("task", task_id),
            Self::Conflict => RepositoryError::VersionConflict { task_id, expected },
        }
    }
}

/// Overwrites the task row only if its stored version equals `expected`.
fn compare_and_swap(
    connection: &mut PgConnection,
    row: &TaskRow,
    expected: i64,
) -> Result<(), GuardedWriteError> {
    let updated = diesel::update(
        tasks::table
            .filter(tasks::id.eq(row.id))
            .filter(tasks::version.eq(expected)),
    )
    .set(row)
    .execute(connection)?;
    if updated == 1 {
        return Ok(());
    }

    let exists = diesel::select(diesel::dsl::exists(
        tasks::table.filter(tasks::id.eq(row.id)),
    ))
    .get_result::<bool>(connection)?;
    if exists {
        Err(GuardedWriteError::Conflict)
    } else {
        Err(GuardedWriteError::NotFound)
    }
}

fn map_insert_error(err: DieselError, entity: &'static str, id: impl ToString) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RepositoryError::duplicate(entity, id)
        }
        other => RepositoryError::persistence(other),
    }
}

const LABEL_TITLE_INDEX: &str = "idx_task_labels_title_unique";

/// Maps a label write failure, reporting title clashes on the task.
fn map_label_error(err: DieselError, label: &Label) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if info.constraint_name() == Some(LABEL_TITLE_INDEX) =>
        {
            RepositoryError::DuplicateLabelTitle {
                task_id: label.task_id(),
                title: label.title().as_str().to_owned(),
            }
        }
        other => map_insert_error(other, "label", label.id()),
    }
}

fn version_to_column(version: TaskVersion) -> RepositoryResult<i64> {
    i64::try_from(version.value()).map_err(RepositoryError::persistence)
}

#[async_trait]
impl UserDirectory for PostgresTaskBoardStore {
    async fn store_user(&self, user: &User) -> RepositoryResult<()> {
        let user_id = user.id();
        let row = UserRow {
            id: user_id.into_inner(),
            name: user.name().to_owned(),
            role: user.role().as_str().to_owned(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, "user", user_id))?;
            Ok(())
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }
}

#[async_trait]
impl BoardRepository for PostgresTaskBoardStore {
    async fn store_board(&self, board: &Board) -> RepositoryResult<()> {
        let board_id = board.id();
        let row = board_to_row(board);
        self.run_blocking(move |connection| {
            diesel::insert_into(boards::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, "board", board_id))?;
            Ok(())
        })
        .await
    }

    async fn update_board(&self, board: &Board) -> RepositoryResult<()> {
        let board_id = board.id();
        let row = board_to_row(board);
        self.run_blocking(move |connection| {
            let updated = diesel::update(boards::table.filter(boards::id.eq(row.id)))
                .set(&row)
                .execute(connection)
                .map_err(RepositoryError::persistence)?;
            if updated == 0 {
                return Err(RepositoryError::not_found("board", board_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_board(&self, id: BoardId) -> RepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| {
            let row = boards::table
                .filter(boards::id.eq(id.into_inner()))
                .select(BoardRow::as_select())
                .first::<BoardRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?;
            Ok(row.map(row_to_board))
        })
        .await
    }

    async fn find_boards_by_owner(&self, owner_id: UserId) -> RepositoryResult<Vec<Board>> {
        self.run_blocking(move |connection| {
            let rows = boards::table
                .filter(boards::owner_id.eq(owner_id.into_inner()))
                .order((boards::created_at.asc(), boards::id.asc()))
                .select(BoardRow::as_select())
                .load::<BoardRow>(connection)
                .map_err(RepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_board).collect())
        })
        .await
    }

    async fn delete_board(&self, id: BoardId) -> RepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(boards::table.filter(boards::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(RepositoryError::persistence)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found("board", id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskBoardStore {
    async fn store_task(&self, task: &Task) -> RepositoryResult<()> {
        let task_id = task.id();
        let row = task_to_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, "task", task_id))?;
            Ok(())
        })
        .await
    }

    async fn update_task(&self, task: &Task, expected: TaskVersion) -> RepositoryResult<()> {
        let task_id = task.id();
        let row = task_to_row(task)?;
        let expected_column = version_to_column(expected)?;
        self.run_blocking(move |connection| {
            compare_and_swap(connection, &row, expected_column)
                .map_err(|err| err.into_repository(task_id, expected))
        })
        .await
    }

    async fn apply_transition(
        &self,
        task: &Task,
        expected: TaskVersion,
        record: &StatusChangeRecord,
    ) -> RepositoryResult<()> {
        let task_id = task.id();
        let row = task_to_row(task)?;
        let history_row = record_to_row(record);
        let expected_column = version_to_column(expected)?;
        self.run_blocking(move |connection| {
            connection
                .transaction::<(), GuardedWriteError, _>(|transaction| {
                    compare_and_swap(transaction, &row, expected_column)?;
                    diesel::insert_into(status_changes::table)
                        .values(&history_row)
                        .execute(transaction)?;
                    Ok(())
                })
                .map_err(|err| err.into_repository(task_id, expected))
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_tasks_by_boards(&self, board_ids: &[BoardId]) -> RepositoryResult<Vec<Task>> {
        let ids: Vec<uuid::Uuid> = board_ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::board_id.eq_any(ids))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(RepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_tasks_by_assignee(&self, assignee: UserId) -> RepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assignee_id.eq(assignee.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(RepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection
                .transaction::<(), GuardedWriteError, _>(|transaction| {
                    diesel::delete(task_labels::table.filter(task_labels::task_id.eq(id.into_inner())))
                        .execute(transaction)?;
                    let deleted =
                        diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                            .execute(transaction)?;
                    if deleted == 0 {
                        return Err(GuardedWriteError::NotFound);
                    }
                    Ok(())
                })
                .map_err(|err| err.into_repository(id, TaskVersion::INITIAL))
        })
        .await
    }
}

#[async_trait]
impl LabelRepository for PostgresTaskBoardStore {
    async fn store_label(&self, label: &Label) -> RepositoryResult<()> {
        let row = label_to_row(label);
        let stored = label.clone();
        self.run_blocking(move |connection| {
            diesel::insert_into(task_labels::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_label_error(err, &stored))?;
            Ok(())
        })
        .await
    }

    async fn update_label(&self, label: &Label) -> RepositoryResult<()> {
        let label_id = label.id();
        let title = label.title().as_str().to_owned();
        let renamed = label.clone();
        self.run_blocking(move |connection| {
            let updated =
                diesel::update(task_labels::table.filter(task_labels::id.eq(label_id.into_inner())))
                    .set(task_labels::title.eq(title))
                    .execute(connection)
                    .map_err(|err| map_label_error(err, &renamed))?;
            if updated == 0 {
                return Err(RepositoryError::not_found("label", label_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_label(&self, id: LabelId) -> RepositoryResult<Option<Label>> {
        self.run_blocking(move |connection| {
            let row = task_labels::table
                .filter(task_labels::id.eq(id.into_inner()))
                .select(LabelRow::as_select())
                .first::<LabelRow>(connection)
                .optional()
                .map_err(RepositoryError::persistence)?;
            Ok(row.map(row_to_label))
        })
        .await
    }

    async fn find_labels_by_tasks(&self, task_ids: &[TaskId]) -> RepositoryResult<Vec<Label>> {
        let ids: Vec<uuid::Uuid> = task_ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = task_labels::table
                .filter(task_labels::task_id.eq_any(ids))
                .order((task_labels::created_at.asc(), task_labels::id.asc()))
                .select(LabelRow::as_select())
                .load::<LabelRow>(connection)
                .map_err(RepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_label).collect())
        })
        .await
    }

    async fn delete_label(&self, id: LabelId) -> RepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(task_labels::table.filter(task_labels::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(RepositoryError::persistence)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found("label", id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl StatusHistoryRepository for PostgresTaskBoardStore {
    async fn append_status_change(&self, record: &StatusChangeRecord) -> RepositoryResult<()> {
        let record_id = record.id();
        let row = record_to_row(record);
        self.run_blocking(move |connection| {
            diesel::insert_into(status_changes::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, "status change", record_id))?;
            Ok(())
        })
        .await
    }

    async fn find_status_changes(
        &self,
        task_ids: &[TaskId],
    ) -> RepositoryResult<Vec<StatusChangeRecord>> {
        let ids: Vec<uuid::Uuid> = task_ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = status_changes::table
                .filter(status_changes::task_id.eq_any(ids))
                .order((status_changes::created_at.asc(), status_changes::position.asc()))
                .select(StatusChangeRow::as_select())
                .load::<StatusChangeRow>(connection)
                .map_err(RepositoryError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }

    async fn find_status_changes_by_boards(
        &self,
        board_ids: &[BoardId],
    ) -> RepositoryResult<Vec<StatusChangeRecord>> {
        let ids: Vec<uuid::Uuid> = board_ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = status_changes::table
                .filter(status_changes::board_id.eq_any(ids))
                .order((status_changes::created_at.asc(), status_changes::position.asc()))
                .select(StatusChangeRow::as_select())
                .load::<StatusChangeRow>(connection)
                .map_err(RepositoryError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }
}

pub(super) fn row_to_user(row: UserRow) -> RepositoryResult<User> {
    let role = Role::try_from(row.role.as_str()).map_err(RepositoryError::persistence)?;
    User::with_id(UserId::from_uuid(row.id), row.name, role).map_err(RepositoryError::persistence)
}

fn board_to_row(board: &Board) -> BoardRow {
    BoardRow {
        id: board.id().into_inner(),
        owner_id: board.owner_id().into_inner(),
        title: board.title().as_str().to_owned(),
        description: board.description().map(str::to_owned),
        created_at: board.created_at(),
        updated_at: board.updated_at(),
    }
}

fn row_to_board(row: BoardRow) -> Board {
    Board::from_persisted(PersistedBoardData {
        id: BoardId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        title: Title::from_persisted(row.title),
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(super) fn task_to_row(task: &Task) -> RepositoryResult<TaskRow> {
    Ok(TaskRow {
        id: task.id().into_inner(),
        board_id: task.board_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        assignee_id: task.assignee().map(UserId::into_inner),
        due_date: task.due_date(),
        version: version_to_column(task.version())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

pub(super) fn row_to_task(row: TaskRow) -> RepositoryResult<Task> {
    let TaskRow {
        id,
        board_id,
        title,
        description,
        status: persisted_status,
        assignee_id,
        due_date,
        version: persisted_version,
        created_at,
        updated_at,
    } = row;

    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(RepositoryError::persistence)?;
    let version = u64::try_from(persisted_version).map_err(RepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        board_id: BoardId::from_uuid(board_id),
        title: Title::from_persisted(title),
        description,
        status,
        assignee: assignee_id.map(UserId::from_uuid),
        due_date,
        version: TaskVersion::new(version),
        created_at,
        updated_at,
    }))
}

fn label_to_row(label: &Label) -> LabelRow {
    LabelRow {
        id: label.id().into_inner(),
        task_id: label.task_id().into_inner(),
        title: label.title().as_str().to_owned(),
        created_at: label.created_at(),
    }
}

fn row_to_label(row: LabelRow) -> Label {
    Label::from_persisted(
        LabelId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        Title::from_persisted(row.title),
        row.created_at,
    )
}

fn record_to_row(record: &StatusChangeRecord) -> NewStatusChangeRow {
    NewStatusChangeRow {
        id: record.id().into_inner(),
        task_id: record.task_id().into_inner(),
        board_id: record.board_id().into_inner(),
        actor_name: record.actor_name().to_owned(),
        from_status: record.from_status().as_str().to_owned(),
        to_status: record.to_status().as_str().to_owned(),
        detail: record.detail().to_owned(),
        created_at: record.created_at(),
    }
}

pub(super) fn row_to_record(row: StatusChangeRow) -> RepositoryResult<StatusChangeRecord> {
    let from = TaskStatus::try_from(row.from_status.as_str()).map_err(RepositoryError::persistence)?;
    let to = TaskStatus::try_from(row.to_status.as_str()).map_err(RepositoryError::persistence)?;
    Ok(StatusChangeRecord::from_persisted(
        PersistedStatusChangeData {
            id: StatusChangeId::from_uuid(row.id),
            task_id: TaskId::from_uuid(row.task_id),
            board_id: BoardId::from_uuid(row.board_id),
            actor_name: row.actor_name,
            from,
            to,
            detail: row.detail,
            created_at: row.created_at,
        },
    ))
}
