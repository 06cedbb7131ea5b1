//! Shared helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use taskboard::task::{
    adapters::postgres::PostgresTaskBoardStore,
    domain::{Board, Role, Task, User},
    ports::UserDirectory,
    services::{
        BoardRequest, BoardService, LabelService, StatusHistoryLog, StatusTransitionService,
        TaskRequest,
    },
};
use tokio::runtime::Runtime;

/// Schema applied to the template database.
pub const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-19-000000_create_task_board/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

/// Creates a runtime with worker threads so blocking store calls can race.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> eyre::Result<Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| eyre::eyre!("template setup failed: {e}"))
}

/// Drops the test database when the test finishes, even on panic.
pub struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(self.db_name.as_str()));
    }
}

/// Services over one `PostgreSQL` store in a fresh database.
///
/// Field order matters: the pool must close before the guard drops the
/// database.
pub struct PgHarness {
    pub store: Arc<PostgresTaskBoardStore>,
    pub boards: BoardService<PostgresTaskBoardStore, DefaultClock>,
    pub labels: LabelService<PostgresTaskBoardStore, DefaultClock>,
    pub transitions: Arc<StatusTransitionService<PostgresTaskBoardStore, DefaultClock>>,
    pub history: StatusHistoryLog<PostgresTaskBoardStore, DefaultClock>,
    pub clock: Arc<DefaultClock>,
    pub runtime: Runtime,
    _guard: CleanupGuard,
}

impl PgHarness {
    /// Clones the template into a uniquely named database and wires the
    /// services to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the template, database, pool or runtime cannot be
    /// created.
    pub fn prepare(cluster: &'static TestCluster, prefix: &str) -> eyre::Result<Self> {
        ensure_template(cluster)?;
        let db_name = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
            .map_err(|e| eyre::eyre!("create database failed: {e}"))?;
        let guard = CleanupGuard {
            cluster,
            db_name: db_name.clone(),
        };

        let url = cluster.connection().database_url(&db_name);
        let manager = ConnectionManager::<PgConnection>::new(url);
        let pool = Pool::builder().max_size(4).build(manager)?;
        let store = Arc::new(PostgresTaskBoardStore::new(pool));
        let clock = Arc::new(DefaultClock);

        Ok(Self {
            boards: BoardService::new(Arc::clone(&store), Arc::clone(&clock)),
            labels: LabelService::new(Arc::clone(&store), Arc::clone(&clock)),
            transitions: Arc::new(StatusTransitionService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
            )),
            history: StatusHistoryLog::new(Arc::clone(&store), Arc::clone(&clock)),
            store,
            clock,
            runtime: test_runtime()?,
            _guard: guard,
        })
    }

    /// Registers a user with the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub fn register(&self, name: &str, role: Role) -> eyre::Result<User> {
        let user = User::new(name, role)?;
        self.runtime.block_on(self.store.store_user(&user))?;
        Ok(user)
    }

    /// Creates an owner with one board and one `to-do` task.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn seed(&self) -> eyre::Result<(User, Board, Task)> {
        let owner = self.register("olivia", Role::Owner)?;
        let board = self
            .runtime
            .block_on(self.boards.create_board(&owner, BoardRequest::new("Release 1.0")))?;
        let task = self.runtime.block_on(self.boards.create_task(
            &owner,
            board.id(),
            TaskRequest::new("Implement login", "Password login"),
        ))?;
        Ok((owner, board, task))
    }
}
