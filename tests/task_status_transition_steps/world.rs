//! Shared world state for task status transition BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use taskboard::task::{
    adapters::memory::InMemoryTaskBoardStore,
    domain::{Board, Role, Task, User},
    ports::UserDirectory,
    services::{
        AssignmentService, BoardService, StatusHistoryLog, StatusTransitionService,
        TaskBoardResult, TransitionOutcome,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Store type used by the BDD world.
pub type TestStore = InMemoryTaskBoardStore;

/// Scenario world for task status transition behaviour tests.
pub struct TransitionWorld {
    pub boards: BoardService<TestStore, DefaultClock>,
    pub transitions: StatusTransitionService<TestStore, DefaultClock>,
    pub assignments: AssignmentService<TestStore, DefaultClock>,
    pub history: StatusHistoryLog<TestStore, DefaultClock>,
    pub store: Arc<TestStore>,
    pub users: HashMap<String, User>,
    pub owner: Option<User>,
    pub board: Option<Board>,
    pub task: Option<Task>,
    pub last_transition: Option<TaskBoardResult<TransitionOutcome>>,
    pub last_assignment: Option<TaskBoardResult<Task>>,
}

impl TransitionWorld {
    /// Creates a world backed by an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryTaskBoardStore::new());
        let clock = Arc::new(DefaultClock);

        Self {
            boards: BoardService::new(Arc::clone(&store), Arc::clone(&clock)),
            transitions: StatusTransitionService::new(Arc::clone(&store), Arc::clone(&clock)),
            assignments: AssignmentService::new(Arc::clone(&store), Arc::clone(&clock)),
            history: StatusHistoryLog::new(Arc::clone(&store), clock),
            store,
            users: HashMap::new(),
            owner: None,
            board: None,
            task: None,
            last_transition: None,
            last_assignment: None,
        }
    }

    /// Registers a user under `name`, reusing an existing registration.
    pub fn register(&mut self, name: &str, role: Role) -> Result<User, eyre::Report> {
        if let Some(existing) = self.users.get(name) {
            return Ok(existing.clone());
        }
        let user = User::new(name, role)?;
        run_async(self.store.store_user(&user))?;
        self.users.insert(name.to_owned(), user.clone());
        Ok(user)
    }

    /// Looks up a previously registered user.
    pub fn user(&self, name: &str) -> Result<User, eyre::Report> {
        self.users
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("no user named {name} in scenario world"))
    }

    /// Returns the board owner.
    pub fn owner(&self) -> Result<User, eyre::Report> {
        self.owner
            .clone()
            .ok_or_else(|| eyre::eyre!("missing board owner in scenario world"))
    }

    /// Returns the scenario task.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TransitionWorld {
    TransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
