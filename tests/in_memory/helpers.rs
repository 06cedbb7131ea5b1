//! Shared helpers for in-memory store integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::task::{
    adapters::memory::InMemoryTaskBoardStore,
    domain::{Role, User},
    ports::UserDirectory,
    services::{
        AssignmentService, BoardService, LabelService, StatusHistoryLog, StatusTransitionService,
    },
};

/// Store type shared by the integration tests.
pub type TestStore = InMemoryTaskBoardStore;

/// Every service wired to one in-memory store.
pub struct Harness {
    pub store: Arc<TestStore>,
    pub boards: BoardService<TestStore, DefaultClock>,
    pub labels: LabelService<TestStore, DefaultClock>,
    pub assignments: AssignmentService<TestStore, DefaultClock>,
    pub transitions: StatusTransitionService<TestStore, DefaultClock>,
    pub history: StatusHistoryLog<TestStore, DefaultClock>,
}

impl Harness {
    /// Registers a user with the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the store rejects the user.
    pub async fn register(&self, name: &str, role: Role) -> Result<User, eyre::Report> {
        let user = User::new(name, role)?;
        self.store.store_user(&user).await?;
        Ok(user)
    }
}

/// Provides services over a fresh in-memory store for each test.
#[fixture]
pub fn harness() -> Harness {
    let store = Arc::new(InMemoryTaskBoardStore::new());
    let clock = Arc::new(DefaultClock);
    Harness {
        boards: BoardService::new(Arc::clone(&store), Arc::clone(&clock)),
        labels: LabelService::new(Arc::clone(&store), Arc::clone(&clock)),
        assignments: AssignmentService::new(Arc::clone(&store), Arc::clone(&clock)),
        transitions: StatusTransitionService::new(Arc::clone(&store), Arc::clone(&clock)),
        history: StatusHistoryLog::new(Arc::clone(&store), clock),
        store,
    }
}
