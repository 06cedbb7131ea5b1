//! Taskboard: role-gated task workflow for kanban-style boards.
//!
//! Owners create boards and tasks, developers and testers move the tasks
//! assigned to them, and every status change is recorded in an append-only
//! history.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Boards, tasks, labels, transitions and status history
//! - [`config`]: Limits and owner transition policy

pub mod config;
pub mod task;
