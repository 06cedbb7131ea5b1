//! Task board workflow.
//!
//! Boards own tasks; tasks move through `to-do → in-progress → testing →
//! dev-review → done → close` under role-gated rules, and every accepted
//! move is written to an append-only history. The module follows hexagonal
//! architecture:
//!
//! - Domain types and the transition authority in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
