//! In-memory adapter implementations.
//!
//! These adapters provide a simple, thread-safe store suitable for unit
//! testing and embedding without database dependencies.

mod store;

pub use store::InMemoryTaskBoardStore;
