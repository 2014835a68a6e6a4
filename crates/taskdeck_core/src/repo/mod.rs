//! Persistence adapters for the task snapshot.
//!
//! # Responsibility
//! - Define the repository contract used by the task store.
//! - Keep SQL and wire-format details inside the persistence boundary.

pub mod snapshot_repo;
