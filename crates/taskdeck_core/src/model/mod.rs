//! Domain model for the canonical task list.
//!
//! # Responsibility
//! - Define the data structures used by store, projection, and persistence.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`; operations are never
//!   keyed by list position.
//! - `created` is set once at construction and never mutated.

pub mod task;
pub mod theme;
