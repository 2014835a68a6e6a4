//! Canonical task list and its mutation operations.

pub mod task_store;
