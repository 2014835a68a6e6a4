//! Core domain logic for taskdeck.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging};
pub use model::task::{Priority, Task, TaskId};
pub use model::theme::Theme;
pub use repo::snapshot_repo::{
    RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use store::task_store::{StoreError, StoreResult, TaskStore};
pub use view::project::{project, Filter, SortKey};
