//! Snapshot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the full task list as one JSON blob under a fixed key.
//! - Persist the selected UI theme under a second fixed key.
//! - Keep key-value storage details inside the persistence boundary.
//!
//! # Invariants
//! - `save_tasks` always writes the complete list; there are no partial
//!   updates to the snapshot.
//! - An absent key or an unparseable stored blob reads as "no data" (empty
//!   list / no theme), never as an error.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::Task;
use crate::model::theme::Theme;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASKS_KEY: &str = "tasks";
const THEME_KEY: &str = "theme";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialize(serde_json::Error),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize snapshot: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Repository interface for snapshot load/save operations.
pub trait SnapshotRepository {
    /// Loads the persisted task list.
    ///
    /// Returns the empty list when no snapshot exists or the stored blob
    /// fails to parse.
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;

    /// Serializes and persists the full task list.
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;

    /// Loads the persisted theme, if any. Unknown values read as `None`.
    fn load_theme(&self) -> RepoResult<Option<Theme>>;

    /// Persists the selected theme.
    fn save_theme(&self, theme: Theme) -> RepoResult<()>;
}

/// SQLite-backed snapshot repository over the `local_store` key-value table.
pub struct SqliteSnapshotRepository {
    conn: Connection,
}

impl SqliteSnapshotRepository {
    /// Wraps a connection after verifying it has been migrated.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is zero.
    /// - `MissingRequiredTable` when the `local_store` table is absent.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version: latest_version(),
                actual_version,
            });
        }

        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'local_store';",
            [],
            |row| row.get(0),
        )?;
        if table_count == 0 {
            return Err(RepoError::MissingRequiredTable("local_store"));
        }

        Ok(Self { conn })
    }

    fn read_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO local_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }
}

impl SnapshotRepository for SqliteSnapshotRepository {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let Some(raw) = self.read_value(TASKS_KEY)? else {
            debug!("event=snapshot_load module=repo status=ok tasks=0 source=absent");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(
                    "event=snapshot_load module=repo status=ok tasks={}",
                    tasks.len()
                );
                Ok(tasks)
            }
            Err(err) => {
                // Unparseable snapshot degrades to "no data" per contract.
                warn!(
                    "event=snapshot_load module=repo status=recovered error_code=snapshot_parse_failed error={err}"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        let raw = serde_json::to_string(tasks)?;
        self.write_value(TASKS_KEY, &raw)?;
        debug!(
            "event=snapshot_save module=repo status=ok tasks={}",
            tasks.len()
        );
        Ok(())
    }

    fn load_theme(&self) -> RepoResult<Option<Theme>> {
        let Some(raw) = self.read_value(THEME_KEY)? else {
            return Ok(None);
        };

        let theme = Theme::parse(&raw);
        if theme.is_none() {
            warn!(
                "event=theme_load module=repo status=recovered error_code=theme_parse_failed value={raw}"
            );
        }
        Ok(theme)
    }

    fn save_theme(&self, theme: Theme) -> RepoResult<()> {
        self.write_value(THEME_KEY, theme.as_str())
    }
}
