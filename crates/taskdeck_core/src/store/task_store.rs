//! Canonical task store.
//!
//! # Responsibility
//! - Hold the ordered task list for the process lifetime.
//! - Mediate every mutation and write the snapshot through after each one.
//!
//! # Invariants
//! - All operations are keyed by stable `TaskId`, never by list position.
//! - After every successful mutation the persisted snapshot equals the
//!   in-memory list (synchronous write-through, no batching).
//! - `reorder` never changes list membership; a membership mismatch fails
//!   the call and leaves the order untouched.

use crate::model::task::{Priority, Task, TaskId};
use crate::model::theme::Theme;
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository};
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for task store operations.
#[derive(Debug)]
pub enum StoreError {
    /// No task with the given ID exists in the list.
    NotFound(TaskId),
    /// Reorder input is not a duplicate-free selection of existing tasks.
    OrderMismatch,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::OrderMismatch => {
                write!(f, "reorder input does not match current list membership")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Canonical ordered task list with write-through persistence.
pub struct TaskStore<R: SnapshotRepository> {
    repo: R,
    tasks: Vec<Task>,
}

impl<R: SnapshotRepository> TaskStore<R> {
    /// Loads the store from the repository snapshot (empty when none exists).
    pub fn open(repo: R) -> StoreResult<Self> {
        let tasks = repo.load_tasks()?;
        info!(
            "event=store_open module=store status=ok tasks={}",
            tasks.len()
        );
        Ok(Self { repo, tasks })
    }

    /// Current canonical order. Read-only; mutations go through operations.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up one task by stable ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a new task, or returns `Ok(None)` when `text` trims to empty.
    ///
    /// # Contract
    /// - New tasks start with `completed = false` and `created = now`.
    /// - Rejected input mutates nothing and writes nothing.
    pub fn add(
        &mut self,
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> StoreResult<Option<TaskId>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("event=store_add module=store status=rejected reason=empty_text");
            return Ok(None);
        }

        let task = Task::new(trimmed, priority, due_date);
        let id = task.id;
        self.tasks.push(task);
        self.persist()?;
        info!(
            "event=store_add module=store status=ok id={id} priority={} has_due_date={}",
            priority.as_str(),
            due_date.is_some()
        );
        Ok(Some(id))
    }

    /// Flips the completion flag. Returns the new state.
    pub fn toggle_complete(&mut self, id: TaskId) -> StoreResult<bool> {
        let task = self.task_mut(id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.persist()?;
        info!("event=store_toggle module=store status=ok id={id} completed={completed}");
        Ok(completed)
    }

    /// Replaces the task text with the trimmed new value.
    ///
    /// Empty text is allowed here: validation applies on add only.
    pub fn edit_text(&mut self, id: TaskId, new_text: &str) -> StoreResult<()> {
        let trimmed = new_text.trim().to_string();
        let task = self.task_mut(id)?;
        task.text = trimmed;
        self.persist()?;
        info!("event=store_edit module=store status=ok id={id}");
        Ok(())
    }

    /// Removes the task from the list, returning the removed record.
    pub fn remove(&mut self, id: TaskId) -> StoreResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = self.tasks.remove(index);
        self.persist()?;
        info!(
            "event=store_remove module=store status=ok id={id} remaining={}",
            self.tasks.len()
        );
        Ok(removed)
    }

    /// Replaces the full list order to match `ids`.
    ///
    /// `ids` must be a permutation of the entire list (identical membership);
    /// otherwise the call fails with `OrderMismatch` and the order is
    /// untouched.
    pub fn reorder(&mut self, ids: &[TaskId]) -> StoreResult<()> {
        if ids.len() != self.tasks.len() {
            return Err(StoreError::OrderMismatch);
        }
        self.reorder_visible(ids)
    }

    /// Reorders a displayed subset of the list by stable ID.
    ///
    /// `ids` is a duplicate-free permutation of any subset of the list (for
    /// example, the tasks visible under an active filter/sort). Tasks in the
    /// subset are reassigned across the subset's original position slots in
    /// the given order; tasks outside the subset keep their positions. With
    /// `ids` covering the whole list this is a plain reorder.
    pub fn reorder_visible(&mut self, ids: &[TaskId]) -> StoreResult<()> {
        let unique: HashSet<TaskId> = ids.iter().copied().collect();
        if unique.len() != ids.len() {
            return Err(StoreError::OrderMismatch);
        }

        let slots: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| unique.contains(&task.id))
            .map(|(index, _)| index)
            .collect();
        if slots.len() != ids.len() {
            return Err(StoreError::OrderMismatch);
        }

        let mut pool: HashMap<TaskId, Task> = slots
            .iter()
            .map(|&slot| (self.tasks[slot].id, self.tasks[slot].clone()))
            .collect();

        let mut next = self.tasks.clone();
        for (&slot, id) in slots.iter().zip(ids.iter()) {
            let Some(task) = pool.remove(id) else {
                return Err(StoreError::OrderMismatch);
            };
            next[slot] = task;
        }

        self.tasks = next;
        self.persist()?;
        info!(
            "event=store_reorder module=store status=ok moved={} total={}",
            ids.len(),
            self.tasks.len()
        );
        Ok(())
    }

    /// Loads the persisted theme through the repository.
    pub fn load_theme(&self) -> StoreResult<Option<Theme>> {
        Ok(self.repo.load_theme()?)
    }

    /// Persists the selected theme through the repository.
    pub fn save_theme(&self, theme: Theme) -> StoreResult<()> {
        self.repo.save_theme(theme)?;
        Ok(())
    }

    fn task_mut(&mut self, id: TaskId) -> StoreResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn persist(&self) -> StoreResult<()> {
        self.repo.save_tasks(&self.tasks)?;
        Ok(())
    }
}
