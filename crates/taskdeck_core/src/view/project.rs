//! Filtered-then-sorted projection of the task list.
//!
//! # Responsibility
//! - Derive the display order from the canonical list, filter, and sort key.
//!
//! # Invariants
//! - `project` never mutates its input; it returns a fresh ordered vector.
//! - Every sort is stable: equal elements keep their relative canonical
//!   order, which is what makes manual order the tiebreak everywhere.

use crate::model::task::Task;
use std::cmp::Ordering;

/// Completion filter applied before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    /// Not completed.
    Active,
    Completed,
}

impl Filter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// UI/log label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

/// Sort key applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending by rank `high < medium < low`. Default.
    #[default]
    Priority,
    /// Dated tasks ascending by date; dateless tasks after all dated ones.
    Date,
    /// Case-aware lexicographic order of the task text.
    Name,
}

impl SortKey {
    /// UI/log label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Date => "date",
            Self::Name => "name",
        }
    }
}

/// Derives the display projection: filter, then stable sort.
///
/// The result is a new owned sequence; the input list is never touched.
pub fn project(tasks: &[Task], filter: Filter, sort: SortKey) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect();
    view.sort_by(|a, b| compare(a, b, sort));
    view
}

fn compare(a: &Task, b: &Task, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::Date => match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            // Dateless tasks sort after all dated tasks.
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        },
        SortKey::Name => compare_names(&a.text, &b.text),
    }
}

/// Case-aware text ordering: case-insensitive primary compare with a
/// case-sensitive tiebreak.
fn compare_names(a: &str, b: &str) -> Ordering {
    match a.to_lowercase().cmp(&b.to_lowercase()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}
