//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the snapshot.
//! - Provide the priority ranking used by the view pipeline.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `created` is assigned once at construction and never mutated.
//! - `due_date` is a calendar date; time-of-day is not tracked.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every task in the list.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Task priority, ranked `High < Medium < Low` for display ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Most urgent; sorts first.
    High,
    /// Middle rank.
    Medium,
    /// Default for newly added tasks; sorts last.
    #[default]
    Low,
}

impl Priority {
    /// Sort rank: `High(0) < Medium(1) < Low(2)`.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Stable lowercase label, identical to the wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Canonical task record.
///
/// Wire format is a JSON object inside the snapshot array: `created` as an
/// RFC 3339 timestamp, `due_date` as an ISO calendar date or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable ID; all store operations are keyed by this, never by index.
    pub id: TaskId,
    /// User text. Non-empty (after trim) on add; any value after edit.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Display priority.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp. Set once, never mutated.
    pub created: DateTime<Utc>,
}

impl Task {
    /// Creates a new task with a generated stable ID and `created = now`.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    /// - Text trimming/validation is the store's responsibility, not the
    ///   model's.
    pub fn new(
        text: impl Into<String>,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            priority,
            due_date,
            created: Utc::now(),
        }
    }

    /// Returns whether the due date has passed at `now`.
    ///
    /// A date-only due value counts as overdue once its start of day (UTC)
    /// is strictly before `now`, so a task due today reads as overdue for
    /// the whole of that day.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date
            .map(|due| due.and_time(NaiveTime::MIN).and_utc() < now)
            .unwrap_or(false)
    }
}
