//! Drag-reorder geometry.
//!
//! # Responsibility
//! - Compute where a dragged row should be inserted from the pointer's
//!   vertical position against the midpoints of the other rows.
//! - Relocate the dragged ID inside a display-order preview.
//!
//! # Invariants
//! - Pure functions only; the app layer owns all state so the reorder rule
//!   is testable without a terminal.

use taskdeck_core::TaskId;

/// Returns the insertion index for a pointer at `pointer_y`, given the rows
/// of the non-dragged items as `(top, height)` pairs in display order.
///
/// The dragged row is inserted before the first row whose vertical midpoint
/// is at or below the pointer; past every midpoint it lands at the end.
pub fn drop_index(pointer_y: u16, rows: &[(u16, u16)]) -> usize {
    rows.iter()
        .position(|&(top, height)| pointer_y <= top + height / 2)
        .unwrap_or(rows.len())
}

/// Rebuilds a display order with `dragged` placed at `insert_before` among
/// the remaining entries.
pub fn relocate(order: &[TaskId], dragged: TaskId, insert_before: usize) -> Vec<TaskId> {
    let mut rest: Vec<TaskId> = order
        .iter()
        .copied()
        .filter(|&id| id != dragged)
        .collect();
    let at = insert_before.min(rest.len());
    rest.insert(at, dragged);
    rest
}
