//! Application state shared between the event loop and the renderer.
//!
//! # Responsibility
//! - Own the task store plus all session UI state (filter, sort, theme,
//!   input mode, selection, drag preview, pending removals).
//! - Translate key and mouse events into store mutations and re-derive the
//!   projection after every mutation.
//!
//! # Invariants
//! - Filter and sort are explicit state passed into `project`; they are
//!   session-only and never persisted.
//! - Every store mutation is followed by `refresh()` before the next frame.
//! - All task references are stable IDs; a task disappearing mid-gesture
//!   (delete window, edit window) degrades to a harmless no-op.

use crate::drag::{drop_index, relocate};
use chrono::{NaiveDate, Utc};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{info, warn};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use taskdeck_core::{
    project, Filter, Priority, SnapshotRepository, SortKey, StoreError, Task, TaskId, TaskStore,
    Theme,
};

/// Fixed removal-animation window between the delete intent and the actual
/// store mutation.
pub const REMOVE_ANIMATION: Duration = Duration::from_millis(300);

/// Focused field of the add form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddField {
    #[default]
    Text,
    DueDate,
    Priority,
}

/// In-progress add form. Cleared (priority back to Low) after every add.
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    pub text: String,
    pub due_date: String,
    pub priority: Priority,
    pub focus: AddField,
}

/// Input mode of the UI.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    Adding(AddForm),
    Editing { id: TaskId, buffer: String },
}

/// A delete intent waiting out the removal-animation window.
#[derive(Debug, Clone, Copy)]
pub struct PendingRemoval {
    pub id: TaskId,
    pub fires_at: Instant,
}

/// An in-progress mouse drag with its display-order preview.
#[derive(Debug, Clone)]
pub struct DragState {
    pub id: TaskId,
    pub preview: Vec<TaskId>,
}

/// Application state. Generic over the repository so app logic is testable
/// against an in-memory database.
pub struct App<R: SnapshotRepository> {
    store: TaskStore<R>,
    pub filter: Filter,
    pub sort: SortKey,
    pub theme: Theme,
    pub mode: Mode,
    pub selected: usize,
    pub scroll: usize,
    /// Current projection; rebuilt in full after every mutation.
    pub view: Vec<Task>,
    pub drag: Option<DragState>,
    pub pending_removals: Vec<PendingRemoval>,
    pub status: Option<String>,
    pub should_quit: bool,
    /// Inner rectangle of the task list, set by the renderer each frame and
    /// used for mouse hit-testing.
    pub list_inner: Rect,
}

impl<R: SnapshotRepository> App<R> {
    /// Creates the app, restoring the persisted theme.
    pub fn new(store: TaskStore<R>) -> Result<Self, StoreError> {
        let theme = store.load_theme()?.unwrap_or_default();
        let mut app = Self {
            store,
            filter: Filter::default(),
            sort: SortKey::default(),
            theme,
            mode: Mode::Normal,
            selected: 0,
            scroll: 0,
            view: Vec::new(),
            drag: None,
            pending_removals: Vec::new(),
            status: None,
            should_quit: false,
            list_inner: Rect::default(),
        };
        app.refresh();
        Ok(app)
    }

    pub fn store(&self) -> &TaskStore<R> {
        &self.store
    }

    /// Re-derives the projection and keeps selection/drag state in bounds.
    pub fn refresh(&mut self) {
        self.view = project(self.store.tasks(), self.filter, self.sort);
        if self.view.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.view.len() {
            self.selected = self.view.len() - 1;
        }

        // A membership change under the pointer invalidates the preview.
        if let Some(drag) = &self.drag {
            let intact = drag.preview.len() == self.view.len()
                && drag
                    .preview
                    .iter()
                    .all(|id| self.view.iter().any(|task| task.id == *id));
            if !intact {
                self.drag = None;
            }
        }
    }

    /// Display order: the drag preview while a drag is in progress,
    /// otherwise the projection order.
    pub fn display_order(&self) -> Vec<TaskId> {
        match &self.drag {
            Some(drag) => drag.preview.clone(),
            None => self.view.iter().map(|task| task.id).collect(),
        }
    }

    /// Tasks in display order.
    pub fn displayed_tasks(&self) -> Vec<&Task> {
        self.display_order()
            .iter()
            .filter_map(|id| self.view.iter().find(|task| task.id == *id))
            .collect::<Vec<_>>()
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.display_order().get(self.selected).copied()
    }

    pub fn is_removing(&self, id: TaskId) -> bool {
        self.pending_removals.iter().any(|pending| pending.id == id)
    }

    /// Keeps `selected` inside the visible window of `height` rows.
    pub fn ensure_selected_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + height {
            self.scroll = self.selected + 1 - height;
        }
        let max_scroll = self.display_order().len().saturating_sub(height);
        if self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
    }

    /// Fires expired delete intents. Called on every tick.
    pub fn tick(&mut self, now: Instant) {
        let due: Vec<TaskId> = self
            .pending_removals
            .iter()
            .filter(|pending| pending.fires_at <= now)
            .map(|pending| pending.id)
            .collect();
        if due.is_empty() {
            return;
        }
        self.pending_removals.retain(|pending| pending.fires_at > now);

        for id in due {
            match self.store.remove(id) {
                Ok(_) => {}
                // Already gone; id-keyed removal makes the window harmless.
                Err(StoreError::NotFound(_)) => {}
                Err(err) => self.fail("remove", &err),
            }
        }
        self.refresh();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status = None;
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Adding(_) => self.handle_add_key(key),
            Mode::Editing { .. } => self.handle_edit_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.mode = Mode::Adding(AddForm::default()),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.display_order().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    match self.store.toggle_complete(id) {
                        Ok(_) => self.refresh(),
                        Err(err) => self.fail("toggle", &err),
                    }
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                let target = self
                    .selected_id()
                    .and_then(|id| self.store.get(id))
                    .map(|task| (task.id, task.text.clone()));
                if let Some((id, buffer)) = target {
                    self.mode = Mode::Editing { id, buffer };
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => self.begin_remove(),
            KeyCode::Char('f') => {
                self.filter = next_filter(self.filter);
                self.refresh();
            }
            KeyCode::Char('1') => {
                self.filter = Filter::All;
                self.refresh();
            }
            KeyCode::Char('2') => {
                self.filter = Filter::Active;
                self.refresh();
            }
            KeyCode::Char('3') => {
                self.filter = Filter::Completed;
                self.refresh();
            }
            KeyCode::Char('s') => {
                self.sort = next_sort(self.sort);
                self.refresh();
            }
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    fn handle_add_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                return;
            }
            KeyCode::Enter => {
                self.commit_add();
                return;
            }
            _ => {}
        }

        let Mode::Adding(form) = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Tab => form.focus = next_add_field(form.focus),
            KeyCode::Left if form.focus == AddField::Priority => {
                form.priority = previous_priority(form.priority);
            }
            KeyCode::Right if form.focus == AddField::Priority => {
                form.priority = next_priority(form.priority);
            }
            KeyCode::Backspace => {
                match form.focus {
                    AddField::Text => form.text.pop(),
                    AddField::DueDate => form.due_date.pop(),
                    AddField::Priority => None,
                };
            }
            KeyCode::Char(c) => match form.focus {
                AddField::Text => form.text.push(c),
                AddField::DueDate => form.due_date.push(c),
                AddField::Priority => {}
            },
            _ => {}
        }
    }

    fn commit_add(&mut self) {
        let Mode::Adding(form) = &self.mode else {
            return;
        };
        let text = form.text.clone();
        let priority = form.priority;
        let due_date = parse_due_date(&form.due_date);

        match self.store.add(&text, priority, due_date) {
            Ok(Some(id)) => {
                // Inputs clear and the priority selector resets to Low.
                self.mode = Mode::Adding(AddForm::default());
                self.refresh();
                if let Some(position) = self.view.iter().position(|task| task.id == id) {
                    self.selected = position;
                }
            }
            // Empty text is silently rejected; the form stays as typed.
            Ok(None) => {}
            Err(err) => self.fail("add", &err),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            // Leaving the edit commits the trimmed text; Enter forces the
            // commit immediately instead of waiting for another action.
            KeyCode::Enter | KeyCode::Esc => {
                self.commit_edit();
                return;
            }
            _ => {}
        }

        let Mode::Editing { buffer, .. } = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
    }

    fn commit_edit(&mut self) {
        let Mode::Editing { id, buffer } = std::mem::replace(&mut self.mode, Mode::Normal)
        else {
            return;
        };
        match self.store.edit_text(id, &buffer) {
            Ok(()) => self.refresh(),
            // Task removed while the edit was open; nothing left to commit.
            Err(StoreError::NotFound(_)) => self.refresh(),
            Err(err) => self.fail("edit", &err),
        }
    }

    fn begin_remove(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        // A repeat delete inside the animation window is a no-op.
        if self.is_removing(id) {
            return;
        }
        self.pending_removals.push(PendingRemoval {
            id,
            fires_at: Instant::now() + REMOVE_ANIMATION,
        });
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(err) = self.store.save_theme(self.theme) {
            self.fail("theme", &err);
        }
        info!(
            "event=ui_theme module=app status=ok theme={}",
            self.theme.as_str()
        );
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.mouse_down(mouse.column, mouse.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.mouse_drag(mouse.row),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_up(),
            _ => {}
        }
    }

    fn row_at(&self, x: u16, y: u16) -> Option<usize> {
        let inner = self.list_inner;
        if x < inner.x || x >= inner.x + inner.width {
            return None;
        }
        if y < inner.y || y >= inner.y + inner.height {
            return None;
        }
        let index = (y - inner.y) as usize + self.scroll;
        (index < self.display_order().len()).then_some(index)
    }

    fn mouse_down(&mut self, x: u16, y: u16) {
        if self.drag.is_some() || !matches!(self.mode, Mode::Normal) {
            return;
        }
        let Some(index) = self.row_at(x, y) else {
            return;
        };
        self.selected = index;
        let order = self.display_order();
        let id = order[index];
        self.drag = Some(DragState { id, preview: order });
    }

    fn mouse_drag(&mut self, y: u16) {
        let Some(drag) = &self.drag else {
            return;
        };
        let dragged = drag.id;
        let others = drag.preview.len().saturating_sub(1);
        let inner = self.list_inner;

        // The non-dragged rows, packed top to bottom as the renderer lays
        // them out (height 1 each); rows scrolled above the viewport clamp
        // to the top and can never match a pointer inside the list.
        let rows: Vec<(u16, u16)> = (0..others)
            .map(|index| {
                let top = inner.y as isize + index as isize - self.scroll as isize;
                (top.max(0) as u16, 1)
            })
            .collect();

        let insert_before = drop_index(y, &rows);
        let preview = relocate(&drag.preview, dragged, insert_before);
        if let Some(drag) = &mut self.drag {
            if drag.preview != preview {
                drag.preview = preview;
            }
        }
    }

    fn mouse_up(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let current: Vec<TaskId> = self.view.iter().map(|task| task.id).collect();
        if drag.preview == current {
            // Plain click; nothing moved.
            return;
        }

        match self.store.reorder_visible(&drag.preview) {
            Ok(()) => info!(
                "event=ui_reorder module=app status=ok moved={}",
                drag.preview.len()
            ),
            Err(err) => self.fail("reorder", &err),
        }
        self.refresh();
        if let Some(position) = self.view.iter().position(|task| task.id == drag.id) {
            self.selected = position;
        }
    }

    fn fail(&mut self, op: &str, err: &StoreError) {
        warn!("event=ui_action module=app status=error op={op} error={err}");
        self.status = Some(format!("{op} failed: {err}"));
    }
}

/// Parses the due-date input; blank or unparseable input means no due date.
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Returns whether the task's due date should render as overdue right now.
pub fn overdue_now(task: &Task) -> bool {
    task.is_overdue(Utc::now())
}

fn next_filter(filter: Filter) -> Filter {
    match filter {
        Filter::All => Filter::Active,
        Filter::Active => Filter::Completed,
        Filter::Completed => Filter::All,
    }
}

fn next_sort(sort: SortKey) -> SortKey {
    match sort {
        SortKey::Priority => SortKey::Date,
        SortKey::Date => SortKey::Name,
        SortKey::Name => SortKey::Priority,
    }
}

fn next_add_field(field: AddField) -> AddField {
    match field {
        AddField::Text => AddField::DueDate,
        AddField::DueDate => AddField::Priority,
        AddField::Priority => AddField::Text,
    }
}

fn next_priority(priority: Priority) -> Priority {
    match priority {
        Priority::Low => Priority::Medium,
        Priority::Medium => Priority::High,
        Priority::High => Priority::Low,
    }
}

fn previous_priority(priority: Priority) -> Priority {
    match priority {
        Priority::Low => Priority::High,
        Priority::Medium => Priority::Low,
        Priority::High => Priority::Medium,
    }
}
