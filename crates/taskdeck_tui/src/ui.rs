//! Frame renderer.
//!
//! # Responsibility
//! - Rebuild the entire visible list from the current projection on every
//!   draw; there is no diffing and no partial update.
//! - Record the list's inner rectangle on the app for mouse hit-testing.

use crate::app::{overdue_now, AddField, App, Mode};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use taskdeck_core::{Filter, SnapshotRepository, SortKey, Task, Theme};

/// Resolved colors for the active theme.
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub selection_bg: Color,
    pub high: Color,
    pub medium: Color,
    pub low: Color,
    pub overdue: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                selection_bg: Color::Rgb(50, 50, 70),
                high: Color::Red,
                medium: Color::Yellow,
                low: Color::Green,
                overdue: Color::LightRed,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                dim: Color::Gray,
                accent: Color::Blue,
                selection_bg: Color::Rgb(210, 220, 240),
                high: Color::Red,
                medium: Color::Rgb(180, 120, 0),
                low: Color::Rgb(0, 130, 0),
                overdue: Color::Red,
            },
        }
    }
}

/// Draws one full frame from current app state.
pub fn draw<R: SnapshotRepository>(frame: &mut Frame<'_>, app: &mut App<R>) {
    let palette = Palette::for_theme(app.theme);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)),
        area,
    );

    let form_height = if matches!(app.mode, Mode::Adding(_)) { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(form_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_toolbar(frame, chunks[0], app, &palette);
    if form_height > 0 {
        draw_add_form(frame, chunks[1], app, &palette);
    }
    draw_task_list(frame, chunks[2], app, &palette);
    draw_status(frame, chunks[3], app, &palette);
}

fn draw_toolbar<R: SnapshotRepository>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App<R>,
    palette: &Palette,
) {
    let active = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(palette.dim);

    let filter_span = |filter: Filter, label: &'static str| {
        Span::styled(
            label,
            if app.filter == filter { active } else { inactive },
        )
    };

    let mut spans = vec![
        Span::raw(" "),
        filter_span(Filter::All, "[1] all"),
        Span::raw("  "),
        filter_span(Filter::Active, "[2] active"),
        Span::raw("  "),
        filter_span(Filter::Completed, "[3] completed"),
        Span::raw("   sort: "),
    ];
    for (key, label) in [
        (SortKey::Priority, "priority"),
        (SortKey::Date, "date"),
        (SortKey::Name, "name"),
    ] {
        spans.push(Span::styled(
            label,
            if app.sort == key { active } else { inactive },
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw("  theme: "));
    spans.push(Span::styled(app.theme.as_str(), active));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_add_form<R: SnapshotRepository>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App<R>,
    palette: &Palette,
) {
    let Mode::Adding(form) = &app.mode else {
        return;
    };

    let focused = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let blurred = Style::default().fg(palette.fg);
    let style_for = |field: AddField| if form.focus == field { focused } else { blurred };

    let cursor = |field: AddField| if form.focus == field { "▏" } else { "" };
    let line = Line::from(vec![
        Span::styled("text: ", Style::default().fg(palette.dim)),
        Span::styled(
            format!("{}{}", form.text, cursor(AddField::Text)),
            style_for(AddField::Text),
        ),
        Span::raw("   "),
        Span::styled("due: ", Style::default().fg(palette.dim)),
        Span::styled(
            format!("{}{}", form.due_date, cursor(AddField::DueDate)),
            style_for(AddField::DueDate),
        ),
        Span::raw("   "),
        Span::styled("priority: ", Style::default().fg(palette.dim)),
        Span::styled(
            format!("< {} >", form.priority.as_str()),
            style_for(AddField::Priority),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("add task (tab: next field, enter: add, esc: close)");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_task_list<R: SnapshotRepository>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut App<R>,
    palette: &Palette,
) {
    let block = Block::default().borders(Borders::ALL).title("tasks");
    let inner = block.inner(area);
    app.ensure_selected_visible(inner.height as usize);
    app.list_inner = inner;

    let scroll = app.scroll;
    let selected = app.selected;
    let dragging = app.drag.as_ref().map(|drag| drag.id);

    let rows: Vec<(bool, bool, bool, Task)> = app
        .displayed_tasks()
        .into_iter()
        .enumerate()
        .skip(scroll)
        .take(inner.height as usize)
        .map(|(index, task)| {
            (
                index == selected,
                dragging == Some(task.id),
                app.is_removing(task.id),
                task.clone(),
            )
        })
        .collect();

    let editing = match &app.mode {
        Mode::Editing { id, buffer } => Some((*id, buffer.clone())),
        _ => None,
    };

    let items: Vec<ListItem<'_>> = rows
        .into_iter()
        .map(|(is_selected, is_dragged, is_removing, task)| {
            let mut line = task_line(&task, editing.as_ref(), palette);
            if is_selected {
                line = line.style(Style::default().bg(palette.selection_bg));
            }
            if is_dragged {
                line = line.style(
                    Style::default()
                        .bg(palette.selection_bg)
                        .add_modifier(Modifier::REVERSED),
                );
            }
            if is_removing {
                line = line.style(
                    Style::default()
                        .fg(palette.dim)
                        .add_modifier(Modifier::DIM | Modifier::ITALIC),
                );
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn task_line<'a>(
    task: &Task,
    editing: Option<&(taskdeck_core::TaskId, String)>,
    palette: &Palette,
) -> Line<'a> {
    let priority_color = match task.priority.rank() {
        0 => palette.high,
        1 => palette.medium,
        _ => palette.low,
    };

    let mut spans = vec![
        Span::styled("● ", Style::default().fg(priority_color)),
        Span::raw(if task.completed { "[x] " } else { "[ ] " }),
    ];

    match editing {
        Some((id, buffer)) if *id == task.id => {
            spans.push(Span::styled(
                format!("{buffer}▏"),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::UNDERLINED),
            ));
        }
        _ => {
            let text_style = if task.completed {
                Style::default()
                    .fg(palette.dim)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            spans.push(Span::styled(task.text.clone(), text_style));
        }
    }

    if let Some(due) = task.due_date {
        let due_style = if overdue_now(task) {
            Style::default()
                .fg(palette.overdue)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.dim)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("({due})"), due_style));
    }

    Line::from(spans)
}

fn draw_status<R: SnapshotRepository>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &App<R>,
    palette: &Palette,
) {
    let line = match &app.status {
        Some(message) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(palette.overdue),
        )),
        None => Line::from(Span::styled(
            " a add  enter/e edit  space toggle  d delete  f/1-3 filter  s sort  t theme  drag to reorder  q quit",
            Style::default().fg(palette.dim),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
