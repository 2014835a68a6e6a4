//! Terminal front end for the taskdeck task list.
//!
//! # Responsibility
//! - Resolve configuration (data directory, log level), bootstrap logging
//!   and the database, and run the interactive event loop.
//! - Restore the terminal on every exit path.

mod app;
mod drag;
mod ui;

use app::App;
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::info;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::error::Error;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use taskdeck_core::db::open_db;
use taskdeck_core::{default_log_level, init_logging, SqliteSnapshotRepository, TaskStore};

/// Local task list with filtering, sorting, and drag reordering.
#[derive(Debug, Parser)]
#[command(name = "taskdeck", version)]
struct Args {
    /// Data directory holding the database and logs.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("taskdeck: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let data_dir = args
        .data_dir
        .or_else(default_data_dir)
        .ok_or("could not resolve a data directory; pass --data-dir")?;
    std::fs::create_dir_all(&data_dir)?;

    let level = args
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, data_dir.join("logs"))?;

    let conn = open_db(data_dir.join("taskdeck.db"))?;
    let repo = SqliteSnapshotRepository::try_new(conn)?;
    let store = TaskStore::open(repo)?;
    let app = App::new(store)?;

    info!(
        "event=tui_start module=main status=ok data_dir={} tasks={}",
        data_dir.display(),
        app.store().len()
    );
    run_tui(app)
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("taskdeck"))
}

fn run_tui(mut app: App<SqliteSnapshotRepository>) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<SqliteSnapshotRepository>,
) -> Result<(), Box<dyn Error>> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        if app.should_quit {
            info!("event=tui_stop module=main status=ok");
            break;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_default();
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                // Resize and the rest are picked up by the next draw.
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick(Instant::now());
            last_tick = Instant::now();
        }
    }

    Ok(())
}
