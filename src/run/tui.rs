use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::capacity::MAX_WINDOW;
use crate::db::Database;
use crate::models::Month;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;

/// Redraw interval while idle; drives the shake animation.
const TICK: Duration = Duration::from_millis(80);

pub(crate) fn as_tui(db: &mut Database, window_size: usize) -> Result<()> {
    let mut app = App::new(Month::current(), window_size);
    app.refresh_all(db)?;
    tracing::info!("terminal UI started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "terminal UI failed");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, strip, borders
            let content_height = f.area().height.saturating_sub(8) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if !event::poll(TICK)? {
            app.tick();
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('1') => switch_screen(app, db, Screen::Calendar)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Capacity)?,
        KeyCode::Tab | KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => {
            app.status_message.clear();
        }
        _ => match app.screen {
            Screen::Calendar => handle_calendar_key(key, app, db)?,
            Screen::Capacity => handle_capacity_key(key, app, db)?,
        },
    }
    Ok(())
}

fn handle_calendar_key(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    let lines = app.activity_line_count();
    let page = app.visible_rows.max(1);
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.move_cursor(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor(1),
        KeyCode::Char(' ') | KeyCode::Enter => {
            app.toggle_cursor_month(db)?;
        }
        KeyCode::Char('x') => commands::handle_command("clear", app, db)?,
        KeyCode::Char('j') | KeyCode::Down => app.activity_scroll.down(lines, page),
        KeyCode::Char('k') | KeyCode::Up => app.activity_scroll.up(),
        KeyCode::Char('g') => app.activity_scroll.reset(),
        KeyCode::Char('G') => app.activity_scroll.bottom(lines, page),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.activity_scroll.half_page_down(lines, page);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.activity_scroll.half_page_up(page);
        }
        _ => {}
    }
    Ok(())
}

fn handle_capacity_key(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('H') | KeyCode::Left => {
            commands::handle_command("prev-month", app, db)?;
        }
        KeyCode::Char('L') | KeyCode::Right => {
            commands::handle_command("next-month", app, db)?;
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            if app.window_size < MAX_WINDOW {
                app.window_size += 1;
                app.refresh_capacity(db)?;
            }
        }
        KeyCode::Char('-') => {
            if app.window_size > 1 {
                app.window_size -= 1;
                app.refresh_capacity(db)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Calendar => app.refresh_calendar(db)?,
        Screen::Capacity => app.refresh_capacity(db)?,
    }
    Ok(())
}
