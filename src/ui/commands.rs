use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, Screen};
use crate::capacity::MAX_WINDOW;
use crate::db::Database;
use crate::import::{import_file, ImportKind};
use crate::models::Month;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit capplan", cmd_quit, r);
    register_command!("quit", "Quit capplan", cmd_quit, r);
    register_command!("c", "Go to Calendar", cmd_calendar, r);
    register_command!("calendar", "Go to Calendar", cmd_calendar, r);
    register_command!("s", "Go to Capacity summary", cmd_capacity, r);
    register_command!("capacity", "Go to Capacity summary", cmd_capacity, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "start",
        "Set summary start month (e.g. :start 2025-01, blank = auto)",
        cmd_start,
        r
    );
    register_command!(
        "window",
        "Set summary window size (e.g. :window 12)",
        cmd_window,
        r
    );
    register_command!("next-month", "Shift summary window forward", cmd_next_month, r);
    register_command!("prev-month", "Shift summary window back", cmd_prev_month, r);
    register_command!(
        "emp",
        "Filter calendar by employee id (e.g. :emp E42, blank = everyone)",
        cmd_emp,
        r
    );
    register_command!("clear", "Clear the month selection", cmd_clear, r);
    register_command!(
        "import",
        "Import CSV (e.g. :import allocation ~/alloc.csv)",
        cmd_import,
        r
    );
    register_command!("refresh", "Reload data from the database", cmd_refresh, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_calendar(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Calendar;
    app.refresh_calendar(db)?;
    Ok(())
}

fn cmd_capacity(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Capacity;
    app.refresh_capacity(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_start(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.summary_start = None;
        app.refresh_capacity(db)?;
        app.set_status("Summary start detected from data");
        return Ok(());
    }
    match Month::parse(args) {
        Ok(m) => {
            app.summary_start = Some(m);
            app.screen = Screen::Capacity;
            app.refresh_capacity(db)?;
            app.set_status(format!("Summary starts at {}", m.label()));
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_window(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match args.parse::<usize>() {
        Ok(n) if (1..=MAX_WINDOW).contains(&n) => {
            app.window_size = n;
            app.refresh_capacity(db)?;
            app.set_status(format!("Window: {n} months"));
        }
        _ => app.set_status(format!("Usage: :window <1-{MAX_WINDOW}>")),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.shift_summary_start(db, 1)
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.shift_summary_start(db, -1)
}

fn cmd_emp(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.emp_filter = None;
        app.refresh_activities(db)?;
        app.set_status("Showing everyone");
        return Ok(());
    }
    let label = match db.get_employee_by_id(args)? {
        Some(emp) => emp.to_string(),
        None => args.to_string(),
    };
    app.emp_filter = Some(args.to_string());
    app.screen = Screen::Calendar;
    app.refresh_activities(db)?;
    app.set_status(format!("Showing activities for {label}"));
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.selection.clear();
    app.refresh_activities(db)?;
    app.set_status("Selection cleared. Press Space to pick a month");
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let usage = "Usage: :import <allocation|capacity> <file.csv>";
    let mut parts = args.splitn(2, ' ');
    let (Some(kind), Some(path)) = (parts.next(), parts.next()) else {
        app.set_status(usage);
        return Ok(());
    };
    let kind = match kind.to_ascii_lowercase().as_str() {
        "allocation" | "a" => ImportKind::Allocation,
        "capacity" | "c" => ImportKind::Capacity,
        _ => {
            app.set_status(usage);
            return Ok(());
        }
    };
    let path = expand_home(path.trim());
    match import_file(db, &path, kind) {
        Ok(count) => {
            app.refresh_all(db)?;
            app.set_status(format!("Imported {count} {kind} rows"));
        }
        Err(e) => app.set_status(format!("Import failed: {e:#}")),
    }
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.refresh_all(db)?;
    app.set_status("Reloaded");
    Ok(())
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = directories::UserDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
