#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::*;
use super::commands::handle_command;
use crate::calendar::Toggle;
use crate::db::Database;
use crate::models::{AllocationRecord, CapacityRecord, Month};

fn m(yyyymm: u32) -> Month {
    Month::new(yyyymm).unwrap()
}

fn seeded() -> Database {
    let db = Database::open_in_memory().unwrap();
    for (date, activity, emp) in [
        (202501, "On-call", "E1"),
        (202502, "Support", "E1"),
        (202503, "Roadmap", "E2"),
        (202504, "Hackday", "E2"),
    ] {
        db.insert_allocation(
            &AllocationRecord::new("Baseline".into(), m(date), dec!(1))
                .with_activity(activity)
                .with_emp_id(emp),
        )
        .unwrap();
    }
    db.insert_capacity(&CapacityRecord::new(m(202504), dec!(3)))
        .unwrap();
    db
}

fn app_with(db: &Database) -> App {
    let mut app = App::new(m(202505), 3);
    app.refresh_all(db).unwrap();
    app
}

// ── Calendar ──────────────────────────────────────────────────

#[test]
fn test_refresh_selects_latest_month() {
    let db = seeded();
    let app = app_with(&db);
    assert_eq!(app.calendar_months.len(), 4);
    assert_eq!(app.selection.months(), &[m(202504)]);
    assert_eq!(app.cursor_month(), Some(m(202504)));
    assert_eq!(app.activities.len(), 1);
    assert_eq!(app.activities[0].activities[0].activity, "Hackday");
}

#[test]
fn test_toggle_extends_and_reloads_activities() {
    let db = seeded();
    let mut app = app_with(&db);
    app.move_cursor(-1);
    assert_eq!(app.toggle_cursor_month(&db).unwrap(), Some(Toggle::Extended));
    assert_eq!(app.selection.months(), &[m(202503), m(202504)]);
    assert_eq!(app.activities.len(), 2);
    assert_eq!(app.selection_label(), "Mar-25 – Apr-25");
}

#[test]
fn test_rejected_toggle_shakes_then_settles() {
    let db = seeded();
    let mut app = app_with(&db);
    assert_eq!(app.toggle_cursor_month(&db).unwrap(), Some(Toggle::Rejected));
    assert_eq!(app.shake_ticks, SHAKE_TICKS);
    assert_eq!(app.selection.months(), &[m(202504)]);

    let mut offsets = Vec::new();
    for _ in 0..SHAKE_TICKS {
        app.tick();
        offsets.push(app.shake_offset());
    }
    assert!(offsets.contains(&2));
    assert_eq!(app.shake_ticks, 0);
    assert_eq!(app.shake_offset(), 0);
}

#[test]
fn test_cursor_clamped() {
    let db = seeded();
    let mut app = app_with(&db);
    app.move_cursor(10);
    assert_eq!(app.month_cursor, 3);
    app.move_cursor(-10);
    assert_eq!(app.month_cursor, 0);
}

#[test]
fn test_emp_and_clear_commands() {
    let mut db = seeded();
    let mut app = app_with(&db);
    handle_command("emp E1", &mut app, &mut db).unwrap();
    assert_eq!(app.emp_filter.as_deref(), Some("E1"));
    assert!(app.activities[0].activities.is_empty());

    handle_command("emp", &mut app, &mut db).unwrap();
    assert!(app.emp_filter.is_none());

    handle_command("clear", &mut app, &mut db).unwrap();
    assert!(app.selection.is_empty());
    assert!(app.activities.is_empty());
    assert_eq!(app.activity_line_count(), 0);
}

// ── Capacity ──────────────────────────────────────────────────

#[test]
fn test_capacity_pins_detected_start_and_shifts() {
    let mut db = seeded();
    let mut app = app_with(&db);
    assert_eq!(app.summary_start, Some(m(202504)));
    assert_eq!(app.summary.months.len(), 3);
    assert_eq!(app.summary.months[0].remaining, dec!(2));

    handle_command("prev-month", &mut app, &mut db).unwrap();
    assert_eq!(app.summary.first_month(), Some(m(202503)));
    handle_command("next-month", &mut app, &mut db).unwrap();
    handle_command("next-month", &mut app, &mut db).unwrap();
    assert_eq!(app.summary.first_month(), Some(m(202505)));
}

#[test]
fn test_start_and_window_commands() {
    let mut db = seeded();
    let mut app = app_with(&db);
    handle_command("start 2024-12", &mut app, &mut db).unwrap();
    assert_eq!(app.summary.labels(), vec!["Dec-24", "Jan-25", "Feb-25"]);

    handle_command("window 5", &mut app, &mut db).unwrap();
    assert_eq!(app.summary.months.len(), 5);

    handle_command("window 0", &mut app, &mut db).unwrap();
    assert_eq!(app.window_size, 5);
    assert!(app.status_message.starts_with("Usage"));

    handle_command("start 2024-13", &mut app, &mut db).unwrap();
    assert_eq!(app.summary.first_month(), Some(m(202412)));
}

#[test]
fn test_unknown_command_suggests() {
    let mut db = seeded();
    let mut app = app_with(&db);
    handle_command("calender", &mut app, &mut db).unwrap();
    assert!(app.status_message.contains(":calendar"));
}

#[test]
fn test_quit_command() {
    let mut db = seeded();
    let mut app = app_with(&db);
    handle_command("q", &mut app, &mut db).unwrap();
    assert!(!app.running);
}
