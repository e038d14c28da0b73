#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use super::*;
use crate::models::{compute_window, Activity, Month};

fn m(yyyymm: u32) -> Month {
    Month::new(yyyymm).unwrap()
}

fn selection_of(months: &[u32]) -> MonthSelection {
    let mut sel = MonthSelection::new();
    for &yyyymm in months {
        sel.toggle(m(yyyymm));
    }
    sel
}

fn yyyymm(sel: &MonthSelection) -> Vec<u32> {
    sel.months().iter().map(|m| m.yyyymm()).collect()
}

// ── MonthSelection ────────────────────────────────────────────

#[test]
fn test_toggle_empty_starts_selection() {
    let mut sel = MonthSelection::new();
    assert_eq!(sel.toggle(m(202503)), Toggle::Started);
    assert_eq!(yyyymm(&sel), vec![202503]);
}

#[test]
fn test_toggle_sole_month_is_rejected() {
    let mut sel = selection_of(&[202503]);
    assert_eq!(sel.toggle(m(202503)), Toggle::Rejected);
    assert_eq!(yyyymm(&sel), vec![202503]);
}

#[test]
fn test_toggle_adjacent_extends_forward_and_backward() {
    let mut sel = selection_of(&[202503]);
    assert_eq!(sel.toggle(m(202504)), Toggle::Extended);
    assert_eq!(sel.toggle(m(202502)), Toggle::Extended);
    assert_eq!(yyyymm(&sel), vec![202502, 202503, 202504]);
}

#[test]
fn test_toggle_extends_across_year_boundary() {
    let mut sel = selection_of(&[202412]);
    assert_eq!(sel.toggle(m(202501)), Toggle::Extended);
    assert_eq!(yyyymm(&sel), vec![202412, 202501]);
}

#[test]
fn test_toggle_non_adjacent_resets() {
    let mut sel = selection_of(&[202503]);
    assert_eq!(sel.toggle(m(202505)), Toggle::Reset);
    assert_eq!(yyyymm(&sel), vec![202505]);
}

#[test]
fn test_toggle_two_away_from_edge_resets() {
    let mut sel = selection_of(&[202503, 202504]);
    assert_eq!(sel.toggle(m(202501)), Toggle::Reset);
    assert_eq!(yyyymm(&sel), vec![202501]);
}

#[test]
fn test_toggle_fourth_adjacent_month_resets() {
    let mut sel = selection_of(&[202503, 202504, 202505]);
    assert_eq!(sel.len(), 3);
    assert_eq!(sel.toggle(m(202506)), Toggle::Reset);
    assert_eq!(yyyymm(&sel), vec![202506]);

    let mut sel = selection_of(&[202503, 202504, 202505]);
    assert_eq!(sel.toggle(m(202502)), Toggle::Reset);
    assert_eq!(yyyymm(&sel), vec![202502]);
}

#[test]
fn test_toggle_first_shifts_window_forward() {
    let mut sel = selection_of(&[202503, 202504, 202505]);
    assert_eq!(sel.toggle(m(202503)), Toggle::Shrunk);
    assert_eq!(yyyymm(&sel), vec![202504, 202505]);
}

#[test]
fn test_toggle_last_shrinks_window() {
    let mut sel = selection_of(&[202503, 202504, 202505]);
    assert_eq!(sel.toggle(m(202505)), Toggle::Shrunk);
    assert_eq!(yyyymm(&sel), vec![202503, 202504]);
}

#[test]
fn test_toggle_middle_is_rejected() {
    let mut sel = selection_of(&[202503, 202504, 202505]);
    let before = sel.clone();
    assert_eq!(sel.toggle(m(202504)), Toggle::Rejected);
    assert_eq!(sel, before);
}

#[test]
fn test_toggle_changed_flag() {
    assert!(Toggle::Started.changed());
    assert!(Toggle::Reset.changed());
    assert!(!Toggle::Rejected.changed());
}

#[test]
fn test_clear_empties_selection() {
    let mut sel = selection_of(&[202503, 202504]);
    sel.clear();
    assert!(sel.is_empty());
    assert_eq!(sel.toggle(m(202510)), Toggle::Started);
}

proptest! {
    #[test]
    fn selection_stays_contiguous(clicks in prop::collection::vec((2023u32..2027, 1u32..=12), 1..80)) {
        let mut sel = MonthSelection::new();
        for (year, month) in clicks {
            let before = sel.clone();
            let was_sole = sel.len() == 1;
            let clicked = Month::from_parts(year, month).unwrap();
            let outcome = sel.toggle(clicked);

            prop_assert!(!sel.is_empty());
            prop_assert!(sel.len() <= MAX_SELECTION);
            for pair in sel.months().windows(2) {
                prop_assert_eq!(pair[0].index() + 1, pair[1].index());
            }
            if outcome == Toggle::Rejected {
                prop_assert_eq!(&sel, &before);
            }
            if was_sole && before.contains(clicked) {
                prop_assert_eq!(outcome, Toggle::Rejected);
            }
        }
    }
}

// ── Activities by month ───────────────────────────────────────

fn act(date: u32, activity: &str, category: &str) -> Activity {
    Activity {
        date: m(date),
        activity: activity.into(),
        category: category.into(),
    }
}

#[test]
fn test_group_dedupes_per_month() {
    let rows = vec![
        act(202501, "Support", "Baseline Work"),
        act(202501, "Support", "Baseline Work"),
        act(202502, "Support", "Baseline Work"),
    ];
    let grouped = group_activities_by_month(&[m(202501), m(202502)], &rows);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].activities.len(), 1);
    assert_eq!(grouped[1].activities.len(), 1);
}

#[test]
fn test_group_same_activity_different_category_kept() {
    let rows = vec![
        act(202501, "Migration", "Strategic"),
        act(202501, "Migration", "Discretionary Project"),
    ];
    let grouped = group_activities_by_month(&[m(202501)], &rows);
    assert_eq!(grouped[0].activities.len(), 2);
    assert_eq!(grouped[0].groups.len(), 2);
}

#[test]
fn test_group_fixed_order_and_omits_empty() {
    let rows = vec![
        act(202501, "PTO", "Vacation"),
        act(202501, "Roadmap", "Strategic"),
        act(202501, "On-call", "Baseline"),
    ];
    let grouped = group_activities_by_month(&[m(202501)], &rows);
    let labels: Vec<&str> = grouped[0].groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(labels, vec!["Baseline", "Strategic", "Vacation"]);
    let flat: Vec<&str> = grouped[0]
        .activities
        .iter()
        .map(|a| a.activity.as_str())
        .collect();
    assert_eq!(flat, vec!["On-call", "Roadmap", "PTO"]);
}

#[test]
fn test_group_unknown_category_preserved() {
    let rows = vec![
        act(202501, "Course", "Training"),
        act(202501, "On-call", "Baseline"),
    ];
    let grouped = group_activities_by_month(&[m(202501)], &rows);
    let labels: Vec<&str> = grouped[0].groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(labels, vec!["Baseline", "Training"]);
    assert_eq!(grouped[0].groups[1].activities[0].category, "Training");
}

#[test]
fn test_group_empty_month_present() {
    let rows = vec![act(202501, "On-call", "Baseline")];
    let grouped = group_activities_by_month(&[m(202502), m(202501)], &rows);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0].month, m(202501));
    assert_eq!(grouped[1].month, m(202502));
    assert!(grouped[1].activities.is_empty());
    assert!(grouped[1].groups.is_empty());
}

#[test]
fn test_group_ignores_unrequested_months_and_blank_names() {
    let rows = vec![
        act(202503, "Elsewhere", "Baseline"),
        act(202501, "  ", "Baseline"),
    ];
    let grouped = group_activities_by_month(&[m(202501)], &rows);
    assert_eq!(grouped.len(), 1);
    assert!(grouped[0].activities.is_empty());
}

// ── Recent months ─────────────────────────────────────────────

#[test]
fn test_recent_months_trailing_window() {
    let stored = vec![
        m(202601),
        m(202410),
        m(202411),
        m(202505),
        m(202505),
        m(202510),
    ];
    // Window for Oct-25 is Nov-24 ..= Oct-25
    assert_eq!(
        recent_months(&stored, m(202510)),
        vec![m(202411), m(202505), m(202510)]
    );
}

#[test]
fn test_recent_months_empty() {
    assert!(recent_months(&[], m(202510)).is_empty());
    assert_eq!(RECENT_MONTHS, 12);
}

#[test]
fn test_requested_months_sorted_and_deduped() {
    let asked = vec![m(202503), m(202501), m(202503), m(202502), m(202501)];
    assert_eq!(
        requested_months(&asked).unwrap(),
        vec![m(202501), m(202502), m(202503)]
    );
}

#[test]
fn test_requested_months_bounded() {
    let twelve = compute_window(m(202401), RECENT_MONTHS);
    assert_eq!(requested_months(&twelve).unwrap().len(), RECENT_MONTHS);

    let mut repeated = twelve.clone();
    repeated.extend(twelve.iter().copied());
    assert_eq!(requested_months(&repeated).unwrap().len(), RECENT_MONTHS);

    let thirteen = compute_window(m(202401), RECENT_MONTHS + 1);
    assert!(requested_months(&thirteen).is_err());
}
