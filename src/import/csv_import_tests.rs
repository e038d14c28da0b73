#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;

fn make_csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn m(yyyymm: u32) -> Month {
    Month::new(yyyymm).unwrap()
}

// ── parse_decimal ─────────────────────────────────────────────

#[test]
fn test_parse_decimal_basic() {
    assert_eq!(parse_decimal("2.5").unwrap(), dec!(2.5));
    assert_eq!(parse_decimal("-1").unwrap(), dec!(-1));
    assert_eq!(parse_decimal("1,250.75").unwrap(), dec!(1250.75));
}

#[test]
fn test_parse_decimal_empty_is_zero() {
    assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
    assert_eq!(parse_decimal("  ").unwrap(), Decimal::ZERO);
}

#[test]
fn test_parse_decimal_invalid() {
    assert!(parse_decimal("three").is_err());
}

#[test]
fn test_parse_decimal_rejects_out_of_range() {
    assert_eq!(parse_decimal("1000000000000").unwrap(), dec!(1000000000000));
    assert!(parse_decimal("1000000000001").is_err());
    assert!(parse_decimal("-50000000000000000000000000000").is_err());
}

// ── parse_month ───────────────────────────────────────────────

#[test]
fn test_parse_month_formats() {
    assert_eq!(parse_month("202501").unwrap(), m(202501));
    assert_eq!(parse_month("2025-01").unwrap(), m(202501));
    assert_eq!(parse_month("2025-01-15").unwrap(), m(202501));
    assert_eq!(parse_month("03/31/2025").unwrap(), m(202503));
}

#[test]
fn test_parse_month_invalid() {
    assert!(parse_month("month").is_err());
    assert!(parse_month("2025-13").is_err());
}

// ── read_rows ─────────────────────────────────────────────────

#[test]
fn test_read_rows_drops_header() {
    let file = make_csv_file("category,date,amount\nBaseline,202501,2\n");
    let rows = CsvImporter::read_rows(file.path(), ImportKind::Allocation).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "Baseline");
}

#[test]
fn test_read_rows_without_header() {
    let file = make_csv_file("202501,10\n202502,12\n");
    let rows = CsvImporter::read_rows(file.path(), ImportKind::Capacity).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_read_rows_empty_file() {
    let file = make_csv_file("");
    assert!(CsvImporter::read_rows(file.path(), ImportKind::Capacity).is_err());
}

// ── parse_allocations / parse_capacity ────────────────────────

#[test]
fn test_parse_allocations_optional_columns() {
    let rows = vec![
        vec!["Baseline Work".into(), "202501".into(), "5".into()],
        vec![
            "Strategic".into(),
            "2025-02".into(),
            "1.5".into(),
            "E7".into(),
            "Roadmap".into(),
        ],
    ];
    let recs = CsvImporter::parse_allocations(&rows).unwrap();
    assert_eq!(recs.len(), 2);
    assert!(recs[0].emp_id.is_none());
    assert!(recs[0].activity.is_empty());
    assert_eq!(recs[1].date, m(202502));
    assert_eq!(recs[1].amount, dec!(1.5));
    assert_eq!(recs[1].emp_id.as_deref(), Some("E7"));
    assert_eq!(recs[1].activity, "Roadmap");
}

#[test]
fn test_parse_allocations_skips_blank_date() {
    let rows = vec![
        vec!["Baseline".into(), "".into(), "5".into()],
        vec!["Baseline".into(), "202501".into(), "5".into()],
    ];
    assert_eq!(CsvImporter::parse_allocations(&rows).unwrap().len(), 1);
}

#[test]
fn test_parse_allocations_reports_row() {
    let rows = vec![
        vec!["Baseline".into(), "202501".into(), "5".into()],
        vec!["Baseline".into(), "2025-99".into(), "5".into()],
    ];
    let err = CsvImporter::parse_allocations(&rows).unwrap_err();
    assert!(format!("{err:#}").contains("Row 2"));
}

#[test]
fn test_parse_allocations_requires_category() {
    let rows = vec![vec!["".into(), "202501".into(), "5".into()]];
    assert!(CsvImporter::parse_allocations(&rows).is_err());
}

#[test]
fn test_parse_capacity() {
    let rows = vec![
        vec!["202501".into(), "10".into()],
        vec!["2025-02".into(), "12.5".into()],
    ];
    let recs = CsvImporter::parse_capacity(&rows).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[1].amount, dec!(12.5));
}

#[test]
fn test_parse_capacity_bad_amount() {
    let rows = vec![vec!["202501".into(), "lots".into()]];
    assert!(CsvImporter::parse_capacity(&rows).is_err());
}

// ── import_file ───────────────────────────────────────────────

#[test]
fn test_import_file_allocation_end_to_end() {
    let mut db = Database::open_in_memory().unwrap();
    let file = make_csv_file(
        "category,date,amount,emp_id,activity\n\
         Baseline Work,202501,5,E1,Support\n\
         Vacation Days,202501,2,E1,PTO\n",
    );
    let count = import_file(&mut db, file.path(), ImportKind::Allocation).unwrap();
    assert_eq!(count, 2);
    let recs = db.get_allocations_between(m(202501), m(202501)).unwrap();
    assert_eq!(recs.len(), 2);
}

#[test]
fn test_import_file_capacity_end_to_end() {
    let mut db = Database::open_in_memory().unwrap();
    let file = make_csv_file("date,amount\n202501,10\n202502,8\n");
    let count = import_file(&mut db, file.path(), ImportKind::Capacity).unwrap();
    assert_eq!(count, 2);
    assert_eq!(db.get_all_months().unwrap(), vec![m(202501), m(202502)]);
}

#[test]
fn test_import_file_bad_row_inserts_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    let file = make_csv_file("202501,10\n202502,oops\n");
    assert!(import_file(&mut db, file.path(), ImportKind::Capacity).is_err());
    assert!(db.get_all_months().unwrap().is_empty());
}
