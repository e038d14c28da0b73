#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn m(yyyymm: u32) -> Month {
    Month::new(yyyymm).unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_all_months().unwrap().is_empty());
    assert!(db.list_employees().unwrap().is_empty());
    assert!(db.get_initiatives().unwrap().is_empty());
}

#[test]
fn test_reopen_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capplan.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_capacity(&CapacityRecord::new(m(202501), dec!(10)))
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_all_months().unwrap(), vec![m(202501)]);
}

// ── Allocation ────────────────────────────────────────────────

#[test]
fn test_allocation_insert_and_range_query() {
    let db = Database::open_in_memory().unwrap();
    db.insert_allocation(
        &AllocationRecord::new("Baseline Work".into(), m(202501), dec!(5))
            .with_activity("Support")
            .with_emp_id("E1"),
    )
    .unwrap();
    db.insert_allocation(&AllocationRecord::new("Strategic".into(), m(202503), dec!(1.25)))
        .unwrap();
    db.insert_allocation(&AllocationRecord::new("Strategic".into(), m(202506), dec!(9)))
        .unwrap();

    let recs = db.get_allocations_between(m(202501), m(202503)).unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].category, "Baseline Work");
    assert_eq!(recs[0].activity, "Support");
    assert_eq!(recs[0].emp_id.as_deref(), Some("E1"));
    assert_eq!(recs[0].amount, dec!(5));
    assert_eq!(recs[1].amount, dec!(1.25));
    assert!(recs[1].emp_id.is_none());
}

#[test]
fn test_allocation_range_spans_year() {
    let db = Database::open_in_memory().unwrap();
    for date in [202411, 202412, 202501, 202502] {
        db.insert_allocation(&AllocationRecord::new("Baseline".into(), m(date), dec!(1)))
            .unwrap();
    }
    let recs = db.get_allocations_between(m(202412), m(202501)).unwrap();
    let dates: Vec<u32> = recs.iter().map(|r| r.date.yyyymm()).collect();
    assert_eq!(dates, vec![202412, 202501]);
}

#[test]
fn test_allocation_batch_insert() {
    let mut db = Database::open_in_memory().unwrap();
    let recs = vec![
        AllocationRecord::new("Baseline".into(), m(202501), dec!(1)),
        AllocationRecord::new("Vacation".into(), m(202502), dec!(2)),
    ];
    assert_eq!(db.insert_allocations_batch(&recs).unwrap(), 2);
    assert_eq!(
        db.get_allocation_months().unwrap(),
        vec![m(202501), m(202502)]
    );
}

#[test]
fn test_allocation_delete() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_allocation(&AllocationRecord::new("Baseline".into(), m(202501), dec!(1)))
        .unwrap();
    assert!(db.delete_allocation(id).unwrap());
    assert!(!db.delete_allocation(id).unwrap());
    assert!(db.get_allocation_months().unwrap().is_empty());
}

#[test]
fn test_allocation_months_distinct() {
    let db = Database::open_in_memory().unwrap();
    for _ in 0..3 {
        db.insert_allocation(&AllocationRecord::new("Baseline".into(), m(202501), dec!(1)))
            .unwrap();
    }
    assert_eq!(db.get_allocation_months().unwrap(), vec![m(202501)]);
}

// ── Activities ────────────────────────────────────────────────

fn seed_activities(db: &Database) {
    let rows = [
        ("Baseline", "On-call", 202501, "E1"),
        ("Strategic", "Roadmap", 202501, "E2"),
        ("Vacation", "PTO", 202502, "E1"),
        ("Baseline", "", 202502, "E1"),
        ("Baseline", "Support", 202504, "E1"),
    ];
    for (category, activity, date, emp) in rows {
        db.insert_allocation(
            &AllocationRecord::new(category.into(), m(date), dec!(1))
                .with_activity(activity)
                .with_emp_id(emp),
        )
        .unwrap();
    }
}

#[test]
fn test_activities_for_exact_months() {
    let db = Database::open_in_memory().unwrap();
    seed_activities(&db);
    let acts = db.get_activities(&[m(202501), m(202502)], None).unwrap();
    let names: Vec<&str> = acts.iter().map(|a| a.activity.as_str()).collect();
    // blank activity names are skipped, 202504 is not requested
    assert_eq!(names, vec!["On-call", "Roadmap", "PTO"]);
}

#[test]
fn test_activities_filtered_by_employee() {
    let db = Database::open_in_memory().unwrap();
    seed_activities(&db);
    let acts = db.get_activities(&[m(202501)], Some("E2")).unwrap();
    assert_eq!(acts.len(), 1);
    assert_eq!(acts[0].activity, "Roadmap");
    assert_eq!(acts[0].category, "Strategic");
}

#[test]
fn test_activities_no_months() {
    let db = Database::open_in_memory().unwrap();
    seed_activities(&db);
    assert!(db.get_activities(&[], None).unwrap().is_empty());
}

// ── Capacity ──────────────────────────────────────────────────

#[test]
fn test_capacity_insert_and_query() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_capacity(&CapacityRecord::new(m(202501), dec!(10)))
        .unwrap();
    db.insert_capacity_batch(&[
        CapacityRecord::new(m(202501), dec!(2.5)),
        CapacityRecord::new(m(202507), dec!(4)),
    ])
    .unwrap();
    let recs = db.get_capacity_between(m(202501), m(202506)).unwrap();
    assert_eq!(recs.len(), 2);
    let total: Decimal = recs.iter().map(|r| r.amount).sum();
    assert_eq!(total, dec!(12.5));
}

#[test]
fn test_all_months_is_union() {
    let db = Database::open_in_memory().unwrap();
    db.insert_allocation(&AllocationRecord::new("Baseline".into(), m(202503), dec!(1)))
        .unwrap();
    db.insert_capacity(&CapacityRecord::new(m(202501), dec!(1)))
        .unwrap();
    db.insert_capacity(&CapacityRecord::new(m(202503), dec!(1)))
        .unwrap();
    assert_eq!(db.get_all_months().unwrap(), vec![m(202501), m(202503)]);
}

// ── Directory ─────────────────────────────────────────────────

fn seed_directory(db: &Database) {
    let eng = db.insert_department(&Department::new("Engineering".into())).unwrap();
    let mut ada = Employee::new("E1".into(), "Ada Lovelace".into());
    ada.department_id = Some(eng);
    db.insert_employee(&ada).unwrap();
    db.insert_employee(&Employee::new("E2".into(), "Grace Hopper".into()))
        .unwrap();
    db.insert_account(&Account::new("ada".into(), "E1".into(), Role::ResourceManager))
        .unwrap();
    db.insert_account(&Account::new("grace".into(), "E2".into(), Role::TeamMember))
        .unwrap();
    db.insert_initiative(&Initiative::new("Data platform".into(), "Ada Lovelace".into()))
        .unwrap();
    db.insert_initiative(&Initiative::new("Billing revamp".into(), "Ada Lovelace".into()))
        .unwrap();
    db.insert_initiative(&Initiative::new("Compiler".into(), "Grace Hopper".into()))
        .unwrap();
}

#[test]
fn test_list_employees_joins_department() {
    let db = Database::open_in_memory().unwrap();
    seed_directory(&db);
    let listing = db.list_employees().unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].emp_name, "Ada Lovelace");
    assert_eq!(listing[0].department.as_deref(), Some("Engineering"));
    assert!(listing[1].department.is_none());
}

#[test]
fn test_find_department() {
    let db = Database::open_in_memory().unwrap();
    seed_directory(&db);
    assert!(db.find_department("Engineering").unwrap().is_some());
    assert!(db.find_department("Finance").unwrap().is_none());
    assert!(db.insert_department(&Department::new("Engineering".into())).is_err());
}

#[test]
fn test_account_lookup() {
    let db = Database::open_in_memory().unwrap();
    seed_directory(&db);
    let account = db.get_account_by_username("ada").unwrap().unwrap();
    assert_eq!(account.emp_id, "E1");
    assert_eq!(account.role, Role::ResourceManager);
    assert!(db.get_account_by_username("nobody").unwrap().is_none());
}

#[test]
fn test_employee_lookup() {
    let db = Database::open_in_memory().unwrap();
    seed_directory(&db);
    assert_eq!(
        db.get_employee_by_id("E2").unwrap().unwrap().emp_name,
        "Grace Hopper"
    );
    assert!(db.get_employee_by_id("E9").unwrap().is_none());
}

#[test]
fn test_initiatives_led_by_username() {
    let db = Database::open_in_memory().unwrap();
    seed_directory(&db);
    let mine = db.get_initiatives_led_by("ada").unwrap();
    let names: Vec<&str> = mine.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Billing revamp", "Data platform"]);
    assert_eq!(db.get_initiatives_led_by("grace").unwrap().len(), 1);
    assert!(db.get_initiatives_led_by("nobody").unwrap().is_empty());
}

#[test]
fn test_initiatives_led_by_matches_duplicate_names() {
    let db = Database::open_in_memory().unwrap();
    seed_directory(&db);
    // A second employee with the same display name sees the same initiatives.
    db.insert_employee(&Employee::new("E3".into(), "Ada Lovelace".into()))
        .unwrap();
    db.insert_account(&Account::new("ada2".into(), "E3".into(), Role::TeamMember))
        .unwrap();
    assert_eq!(db.get_initiatives_led_by("ada2").unwrap().len(), 2);
}
