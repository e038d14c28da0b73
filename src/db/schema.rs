pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS departments (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS employees (
    emp_id         TEXT PRIMARY KEY,
    emp_name       TEXT NOT NULL,
    department_id  INTEGER REFERENCES departments(id)
);

CREATE TABLE IF NOT EXISTS accounts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    emp_id      TEXT NOT NULL REFERENCES employees(emp_id),
    role        TEXT NOT NULL DEFAULT 'Team Member',
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS initiatives (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL,
    leader  TEXT NOT NULL DEFAULT '',
    status  TEXT NOT NULL DEFAULT 'Active'
);

CREATE TABLE IF NOT EXISTS allocation (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    category  TEXT NOT NULL,
    activity  TEXT NOT NULL DEFAULT '',
    date      INTEGER NOT NULL,
    amount    TEXT NOT NULL,
    emp_id    TEXT
);

CREATE INDEX IF NOT EXISTS idx_allocation_date ON allocation(date);
CREATE INDEX IF NOT EXISTS idx_allocation_emp ON allocation(emp_id);

CREATE TABLE IF NOT EXISTS capacity (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    date    INTEGER NOT NULL,
    amount  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_capacity_date ON capacity(date);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
