mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

fn month_at(row: &Row, idx: usize) -> rusqlite::Result<Month> {
    let raw: u32 = row.get(idx)?;
    Month::new(raw).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, raw as i64))
}

fn decimal_at(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Ok(Decimal::from_str(&text).unwrap_or_default())
}

fn allocation_from_row(row: &Row) -> rusqlite::Result<AllocationRecord> {
    Ok(AllocationRecord {
        id: Some(row.get(0)?),
        category: row.get(1)?,
        activity: row.get(2)?,
        date: month_at(row, 3)?,
        amount: decimal_at(row, 4)?,
        emp_id: row.get(5)?,
    })
}

fn initiative_from_row(row: &Row) -> rusqlite::Result<Initiative> {
    Ok(Initiative {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        leader: row.get(2)?,
        status: row.get(3)?,
    })
}

fn collect_months(stmt: &mut rusqlite::Statement<'_>) -> Result<Vec<Month>> {
    let rows = stmt.query_map([], |row| month_at(row, 0))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(version = schema::CURRENT_VERSION, "initialized database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(
                from = current,
                to = schema::CURRENT_VERSION,
                "migrated database schema"
            );
        }

        Ok(())
    }

    // ── Allocation ────────────────────────────────────────────

    pub(crate) fn insert_allocation(&self, rec: &AllocationRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO allocation (category, activity, date, amount, emp_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                rec.category,
                rec.activity,
                rec.date.yyyymm(),
                rec.amount.to_string(),
                rec.emp_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn insert_allocations_batch(&mut self, recs: &[AllocationRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for rec in recs {
            tx.execute(
                "INSERT INTO allocation (category, activity, date, amount, emp_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    rec.category,
                    rec.activity,
                    rec.date.yyyymm(),
                    rec.amount.to_string(),
                    rec.emp_id,
                ],
            )?;
        }
        tx.commit()?;
        Ok(recs.len())
    }

    /// Returns `false` when no row had that id.
    pub(crate) fn delete_allocation(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM allocation WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub(crate) fn get_allocations_between(&self, from: Month, to: Month) -> Result<Vec<AllocationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, activity, date, amount, emp_id FROM allocation
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![from.yyyymm(), to.yyyymm()], allocation_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_allocation_months(&self) -> Result<Vec<Month>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT date FROM allocation ORDER BY date")?;
        collect_months(&mut stmt)
    }

    /// Activity rows for exactly the given months, optionally for one employee.
    pub(crate) fn get_activities(&self, months: &[Month], emp_id: Option<&str>) -> Result<Vec<Activity>> {
        if months.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: String = (0..months.len())
            .map(|i| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(",");
        let mut sql = format!(
            "SELECT date, activity, category FROM allocation
             WHERE date IN ({placeholders}) AND activity != ''"
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = months
            .iter()
            .map(|m| Box::new(m.yyyymm()) as Box<dyn rusqlite::types::ToSql>)
            .collect();
        if let Some(emp) = emp_id {
            sql.push_str(&format!(" AND emp_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(emp.to_string()));
        }
        sql.push_str(" ORDER BY date, id");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            Ok(Activity {
                date: month_at(row, 0)?,
                activity: row.get(1)?,
                category: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Capacity ──────────────────────────────────────────────

    pub(crate) fn insert_capacity(&self, rec: &CapacityRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO capacity (date, amount) VALUES (?1, ?2)",
            params![rec.date.yyyymm(), rec.amount.to_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn insert_capacity_batch(&mut self, recs: &[CapacityRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for rec in recs {
            tx.execute(
                "INSERT INTO capacity (date, amount) VALUES (?1, ?2)",
                params![rec.date.yyyymm(), rec.amount.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(recs.len())
    }

    pub(crate) fn get_capacity_between(&self, from: Month, to: Month) -> Result<Vec<CapacityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, amount FROM capacity
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![from.yyyymm(), to.yyyymm()], |row| {
            Ok(CapacityRecord {
                id: Some(row.get(0)?),
                date: month_at(row, 1)?,
                amount: decimal_at(row, 2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Distinct months present in either allocation or capacity, ascending.
    pub(crate) fn get_all_months(&self) -> Result<Vec<Month>> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM allocation
             UNION
             SELECT date FROM capacity
             ORDER BY date",
        )?;
        collect_months(&mut stmt)
    }

    // ── Directory ─────────────────────────────────────────────

    pub(crate) fn insert_department(&self, dept: &Department) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO departments (name) VALUES (?1)",
            params![dept.name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn find_department(&self, name: &str) -> Result<Option<i64>> {
        let result = self.conn.query_row(
            "SELECT id FROM departments WHERE name = ?1",
            params![name],
            |row| row.get(0),
        );
        match result {
            Ok(id) => Ok(Some(id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn insert_employee(&self, emp: &Employee) -> Result<()> {
        self.conn.execute(
            "INSERT INTO employees (emp_id, emp_name, department_id) VALUES (?1, ?2, ?3)",
            params![emp.emp_id, emp.emp_name, emp.department_id],
        )?;
        Ok(())
    }

    pub(crate) fn get_employee_by_id(&self, emp_id: &str) -> Result<Option<Employee>> {
        let result = self.conn.query_row(
            "SELECT emp_id, emp_name, department_id FROM employees WHERE emp_id = ?1",
            params![emp_id],
            |row| {
                Ok(Employee {
                    emp_id: row.get(0)?,
                    emp_name: row.get(1)?,
                    department_id: row.get(2)?,
                })
            },
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Every employee with its department name, ordered by name.
    pub(crate) fn list_employees(&self) -> Result<Vec<EmployeeListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.emp_id, e.emp_name, d.name
             FROM employees e
             LEFT JOIN departments d ON e.department_id = d.id
             ORDER BY e.emp_name, e.emp_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EmployeeListing {
                emp_id: row.get(0)?,
                emp_name: row.get(1)?,
                department: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn insert_account(&self, account: &Account) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO accounts (username, emp_id, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                account.username,
                account.emp_id,
                account.role.as_str(),
                account.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        let result = self.conn.query_row(
            "SELECT id, username, emp_id, role, created_at FROM accounts WHERE username = ?1",
            params![username],
            |row| {
                Ok(Account {
                    id: Some(row.get(0)?),
                    username: row.get(1)?,
                    emp_id: row.get(2)?,
                    role: Role::parse(&row.get::<_, String>(3)?),
                    created_at: row.get(4)?,
                })
            },
        );
        match result {
            Ok(a) => Ok(Some(a)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn insert_initiative(&self, init: &Initiative) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO initiatives (name, leader, status) VALUES (?1, ?2, ?3)",
            params![init.name, init.leader, init.status],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_initiatives(&self) -> Result<Vec<Initiative>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, leader, status FROM initiatives ORDER BY name")?;
        let rows = stmt.query_map([], initiative_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Initiatives whose leader name equals the name of the employee linked
    /// to `username`. Exact string match, so employees sharing a name also
    /// share initiatives.
    pub(crate) fn get_initiatives_led_by(&self, username: &str) -> Result<Vec<Initiative>> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.name, i.leader, i.status
             FROM accounts a
             JOIN employees e ON e.emp_id = a.emp_id
             JOIN initiatives i ON i.leader = e.emp_name
             WHERE a.username = ?1
             ORDER BY i.name",
        )?;
        let rows = stmt.query_map(params![username], initiative_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests;
