use anyhow::{Context, Result};
use clap::Subcommand;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::calendar::{group_activities_by_month, recent_months, requested_months, RECENT_MONTHS};
use crate::capacity::{build_summary, CapacitySummary, MAX_WINDOW};
use crate::config::Config;
use crate::db::Database;
use crate::http;
use crate::import::{import_file, ImportKind};
use crate::models::{
    check_amount, Account, AllocationRecord, CapacityRecord, CategoryBucket, Department, Employee,
    Initiative, Month, Role,
};
use crate::ui::util::{format_amount, truncate};

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides CAPPLAN_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// List months with data in the last 12 months
    Months {
        /// Only months with allocation records (the calendar's list)
        #[arg(long)]
        calendar: bool,
    },
    /// Print the capacity summary for a window of months
    Summary {
        /// First month (YYYYMM or YYYY-MM); detected from data when omitted
        #[arg(long, value_parser = Month::parse)]
        start: Option<Month>,
        /// Number of months in the window
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW as i64))]
        months: Option<u32>,
    },
    /// Print activities grouped by month
    Activities {
        /// Months to show (YYYYMM or YYYY-MM)
        #[arg(required = true, value_parser = Month::parse)]
        months: Vec<Month>,
        /// Only this employee's activities
        #[arg(long)]
        emp: Option<String>,
    },
    /// Record an allocation
    AddAllocation {
        category: String,
        #[arg(value_parser = Month::parse)]
        date: Month,
        #[arg(allow_negative_numbers = true, value_parser = parse_amount)]
        amount: Decimal,
        #[arg(long)]
        emp: Option<String>,
        #[arg(long)]
        activity: Option<String>,
    },
    /// Record people capacity for a month
    AddCapacity {
        #[arg(value_parser = Month::parse)]
        date: Month,
        #[arg(allow_negative_numbers = true, value_parser = parse_amount)]
        amount: Decimal,
    },
    /// Import allocation or capacity records from CSV
    Import {
        #[arg(value_enum)]
        kind: ImportKind,
        path: PathBuf,
    },
    /// Add an employee, creating the department if needed
    AddEmployee {
        emp_id: String,
        name: String,
        #[arg(long)]
        department: Option<String>,
    },
    /// Link a login account to an employee
    AddAccount {
        username: String,
        emp_id: String,
        /// resource-manager, stakeholder or team-member
        #[arg(long, default_value = "team-member", value_parser = parse_role)]
        role: Role,
    },
    /// Add an initiative led by an employee (by display name)
    AddInitiative {
        name: String,
        leader: String,
        #[arg(long)]
        status: Option<String>,
    },
    /// List employees with their department
    Employees,
    /// List initiatives
    Initiatives {
        /// Only initiatives led by this account's employee
        #[arg(long)]
        mine: Option<String>,
    },
}

pub(crate) fn as_cli(command: Command, config: &Config) -> Result<()> {
    if let Command::Serve { bind } = command {
        return cli_serve(bind.unwrap_or(config.bind), config);
    }

    let mut db = Database::open(&config.db_path)?;
    let today = Month::current();
    match command {
        Command::Serve { .. } => Ok(()),
        Command::Months { calendar } => cli_months(&db, calendar, today),
        Command::Summary { start, months } => {
            let window = months.map_or(config.window_size, |n| n as usize);
            let summary = build_summary(&db, start, window, today)?;
            for line in summary_lines(&summary) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Activities { months, emp } => cli_activities(&db, &months, emp.as_deref()),
        Command::AddAllocation {
            category,
            date,
            amount,
            emp,
            activity,
        } => {
            if category.trim().is_empty() {
                anyhow::bail!("Category must not be empty");
            }
            let mut rec = AllocationRecord::new(category.trim().to_string(), date, amount)
                .with_activity(activity.unwrap_or_default());
            if let Some(emp) = emp {
                rec = rec.with_emp_id(emp);
            }
            let id = db.insert_allocation(&rec)?;
            println!("Added allocation #{id}: {} {} {}", rec.category, date.label(), amount);
            Ok(())
        }
        Command::AddCapacity { date, amount } => {
            let id = db.insert_capacity(&CapacityRecord::new(date, amount))?;
            println!("Added capacity #{id}: {} {}", date.label(), amount);
            Ok(())
        }
        Command::Import { kind, path } => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            let count = import_file(&mut db, &path, kind)?;
            println!("Imported {count} {kind} rows from {}", path.display());
            Ok(())
        }
        Command::AddEmployee {
            emp_id,
            name,
            department,
        } => cli_add_employee(&db, emp_id, name, department.as_deref()),
        Command::AddAccount {
            username,
            emp_id,
            role,
        } => {
            if db.get_employee_by_id(&emp_id)?.is_none() {
                anyhow::bail!("Employee '{emp_id}' not found");
            }
            db.insert_account(&Account::new(username.clone(), emp_id, role))
                .with_context(|| format!("Failed to add account '{username}'"))?;
            println!("Added account {username} ({role})");
            Ok(())
        }
        Command::AddInitiative {
            name,
            leader,
            status,
        } => {
            let mut init = Initiative::new(name, leader);
            if let Some(status) = status {
                init.status = status;
            }
            let id = db.insert_initiative(&init)?;
            println!("Added initiative #{id}: {} (led by {})", init.name, init.leader);
            Ok(())
        }
        Command::Employees => cli_employees(&db),
        Command::Initiatives { mine } => cli_initiatives(&db, mine.as_deref()),
    }
}

fn parse_amount(s: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(s.trim()).with_context(|| format!("Invalid amount '{s}'"))?;
    check_amount(amount)
}

fn parse_role(s: &str) -> Result<Role> {
    let wanted = s.trim().to_lowercase().replace(['_', '-'], " ");
    Role::all()
        .iter()
        .copied()
        .find(|r| r.as_str().to_lowercase() == wanted)
        .ok_or_else(|| {
            let names: Vec<&str> = Role::all().iter().map(|r| r.as_str()).collect();
            anyhow::anyhow!("Unknown role '{s}' (expected one of: {})", names.join(", "))
        })
}

fn cli_add_employee(db: &Database, emp_id: String, name: String, department: Option<&str>) -> Result<()> {
    let mut emp = Employee::new(emp_id, name);
    if let Some(dept) = department.map(str::trim).filter(|d| !d.is_empty()) {
        let id = match db.find_department(dept)? {
            Some(id) => id,
            None => db.insert_department(&Department::new(dept.to_string()))?,
        };
        emp.department_id = Some(id);
    }
    db.insert_employee(&emp)
        .with_context(|| format!("Failed to add employee '{}'", emp.emp_id))?;
    println!("Added employee {} ({emp})", emp.emp_id);
    Ok(())
}

fn cli_serve(bind: SocketAddr, config: &Config) -> Result<()> {
    let db = Database::open(&config.db_path)?;
    tracing::info!(db = %config.db_path.display(), window = config.window_size, "opened database");
    let state = http::AppState::new(db, config.window_size);
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(http::serve(state, bind))
}

fn cli_months(db: &Database, calendar: bool, today: Month) -> Result<()> {
    let stored = if calendar {
        db.get_allocation_months()?
    } else {
        db.get_all_months()?
    };
    let months = recent_months(&stored, today);
    if months.is_empty() {
        println!("No data in the last {RECENT_MONTHS} months");
        return Ok(());
    }
    for m in months {
        println!("{m}  {}", m.label());
    }
    Ok(())
}

/// Text table: one row per bucket, then totals, capacity and remaining.
pub(crate) fn summary_lines(summary: &CapacitySummary) -> Vec<String> {
    if summary.months.is_empty() {
        return vec!["Empty window".into()];
    }

    let row = |label: &str, values: &[Decimal]| -> String {
        let cells: String = values
            .iter()
            .map(|v| format!("{:>9}", format_amount(*v)))
            .collect();
        format!("{label:<22}{cells}")
    };

    let header: String = summary.labels().iter().map(|l| format!("{l:>9}")).collect();
    let mut lines = vec![format!("{:<22}{header}", ""), "─".repeat(22 + 9 * summary.months.len())];
    for bucket in CategoryBucket::SUMMARY_ORDER {
        lines.push(row(bucket.summary_label(), &summary.category_values(bucket)));
    }
    lines.push(row("Total allocated", &summary.totals()));
    lines.push(row("People capacity", &summary.people_capacity()));
    lines.push(row("Remaining", &summary.remaining()));
    lines
}

fn cli_activities(db: &Database, months: &[Month], emp: Option<&str>) -> Result<()> {
    let months = requested_months(months)?;
    let rows = db.get_activities(&months, emp)?;
    for month in group_activities_by_month(&months, &rows) {
        println!("{}", month.month.label());
        if month.groups.is_empty() {
            println!("  (no activities)");
        }
        for group in &month.groups {
            println!("  {}", group.category);
            for entry in &group.activities {
                println!("    - {}", entry.activity);
            }
        }
    }
    Ok(())
}

fn cli_employees(db: &Database) -> Result<()> {
    let employees = db.list_employees()?;
    if employees.is_empty() {
        println!("No employees");
        return Ok(());
    }

    println!("{:<10} {:<28} Department", "ID", "Name");
    println!("{}", "─".repeat(55));
    for emp in &employees {
        println!(
            "{:<10} {:<28} {}",
            truncate(&emp.emp_id, 10),
            truncate(&emp.emp_name, 28),
            emp.department.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn cli_initiatives(db: &Database, mine: Option<&str>) -> Result<()> {
    let initiatives = match mine {
        Some(username) => db.get_initiatives_led_by(username)?,
        None => db.get_initiatives()?,
    };
    if initiatives.is_empty() {
        println!("No initiatives");
        return Ok(());
    }

    println!("{:<32} {:<24} Status", "Name", "Leader");
    println!("{}", "─".repeat(66));
    for init in &initiatives {
        println!(
            "{:<32} {:<24} {}",
            truncate(&init.name, 32),
            truncate(&init.leader, 24),
            init.status
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
