use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::db::Database;
use crate::models::{check_amount, AllocationRecord, CapacityRecord, Month};

/// Which collection a CSV file feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ImportKind {
    /// `category,date,amount[,emp_id[,activity]]`
    Allocation,
    /// `date,amount`
    Capacity,
}

impl ImportKind {
    fn date_column(self) -> usize {
        match self {
            Self::Allocation => 1,
            Self::Capacity => 0,
        }
    }
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allocation => write!(f, "allocation"),
            Self::Capacity => write!(f, "capacity"),
        }
    }
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    /// Read all data rows. A leading row whose date column is not a month is
    /// treated as a header and dropped.
    pub(crate) fn read_rows(path: &Path, kind: ImportKind) -> Result<Vec<Vec<String>>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .context("Failed to open CSV file")?;

        let mut all_rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            all_rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if all_rows.is_empty() {
            anyhow::bail!("CSV file is empty");
        }

        let looks_like_header = all_rows[0]
            .get(kind.date_column())
            .map_or(true, |field| parse_month(field).is_err());
        if looks_like_header {
            all_rows.remove(0);
        }
        Ok(all_rows)
    }

    pub(crate) fn parse_allocations(rows: &[Vec<String>]) -> Result<Vec<AllocationRecord>> {
        let mut records = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let date_str = field(row, 1);
            if date_str.is_empty() {
                continue;
            }
            let date = parse_month(&date_str)
                .with_context(|| format!("Row {}: failed to parse month '{}'", i + 1, date_str))?;
            let category = field(row, 0);
            if category.is_empty() {
                anyhow::bail!("Row {}: category is empty", i + 1);
            }
            let amount = parse_decimal(&field(row, 2))
                .with_context(|| format!("Row {}: failed to parse amount", i + 1))?;

            let mut rec = AllocationRecord::new(category, date, amount);
            let emp_id = field(row, 3);
            if !emp_id.is_empty() {
                rec.emp_id = Some(emp_id);
            }
            rec.activity = field(row, 4);
            records.push(rec);
        }
        Ok(records)
    }

    pub(crate) fn parse_capacity(rows: &[Vec<String>]) -> Result<Vec<CapacityRecord>> {
        let mut records = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let date_str = field(row, 0);
            if date_str.is_empty() {
                continue;
            }
            let date = parse_month(&date_str)
                .with_context(|| format!("Row {}: failed to parse month '{}'", i + 1, date_str))?;
            let amount = parse_decimal(&field(row, 1))
                .with_context(|| format!("Row {}: failed to parse amount", i + 1))?;
            records.push(CapacityRecord::new(date, amount));
        }
        Ok(records)
    }
}

/// Parse and insert a whole file in one transaction. Returns the row count.
pub(crate) fn import_file(db: &mut Database, path: &Path, kind: ImportKind) -> Result<usize> {
    let rows = CsvImporter::read_rows(path, kind)?;
    let count = match kind {
        ImportKind::Allocation => {
            let recs = CsvImporter::parse_allocations(&rows)?;
            db.insert_allocations_batch(&recs)?
        }
        ImportKind::Capacity => {
            let recs = CsvImporter::parse_capacity(&rows)?;
            db.insert_capacity_batch(&recs)?
        }
    };
    tracing::info!(%kind, count, path = %path.display(), "imported CSV");
    Ok(count)
}

fn field(row: &[String], idx: usize) -> String {
    row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
}

fn parse_month(s: &str) -> Result<Month> {
    if let Ok(m) = Month::parse(s) {
        return Ok(m);
    }
    for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s.trim(), fmt) {
            if let Some(m) = Month::from_parts(d.year().max(0) as u32, d.month()) {
                return Ok(m);
            }
        }
    }
    anyhow::bail!("Could not parse month: {}", s)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s.replace(',', "").replace('"', "").trim().to_string();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount = Decimal::from_str(&cleaned).context(format!("Failed to parse '{}' as decimal", s))?;
    check_amount(amount)
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
