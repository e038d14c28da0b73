use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::models::{compute_window, AllocationRecord, CapacityRecord, CategoryBucket, Month};

/// Window length used when the caller does not ask for one.
pub(crate) const DEFAULT_WINDOW: usize = 6;

/// Largest window accepted from callers.
pub(crate) const MAX_WINDOW: usize = 120;

/// Allocation summed into the four fixed buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CategoryTotals {
    pub(crate) vacation: Decimal,
    pub(crate) baseline: Decimal,
    pub(crate) strategic: Decimal,
    pub(crate) discretionary: Decimal,
}

impl CategoryTotals {
    pub(crate) fn add(&mut self, bucket: CategoryBucket, amount: Decimal) -> Result<()> {
        let slot = match bucket {
            CategoryBucket::Vacation => &mut self.vacation,
            CategoryBucket::Baseline => &mut self.baseline,
            CategoryBucket::Strategic => &mut self.strategic,
            CategoryBucket::Discretionary => &mut self.discretionary,
        };
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("{bucket} allocation total overflows"))?;
        Ok(())
    }

    pub(crate) fn get(&self, bucket: CategoryBucket) -> Decimal {
        match bucket {
            CategoryBucket::Vacation => self.vacation,
            CategoryBucket::Baseline => self.baseline,
            CategoryBucket::Strategic => self.strategic,
            CategoryBucket::Discretionary => self.discretionary,
        }
    }

    /// Sum of the four buckets, `None` on overflow.
    pub(crate) fn total(&self) -> Option<Decimal> {
        [self.vacation, self.baseline, self.strategic, self.discretionary]
            .into_iter()
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthCapacity {
    pub(crate) month: Month,
    pub(crate) categories: CategoryTotals,
    pub(crate) total_allocated: Decimal,
    pub(crate) people_capacity: Decimal,
    /// `people_capacity - total_allocated`; negative means over-allocated.
    pub(crate) remaining: Decimal,
}

/// Per-month capacity figures for a window, in window order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CapacitySummary {
    pub(crate) months: Vec<MonthCapacity>,
}

impl CapacitySummary {
    pub(crate) fn labels(&self) -> Vec<String> {
        self.months.iter().map(|m| m.month.label()).collect()
    }

    pub(crate) fn category_values(&self, bucket: CategoryBucket) -> Vec<Decimal> {
        self.months.iter().map(|m| m.categories.get(bucket)).collect()
    }

    pub(crate) fn totals(&self) -> Vec<Decimal> {
        self.months.iter().map(|m| m.total_allocated).collect()
    }

    pub(crate) fn people_capacity(&self) -> Vec<Decimal> {
        self.months.iter().map(|m| m.people_capacity).collect()
    }

    pub(crate) fn remaining(&self) -> Vec<Decimal> {
        self.months.iter().map(|m| m.remaining).collect()
    }

    pub(crate) fn first_month(&self) -> Option<Month> {
        self.months.first().map(|m| m.month)
    }
}

/// Largest stored month not after `today`, or `today` itself when there is none.
pub(crate) fn detect_start(stored: &[Month], today: Month) -> Month {
    stored
        .iter()
        .copied()
        .filter(|m| *m <= today)
        .max()
        .unwrap_or(today)
}

/// Fold records into one entry per window month. Months without records
/// come out zero-filled. Fails when a month's sums overflow `Decimal`.
pub(crate) fn summarize(
    window: &[Month],
    allocations: &[AllocationRecord],
    capacity: &[CapacityRecord],
) -> Result<CapacitySummary> {
    let months = window
        .iter()
        .map(|&month| summarize_month(month, allocations, capacity))
        .collect::<Result<Vec<_>>>()?;
    Ok(CapacitySummary { months })
}

fn summarize_month(
    month: Month,
    allocations: &[AllocationRecord],
    capacity: &[CapacityRecord],
) -> Result<MonthCapacity> {
    let mut categories = CategoryTotals::default();
    for rec in allocations.iter().filter(|r| r.date == month) {
        match CategoryBucket::classify(&rec.category) {
            Some(bucket) => categories
                .add(bucket, rec.amount)
                .with_context(|| format!("Allocation for {month} out of range"))?,
            None => tracing::debug!(
                category = %rec.category,
                month = %month,
                "allocation category matches no bucket"
            ),
        }
    }
    let people_capacity = capacity
        .iter()
        .filter(|r| r.date == month)
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.amount))
        .with_context(|| format!("People capacity for {month} out of range"))?;
    let total_allocated = categories
        .total()
        .with_context(|| format!("Total allocation for {month} out of range"))?;
    let remaining = people_capacity
        .checked_sub(total_allocated)
        .with_context(|| format!("Remaining capacity for {month} out of range"))?;

    Ok(MonthCapacity {
        month,
        categories,
        total_allocated,
        people_capacity,
        remaining,
    })
}

/// Load the records for a window and summarise them. When `start` is `None`
/// the start month is detected from the stored data relative to `today`.
pub(crate) fn build_summary(
    db: &Database,
    start: Option<Month>,
    window_size: usize,
    today: Month,
) -> Result<CapacitySummary> {
    let start = match start {
        Some(s) => s,
        None => detect_start(&db.get_all_months()?, today),
    };
    let window = compute_window(start, window_size);
    let (Some(&from), Some(&to)) = (window.first(), window.last()) else {
        return Ok(CapacitySummary { months: Vec::new() });
    };

    let allocations = db.get_allocations_between(from, to)?;
    let capacity = db.get_capacity_between(from, to)?;
    tracing::debug!(
        start = %from,
        months = window.len(),
        allocations = allocations.len(),
        capacity = capacity.len(),
        "building capacity summary"
    );
    summarize(&window, &allocations, &capacity)
}
