use anyhow::Result;
use rust_decimal::Decimal;

use super::Month;

/// Largest magnitude accepted for one allocation or capacity amount.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Reject amounts outside `±MAX_AMOUNT` so window sums stay representable.
pub fn check_amount(amount: Decimal) -> Result<Decimal> {
    if amount.abs() > Decimal::from(MAX_AMOUNT) {
        anyhow::bail!("amount {amount} is out of range (limit is ±{MAX_AMOUNT})");
    }
    Ok(amount)
}

/// Time committed against a category in a given month.
#[derive(Debug, Clone)]
pub struct AllocationRecord {
    pub id: Option<i64>,
    pub category: String,
    /// Activity or initiative name; empty when the row only carries an amount.
    pub activity: String,
    pub date: Month,
    pub amount: Decimal,
    pub emp_id: Option<String>,
}

impl AllocationRecord {
    pub fn new(category: String, date: Month, amount: Decimal) -> Self {
        Self {
            id: None,
            category,
            activity: String::new(),
            date,
            amount,
            emp_id: None,
        }
    }

    pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = activity.into();
        self
    }

    pub fn with_emp_id(mut self, emp_id: impl Into<String>) -> Self {
        self.emp_id = Some(emp_id.into());
        self
    }
}

/// Total available people-capacity for a month.
#[derive(Debug, Clone)]
pub struct CapacityRecord {
    pub id: Option<i64>,
    pub date: Month,
    pub amount: Decimal,
}

impl CapacityRecord {
    pub fn new(date: Month, amount: Decimal) -> Self {
        Self {
            id: None,
            date,
            amount,
        }
    }
}

/// An activity observed in a month, as read back for the calendar view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub date: Month,
    pub activity: String,
    pub category: String,
}
