use anyhow::Result;

use crate::models::Month;

/// How far back month pickers look, counting the current month.
pub(crate) const RECENT_MONTHS: usize = 12;

/// Distinct stored months inside the trailing window that ends at `today`,
/// ascending.
pub(crate) fn recent_months(stored: &[Month], today: Month) -> Vec<Month> {
    let earliest = today.offset(-(RECENT_MONTHS as i32 - 1));
    let mut months: Vec<Month> = stored
        .iter()
        .copied()
        .filter(|m| *m >= earliest && *m <= today)
        .collect();
    months.sort();
    months.dedup();
    months
}

/// Sorted, deduplicated copy of a caller's month list. More distinct months
/// than a picker ever offers is an error.
pub(crate) fn requested_months(months: &[Month]) -> Result<Vec<Month>> {
    let mut months = months.to_vec();
    months.sort();
    months.dedup();
    if months.len() > RECENT_MONTHS {
        anyhow::bail!(
            "at most {RECENT_MONTHS} distinct months may be requested, got {}",
            months.len()
        );
    }
    Ok(months)
}
