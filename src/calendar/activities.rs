use std::collections::HashSet;

use crate::models::{Activity, CategoryBucket, Month};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActivityEntry {
    pub(crate) activity: String,
    pub(crate) category: String,
}

/// Activities sharing a display category within one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActivityGroup {
    pub(crate) category: String,
    pub(crate) activities: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthActivities {
    pub(crate) month: Month,
    /// Flattened in group order.
    pub(crate) activities: Vec<ActivityEntry>,
    /// Non-empty groups only: the four fixed buckets first, then any
    /// unrecognised categories under their literal name.
    pub(crate) groups: Vec<ActivityGroup>,
}

/// Group activity rows by month for exactly the requested months.
///
/// Rows for months outside `months` are ignored. Each month keeps one entry
/// per distinct (activity, category) pair. Requested months with no rows are
/// still returned, with empty lists.
pub(crate) fn group_activities_by_month(months: &[Month], rows: &[Activity]) -> Vec<MonthActivities> {
    let mut ordered: Vec<Month> = months.to_vec();
    ordered.sort();
    ordered.dedup();

    ordered
        .into_iter()
        .map(|month| {
            let mut seen: HashSet<(&str, &str)> = HashSet::new();
            let unique: Vec<&Activity> = rows
                .iter()
                .filter(|r| r.date == month && !r.activity.trim().is_empty())
                .filter(|r| seen.insert((r.activity.as_str(), r.category.as_str())))
                .collect();

            let groups = group_by_category(&unique);
            let activities = groups
                .iter()
                .flat_map(|g| g.activities.iter().cloned())
                .collect();

            MonthActivities {
                month,
                activities,
                groups,
            }
        })
        .collect()
}

fn group_by_category(rows: &[&Activity]) -> Vec<ActivityGroup> {
    let mut groups: Vec<ActivityGroup> = CategoryBucket::CALENDAR_ORDER
        .iter()
        .map(|b| ActivityGroup {
            category: b.as_str().to_string(),
            activities: Vec::new(),
        })
        .collect();

    for row in rows {
        let label = match CategoryBucket::classify(&row.category) {
            Some(bucket) => bucket.as_str().to_string(),
            None => row.category.clone(),
        };
        let entry = ActivityEntry {
            activity: row.activity.clone(),
            category: row.category.clone(),
        };
        match groups.iter_mut().find(|g| g.category == label) {
            Some(group) => group.activities.push(entry),
            None => groups.push(ActivityGroup {
                category: label,
                activities: vec![entry],
            }),
        }
    }

    groups.retain(|g| !g.activities.is_empty());
    groups
}
