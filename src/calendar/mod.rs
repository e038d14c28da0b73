mod activities;
mod months;
mod selector;

pub(crate) use activities::{group_activities_by_month, ActivityEntry, ActivityGroup, MonthActivities};
pub(crate) use months::{recent_months, requested_months, RECENT_MONTHS};
pub(crate) use selector::{MonthSelection, Toggle, MAX_SELECTION};

#[cfg(test)]
mod tests;
