mod account;
mod allocation;
mod bucket;
mod employee;
mod initiative;
mod month;

pub use account::{Account, Capability, Role};
pub use allocation::{check_amount, Activity, AllocationRecord, CapacityRecord, MAX_AMOUNT};
pub use bucket::CategoryBucket;
pub use employee::{Department, Employee, EmployeeListing};
pub use initiative::Initiative;
pub use month::{compute_window, Month};
