use std::sync::LazyLock;

use anyhow::Result;
use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static MONTH_TEXT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{4})[-/]?(\d{1,2})\s*$").ok());

/// A calendar month encoded as `YYYYMM` (e.g. `202501` is January 2025).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Month(u32);

impl Month {
    pub fn new(yyyymm: u32) -> Option<Self> {
        let month = yyyymm % 100;
        if (1..=12).contains(&month) && yyyymm >= 100 {
            Some(Self(yyyymm))
        } else {
            None
        }
    }

    pub fn from_parts(year: u32, month: u32) -> Option<Self> {
        Self::new(year * 100 + month)
    }

    /// Wall-clock month in local time.
    pub fn current() -> Self {
        let now = chrono::Local::now();
        Self(now.year().max(0) as u32 * 100 + now.month())
    }

    /// Accepts `YYYYMM`, `YYYY-MM` or `YYYY/MM`.
    pub fn parse(s: &str) -> Result<Self> {
        let caps = MONTH_TEXT
            .as_ref()
            .and_then(|re| re.captures(s))
            .ok_or_else(|| anyhow::anyhow!("Invalid month '{s}' (expected YYYYMM or YYYY-MM)"))?;
        let year: u32 = caps[1].parse()?;
        let month: u32 = caps[2].parse()?;
        Self::from_parts(year, month)
            .ok_or_else(|| anyhow::anyhow!("Invalid month '{s}': month must be 01-12"))
    }

    pub fn yyyymm(self) -> u32 {
        self.0
    }

    pub fn year(self) -> u32 {
        self.0 / 100
    }

    pub fn month(self) -> u32 {
        self.0 % 100
    }

    /// Linear index used for adjacency tests: `year * 12 + month`.
    pub fn index(self) -> u32 {
        self.year() * 12 + self.month()
    }

    fn from_index(index: u32) -> Self {
        let zero_based = index - 1;
        Self((zero_based / 12) * 100 + zero_based % 12 + 1)
    }

    pub fn next(self) -> Self {
        if self.month() == 12 {
            Self((self.year() + 1) * 100 + 1)
        } else {
            Self(self.0 + 1)
        }
    }

    /// Shift by a signed number of months.
    pub fn offset(self, months: i32) -> Self {
        let shifted = (self.index() as i64 + months as i64).max(13);
        Self::from_index(shifted as u32)
    }

    /// Short label, e.g. `202501` → `"Jan-25"`.
    pub fn label(self) -> String {
        let abbrev = MONTH_ABBREVS[(self.month() - 1) as usize];
        format!("{abbrev}-{:02}", self.year() % 100)
    }
}

impl TryFrom<u32> for Month {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("invalid YYYYMM month: {value}"))
    }
}

impl From<Month> for u32 {
    fn from(m: Month) -> Self {
        m.0
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `n` consecutive months beginning at `start`.
pub fn compute_window(start: Month, n: usize) -> Vec<Month> {
    let mut months = Vec::with_capacity(n);
    let mut current = start;
    for _ in 0..n {
        months.push(current);
        current = current.next();
    }
    months
}
