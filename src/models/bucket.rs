/// The four fixed allocation buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryBucket {
    Vacation,
    Baseline,
    Strategic,
    Discretionary,
}

impl CategoryBucket {
    /// Order used by the capacity summary (and for matching precedence).
    pub const SUMMARY_ORDER: [CategoryBucket; 4] = [
        Self::Vacation,
        Self::Baseline,
        Self::Strategic,
        Self::Discretionary,
    ];

    /// Order used when grouping calendar activities.
    pub const CALENDAR_ORDER: [CategoryBucket; 4] = [
        Self::Baseline,
        Self::Strategic,
        Self::Discretionary,
        Self::Vacation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "Vacation",
            Self::Baseline => "Baseline",
            Self::Strategic => "Strategic",
            Self::Discretionary => "Discretionary",
        }
    }

    /// Label shown in the capacity summary.
    pub fn summary_label(&self) -> &'static str {
        match self {
            Self::Discretionary => "Discretionary Project",
            other => other.as_str(),
        }
    }

    /// Map a free-form category name to a bucket by case-insensitive
    /// substring match. First bucket in `SUMMARY_ORDER` wins.
    pub fn classify(category: &str) -> Option<Self> {
        let lower = category.to_lowercase();
        Self::SUMMARY_ORDER
            .into_iter()
            .find(|b| lower.contains(&b.as_str().to_lowercase()))
    }
}

impl std::fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
