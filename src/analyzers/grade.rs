use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal performance tier, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceRating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl PerformanceRating {
    /// All tiers in ascending order.
    pub const ORDER: [PerformanceRating; 4] = [
        PerformanceRating::Poor,
        PerformanceRating::Fair,
        PerformanceRating::Good,
        PerformanceRating::Excellent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceRating::Poor => "Poor",
            PerformanceRating::Fair => "Fair",
            PerformanceRating::Good => "Good",
            PerformanceRating::Excellent => "Excellent",
        }
    }

    /// Percentage bucket shown next to the tier name.
    pub fn range_label(self) -> &'static str {
        match self {
            PerformanceRating::Poor => "0-49%",
            PerformanceRating::Fair => "50-74%",
            PerformanceRating::Good => "75-89%",
            PerformanceRating::Excellent => "90-100%",
        }
    }

    /// Case-insensitive tier lookup by name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ORDER
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a percentage score (0–100) into a performance tier.
///
/// | Range       | Tier      |
/// |-------------|-----------|
/// | >= 90       | Excellent |
/// | >= 75       | Good      |
/// | >= 50       | Fair      |
/// | otherwise   | Poor      |
///
/// NaN and negative input fall through every threshold and land on `Poor`.
pub fn classify(p: f64) -> PerformanceRating {
    match p {
        p if p >= 90.0 => PerformanceRating::Excellent,
        p if p >= 75.0 => PerformanceRating::Good,
        p if p >= 50.0 => PerformanceRating::Fair,
        _ => PerformanceRating::Poor,
    }
}
