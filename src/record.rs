use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analyzers::grade::{PerformanceRating, classify};

/// Location label used when a row carries no store/site column.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Section label used when a row carries no section/category column.
pub const DEFAULT_SECTION: &str = "General";

/// Ceiling implied by the four-point textual rating scale.
pub const DEFAULT_MAX_POINTS: f64 = 4.0;

/// A canonical audit row, independent of the source sheet's column naming.
///
/// Records are built once per ingestion batch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub location: String,
    pub section: String,
    pub points: f64,
    pub max_points: f64,
    pub submitted_date: NaiveDate,
    pub comment: Option<String>,
    pub question_text: Option<String>,
}

impl AuditRecord {
    pub fn pct(part: f64, total: f64) -> f64 {
        if total <= 0.0 {
            0.0
        } else {
            (part / total) * 100.0
        }
    }

    /// This record's own score, `0` when `max_points` is not positive.
    pub fn percentage(&self) -> f64 {
        Self::pct(self.points, self.max_points)
    }

    pub fn rating(&self) -> PerformanceRating {
        classify(self.percentage())
    }

    /// Returns the comment if it has any non-whitespace content.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
