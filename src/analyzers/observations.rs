//! Per-record views: rating distribution, critical observations and the
//! comment browser.

use crate::analyzers::grade::PerformanceRating;
use crate::analyzers::types::{RatingBucket, RatingDistribution};
use crate::analyzers::utility::share;
use crate::filter::Selection;
use crate::record::AuditRecord;

/// Rows scoring under this percentage are critical when they carry a comment.
pub const CRITICAL_THRESHOLD: f64 = 50.0;

/// Tier counts over `records`, best tier first.
pub fn rating_distribution(records: &[&AuditRecord]) -> RatingDistribution {
    let mut counts = [0usize; PerformanceRating::ORDER.len()];
    for r in records {
        counts[r.rating() as usize] += 1;
    }

    let buckets = PerformanceRating::ORDER
        .into_iter()
        .rev()
        .map(|rating| {
            let count = counts[rating as usize];
            RatingBucket {
                rating,
                range: rating.range_label(),
                count,
                share: share(count, records.len()),
            }
        })
        .collect();

    RatingDistribution {
        total: records.len(),
        buckets,
    }
}

pub fn is_critical(record: &AuditRecord) -> bool {
    record.percentage() < CRITICAL_THRESHOLD && record.comment_text().is_some()
}

/// Low-scoring rows that an auditor commented on.
pub fn critical_observations<'a>(records: &[&'a AuditRecord]) -> Vec<&'a AuditRecord> {
    records.iter().copied().filter(|r| is_critical(r)).collect()
}

/// Filters for browsing commented rows of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    pub section: Selection,
    /// `None` keeps every tier.
    pub rating: Option<PerformanceRating>,
    pub search: String,
}

impl CommentQuery {
    pub fn matches(&self, record: &AuditRecord) -> bool {
        let Some(comment) = record.comment_text() else {
            return false;
        };
        if !self.section.matches(&record.section) {
            return false;
        }
        if self.rating.is_some_and(|r| r != record.rating()) {
            return false;
        }

        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {}",
            comment,
            record.section,
            record.question_text.as_deref().unwrap_or("")
        )
        .to_lowercase();
        haystack.contains(&query)
    }

    pub fn apply<'a>(&self, records: &[&'a AuditRecord]) -> Vec<&'a AuditRecord> {
        records.iter().copied().filter(|r| self.matches(r)).collect()
    }
}
