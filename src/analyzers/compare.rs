use crate::analyzers::aggregate::aggregate;
use crate::analyzers::grade::{PerformanceRating, classify};
use crate::analyzers::types::{ComparisonData, SnapshotSelection, SnapshotSlot};
use crate::filter::FilterState;
use crate::record::AuditRecord;

/// Most frequent per-record tier, or `None` for an empty subset.
///
/// Ties go to the better tier.
pub fn majority_rating(records: &[&AuditRecord]) -> Option<PerformanceRating> {
    if records.is_empty() {
        return None;
    }

    let mut counts = [0usize; PerformanceRating::ORDER.len()];
    for r in records {
        counts[r.rating() as usize] += 1;
    }

    let mut best = PerformanceRating::ORDER[0];
    let mut best_count = counts[0];
    for rating in PerformanceRating::ORDER {
        let count = counts[rating as usize];
        if count >= best_count {
            best = rating;
            best_count = count;
        }
    }
    Some(best)
}

/// Compares the current snapshot against the previous one.
///
/// The rating is the majority vote of the current records' own tiers, falling
/// back to the tier of the (zero) aggregate score when there are none.
pub fn compare(current_records: &[&AuditRecord], previous_records: &[&AuditRecord]) -> ComparisonData {
    let current = aggregate(current_records);
    let previous = aggregate(previous_records);

    let difference = current.score - previous.score;
    let percentage_change = if previous.score == 0.0 {
        0.0
    } else {
        (difference / previous.score) * 100.0
    };

    let rating = majority_rating(current_records).unwrap_or_else(|| classify(current.score));

    ComparisonData {
        current_score: current.score,
        previous_score: previous.score,
        current_points: current.points,
        previous_points: previous.points,
        current_max_points: current.max_points,
        previous_max_points: previous.max_points,
        difference,
        percentage_change,
        rating,
    }
}

/// Decides which snapshots feed the comparator from which dates are set.
///
/// With Audit 1 and Audit 3 set but Audit 2 empty, the Audit 3 row applies and
/// Audit 3 is compared against the empty Audit 2.
pub fn select_snapshots(has1: bool, has2: bool, has3: bool) -> SnapshotSelection {
    use SnapshotSlot::*;

    let (current, previous, label) = match (has1, has2, has3) {
        (true, true, true) => (Some(Audit3), Some(Audit2), "Audit 3"),
        (true, true, false) => (Some(Audit2), Some(Audit1), "Audit 2"),
        (false, true, true) => (Some(Audit3), Some(Audit2), "Audit 3"),
        (false, true, false) => (Some(Audit2), Some(Audit1), "Audit 2"),
        (_, false, true) => (Some(Audit3), Some(Audit2), "Audit 3"),
        (true, false, false) => (Some(Audit1), None, "Audit 1"),
        (false, false, false) => (None, None, "Audit"),
    };

    SnapshotSelection {
        current,
        previous,
        label,
    }
}

impl FilterState {
    pub fn snapshot_selection(&self) -> SnapshotSelection {
        select_snapshots(
            self.audit1_date.is_some(),
            self.audit2_date.is_some(),
            self.audit3_date.is_some(),
        )
    }
}
