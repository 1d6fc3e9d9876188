//! Data types produced by the aggregation and comparison engine.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::grade::PerformanceRating;

/// Point sums over a record subset and the derived percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub points: f64,
    pub max_points: f64,
    pub score: f64,
}

/// Current snapshot against previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonData {
    pub current_score: f64,
    pub previous_score: f64,
    pub current_points: f64,
    pub previous_points: f64,
    pub current_max_points: f64,
    pub previous_max_points: f64,
    /// Percentage-point delta, positive when current is higher.
    pub difference: f64,
    /// Relative change; zero when the previous score is zero.
    pub percentage_change: f64,
    pub rating: PerformanceRating,
}

/// One of the three audit snapshot selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SnapshotSlot {
    Audit1,
    Audit2,
    Audit3,
}

impl SnapshotSlot {
    pub const ALL: [SnapshotSlot; 3] = [SnapshotSlot::Audit1, SnapshotSlot::Audit2, SnapshotSlot::Audit3];

    pub fn label(self) -> &'static str {
        match self {
            SnapshotSlot::Audit1 => "Audit 1",
            SnapshotSlot::Audit2 => "Audit 2",
            SnapshotSlot::Audit3 => "Audit 3",
        }
    }

    /// The slot a per-slot trend is measured against.
    pub fn preceding(self) -> Option<SnapshotSlot> {
        match self {
            SnapshotSlot::Audit1 => None,
            SnapshotSlot::Audit2 => Some(SnapshotSlot::Audit1),
            SnapshotSlot::Audit3 => Some(SnapshotSlot::Audit2),
        }
    }

    /// Parses `1`, `2`, `3` (or `audit1`..`audit3`).
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.trim().to_ascii_lowercase().replace([' ', '_', '-'], "");
        match digits.trim_start_matches("audit") {
            "1" => Some(SnapshotSlot::Audit1),
            "2" => Some(SnapshotSlot::Audit2),
            "3" => Some(SnapshotSlot::Audit3),
            _ => None,
        }
    }
}

/// Which snapshots feed the comparator, derived from which dates are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotSelection {
    pub current: Option<SnapshotSlot>,
    pub previous: Option<SnapshotSlot>,
    pub label: &'static str,
}

/// Movement of a value relative to the preceding snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Trend::Up
        } else if current < previous {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

/// Rounded point sums of one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SlotPoints {
    pub points: f64,
    pub max_points: f64,
}

impl SlotPoints {
    /// Whole-number score, `0` when nothing was possible.
    pub fn score(&self) -> f64 {
        if self.max_points > 0.0 {
            crate::analyzers::utility::round_half_up(self.points / self.max_points * 100.0)
        } else {
            0.0
        }
    }
}

/// Per-section points across the three snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPoints {
    pub section: String,
    pub audit1: SlotPoints,
    pub audit2: SlotPoints,
    pub audit3: SlotPoints,
}

impl SectionPoints {
    pub fn slot(&self, slot: SnapshotSlot) -> SlotPoints {
        match slot {
            SnapshotSlot::Audit1 => self.audit1,
            SnapshotSlot::Audit2 => self.audit2,
            SnapshotSlot::Audit3 => self.audit3,
        }
    }

    /// Points trend of `slot` against its preceding slot.
    pub fn trend(&self, slot: SnapshotSlot) -> Option<Trend> {
        let previous = slot.preceding()?;
        Some(Trend::between(
            self.slot(previous).points,
            self.slot(slot).points,
        ))
    }
}

/// One slot's values for a chart category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChartValue {
    /// `None` when the slot has no rows for the category or nothing possible.
    pub score: Option<f64>,
    pub points: f64,
    pub max_points: f64,
}

/// One x-axis category of the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub display_name: String,
    pub audit1: ChartValue,
    pub audit2: ChartValue,
    pub audit3: ChartValue,
}

/// How chart categories are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartGrouping {
    Section,
    Location,
}

/// Summary box for one selected snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotTotals {
    pub slot: SnapshotSlot,
    pub date: NaiveDate,
    pub points: f64,
    pub max_points: f64,
    pub score: f64,
}

/// Tier counts and whole-number shares over one record view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub total: usize,
    pub buckets: Vec<RatingBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucket {
    pub rating: PerformanceRating,
    pub range: &'static str,
    pub count: usize,
    pub share: f64,
}

/// Score of one location over a record subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationPerformance {
    pub location: String,
    pub score: f64,
}
