//! One filtered dashboard state: the three snapshots and everything derived
//! from them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::aggregate::{aggregate, chart_points, location_performance, section_points};
use crate::analyzers::compare::compare;
use crate::analyzers::observations::{CommentQuery, critical_observations, rating_distribution};
use crate::analyzers::types::{
    ChartGrouping, ChartPoint, ComparisonData, LocationPerformance, RatingDistribution,
    SectionPoints, SlotTotals, SnapshotSelection, SnapshotSlot,
};
use crate::analyzers::utility::round_half_up;
use crate::filter::{FilterState, filter_by_date};
use crate::record::AuditRecord;

/// Records of one slot, or all three concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotView {
    Merged,
    Single(SnapshotSlot),
}

/// The three date-scoped snapshots for a filter state.
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    pub filters: &'a FilterState,
    pub audit1: Vec<&'a AuditRecord>,
    pub audit2: Vec<&'a AuditRecord>,
    pub audit3: Vec<&'a AuditRecord>,
}

impl<'a> Dashboard<'a> {
    pub fn build(records: &'a [AuditRecord], filters: &'a FilterState) -> Self {
        Self {
            filters,
            audit1: filter_by_date(records, filters, filters.audit1_date),
            audit2: filter_by_date(records, filters, filters.audit2_date),
            audit3: filter_by_date(records, filters, filters.audit3_date),
        }
    }

    pub fn slot(&self, slot: SnapshotSlot) -> &[&'a AuditRecord] {
        match slot {
            SnapshotSlot::Audit1 => &self.audit1,
            SnapshotSlot::Audit2 => &self.audit2,
            SnapshotSlot::Audit3 => &self.audit3,
        }
    }

    pub fn slot_date(&self, slot: SnapshotSlot) -> Option<NaiveDate> {
        match slot {
            SnapshotSlot::Audit1 => self.filters.audit1_date,
            SnapshotSlot::Audit2 => self.filters.audit2_date,
            SnapshotSlot::Audit3 => self.filters.audit3_date,
        }
    }

    pub fn view(&self, view: SlotView) -> Vec<&'a AuditRecord> {
        match view {
            SlotView::Merged => self
                .audit1
                .iter()
                .chain(&self.audit2)
                .chain(&self.audit3)
                .copied()
                .collect(),
            SlotView::Single(slot) => self.slot(slot).to_vec(),
        }
    }

    fn optional_slot(&self, slot: Option<SnapshotSlot>) -> &[&'a AuditRecord] {
        slot.map(|s| self.slot(s)).unwrap_or(&[])
    }

    pub fn selection(&self) -> SnapshotSelection {
        self.filters.snapshot_selection()
    }

    pub fn current_records(&self) -> &[&'a AuditRecord] {
        self.optional_slot(self.selection().current)
    }

    pub fn previous_records(&self) -> &[&'a AuditRecord] {
        self.optional_slot(self.selection().previous)
    }

    pub fn comparison(&self) -> ComparisonData {
        compare(self.current_records(), self.previous_records())
    }

    /// Data is loaded but neither Audit 1 nor Audit 2 matched anything.
    pub fn has_no_matches(&self, total_records: usize) -> bool {
        total_records > 0 && self.audit1.is_empty() && self.audit2.is_empty()
    }

    /// Chart categories are sections under the `All` section filter,
    /// locations otherwise.
    pub fn chart_grouping(&self) -> ChartGrouping {
        if self.filters.section.is_all() {
            ChartGrouping::Section
        } else {
            ChartGrouping::Location
        }
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        chart_points(self.chart_grouping(), &self.audit1, &self.audit2, &self.audit3)
    }

    /// Rounded totals for every slot that has a date selected.
    pub fn slot_totals(&self) -> Vec<SlotTotals> {
        SnapshotSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                let date = self.slot_date(slot)?;
                let agg = aggregate(self.slot(slot));
                Some(SlotTotals {
                    slot,
                    date,
                    points: round_half_up(agg.points),
                    max_points: round_half_up(agg.max_points),
                    score: round_half_up(agg.score),
                })
            })
            .collect()
    }

    pub fn section_points(&self) -> Vec<SectionPoints> {
        section_points(&self.audit1, &self.audit2, &self.audit3)
    }

    pub fn distribution(&self, view: SlotView) -> RatingDistribution {
        rating_distribution(&self.view(view))
    }

    pub fn critical(&self, slot: SnapshotSlot) -> Vec<&'a AuditRecord> {
        critical_observations(self.slot(slot))
    }

    /// Critical observation counts for the slots that have a date selected.
    pub fn critical_counts(&self) -> Vec<(SnapshotSlot, usize)> {
        SnapshotSlot::ALL
            .into_iter()
            .filter(|slot| self.slot_date(*slot).is_some())
            .map(|slot| (slot, self.critical(slot).len()))
            .collect()
    }

    pub fn comments(&self, slot: SnapshotSlot, query: &CommentQuery) -> Vec<&'a AuditRecord> {
        query.apply(self.slot(slot))
    }

    pub fn location_ranking(&self) -> Vec<LocationPerformance> {
        location_performance(self.current_records())
    }

    pub fn summary(&self, total_records: usize) -> DashboardSummary {
        DashboardSummary {
            selection: self.selection(),
            comparison: self.comparison(),
            no_matches: self.has_no_matches(total_records),
            slots: self.slot_totals(),
            distribution: self.distribution(SlotView::Merged),
            critical_counts: self
                .critical_counts()
                .into_iter()
                .map(|(slot, count)| CriticalCount { slot, count })
                .collect(),
            chart_grouping: self.chart_grouping(),
            chart: self.chart(),
            sections: self.section_points(),
            locations: self.location_ranking(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalCount {
    pub slot: SnapshotSlot,
    pub count: usize,
}

/// Serializable snapshot of every dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub selection: SnapshotSelection,
    pub comparison: ComparisonData,
    pub no_matches: bool,
    pub slots: Vec<SlotTotals>,
    pub distribution: RatingDistribution,
    pub critical_counts: Vec<CriticalCount>,
    pub chart_grouping: ChartGrouping,
    pub chart: Vec<ChartPoint>,
    pub sections: Vec<SectionPoints>,
    pub locations: Vec<LocationPerformance>,
}
