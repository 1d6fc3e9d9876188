use crate::analyzers::types::{
    Aggregate, ChartGrouping, ChartPoint, ChartValue, LocationPerformance, SectionPoints,
    SlotPoints,
};
use crate::analyzers::utility::{round_half_up, truncate_label};
use crate::record::{AuditRecord, DEFAULT_SECTION};
use std::collections::{BTreeMap, BTreeSet};

/// Chart labels longer than this are cut and suffixed with `...`.
const CHART_LABEL_CHARS: usize = 18;

/// Sums points and maximum points and derives the percentage score.
///
/// The score is `0` for an empty subset or one whose maximum sums to zero.
pub fn aggregate(records: &[&AuditRecord]) -> Aggregate {
    if records.is_empty() {
        return Aggregate::default();
    }

    let points: f64 = records.iter().map(|r| r.points).sum();
    let max_points: f64 = records.iter().map(|r| r.max_points).sum();

    Aggregate {
        points,
        max_points,
        score: AuditRecord::pct(points, max_points),
    }
}

fn rounded_points(records: &[&AuditRecord]) -> SlotPoints {
    let agg = aggregate(records);
    SlotPoints {
        points: round_half_up(agg.points),
        max_points: round_half_up(agg.max_points),
    }
}

fn section_of(record: &AuditRecord) -> &str {
    if record.section.is_empty() {
        DEFAULT_SECTION
    } else {
        &record.section
    }
}

/// Rounded per-section points for the three snapshots, sections sorted.
pub fn section_points(
    audit1: &[&AuditRecord],
    audit2: &[&AuditRecord],
    audit3: &[&AuditRecord],
) -> Vec<SectionPoints> {
    let sections: BTreeSet<&str> = audit1
        .iter()
        .chain(audit2)
        .chain(audit3)
        .map(|r| section_of(*r))
        .collect();

    let slice = |records: &[&AuditRecord], section: &str| -> SlotPoints {
        let subset: Vec<&AuditRecord> = records
            .iter()
            .copied()
            .filter(|r| section_of(*r) == section)
            .collect();
        rounded_points(&subset)
    };

    sections
        .into_iter()
        .map(|section| SectionPoints {
            section: section.to_string(),
            audit1: slice(audit1, section),
            audit2: slice(audit2, section),
            audit3: slice(audit3, section),
        })
        .collect()
}

fn chart_value(records: &[&AuditRecord]) -> ChartValue {
    if records.is_empty() {
        return ChartValue::default();
    }
    let agg = aggregate(records);
    ChartValue {
        score: (agg.max_points > 0.0).then(|| round_half_up(agg.score)),
        points: round_half_up(agg.points),
        max_points: round_half_up(agg.max_points),
    }
}

/// Per-category chart series across the three snapshots, categories sorted.
pub fn chart_points(
    grouping: ChartGrouping,
    audit1: &[&AuditRecord],
    audit2: &[&AuditRecord],
    audit3: &[&AuditRecord],
) -> Vec<ChartPoint> {
    let key = |r: &AuditRecord| -> String {
        match grouping {
            ChartGrouping::Section => r.section.clone(),
            ChartGrouping::Location => r.location.clone(),
        }
    };

    let categories: BTreeSet<String> = audit1
        .iter()
        .chain(audit2)
        .chain(audit3)
        .map(|r| key(*r))
        .collect();

    let value_for = |records: &[&AuditRecord], category: &str| -> ChartValue {
        let subset: Vec<&AuditRecord> = records
            .iter()
            .copied()
            .filter(|r| key(*r) == category)
            .collect();
        chart_value(&subset)
    };

    categories
        .into_iter()
        .map(|name| ChartPoint {
            display_name: truncate_label(&name, CHART_LABEL_CHARS),
            audit1: value_for(audit1, &name),
            audit2: value_for(audit2, &name),
            audit3: value_for(audit3, &name),
            name,
        })
        .collect()
}

/// Per-location scores over `records`, best first.
pub fn location_performance(records: &[&AuditRecord]) -> Vec<LocationPerformance> {
    let mut by_location: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for r in records {
        let entry = by_location.entry(r.location.as_str()).or_default();
        entry.0 += r.points;
        entry.1 += r.max_points;
    }

    let mut ranked: Vec<LocationPerformance> = by_location
        .into_iter()
        .map(|(location, (points, max_points))| LocationPerformance {
            location: location.to_string(),
            score: AuditRecord::pct(points, max_points),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate(&[]);
        assert_eq!(agg.points, 0.0);
        assert_eq!(agg.max_points, 0.0);
        assert_eq!(agg.score, 0.0);
    }

    #[test]
    fn test_aggregate_sums() {
        let a = record("1", "A", "Cash", 3.0, 4.0, "2024-01-10");
        let b = record("2", "A", "Cash", 1.0, 4.0, "2024-01-10");
        let agg = aggregate(&[&a, &b]);
        assert_eq!(agg.points, 4.0);
        assert_eq!(agg.max_points, 8.0);
        assert_eq!(agg.score, 50.0);
    }

    #[test]
    fn test_aggregate_zero_max_is_guarded() {
        let a = record("1", "A", "Cash", 0.0, 0.0, "2024-01-10");
        let agg = aggregate(&[&a]);
        assert_eq!(agg.score, 0.0);
        assert!(!agg.score.is_nan());
    }

    #[test]
    fn test_section_points_rounds_and_sorts() {
        let a = record("1", "A", "Stock", 2.5, 4.0, "2024-01-10");
        let b = record("2", "A", "Cash", 3.0, 4.0, "2024-01-10");
        let c = record("3", "A", "Cash", 1.0, 4.0, "2024-02-10");
        let rows = section_points(&[&a, &b], &[&c], &[]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].section, "Cash");
        assert_eq!(rows[0].audit1, SlotPoints { points: 3.0, max_points: 4.0 });
        assert_eq!(rows[0].audit2, SlotPoints { points: 1.0, max_points: 4.0 });
        assert_eq!(rows[0].audit3, SlotPoints::default());
        assert_eq!(rows[1].section, "Stock");
        assert_eq!(rows[1].audit1.points, 3.0);
    }

    #[test]
    fn test_chart_points_missing_slot_has_no_score() {
        let a = record("1", "Store A", "Cash", 3.0, 4.0, "2024-01-10");
        let b = record("2", "Store B", "Cash", 4.0, 4.0, "2024-02-10");
        let points = chart_points(ChartGrouping::Location, &[&a], &[&b], &[]);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "Store A");
        assert_eq!(points[0].audit1.score, Some(75.0));
        assert_eq!(points[0].audit2.score, None);
        assert_eq!(points[1].audit2.score, Some(100.0));
        assert_eq!(points[1].audit3, ChartValue::default());
    }

    #[test]
    fn test_chart_points_group_by_section() {
        let a = record("1", "Store A", "Fitting Rooms and Mirrors", 1.0, 4.0, "2024-01-10");
        let points = chart_points(ChartGrouping::Section, &[&a], &[], &[]);
        assert_eq!(points[0].name, "Fitting Rooms and Mirrors");
        assert_eq!(points[0].display_name, "Fitting Rooms and ...");
        assert_eq!(points[0].audit1.score, Some(25.0));
    }

    #[test]
    fn test_location_performance_best_first() {
        let a = record("1", "Store A", "Cash", 1.0, 4.0, "2024-01-10");
        let b = record("2", "Store B", "Cash", 4.0, 4.0, "2024-01-10");
        let c = record("3", "Store A", "Stock", 3.0, 4.0, "2024-01-10");
        let ranked = location_performance(&[&a, &b, &c]);
        assert_eq!(ranked[0].location, "Store B");
        assert_eq!(ranked[0].score, 100.0);
        assert_eq!(ranked[1].location, "Store A");
        assert_eq!(ranked[1].score, 50.0);
    }
}
