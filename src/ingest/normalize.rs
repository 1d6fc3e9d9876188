//! Maps one heterogeneous spreadsheet row onto an [`AuditRecord`].

use chrono::NaiveDate;

use crate::analyzers::grade::PerformanceRating;
use crate::ingest::columns::{Field, resolve, resolve_text};
use crate::ingest::dates::coerce_date;
use crate::ingest::row::RawRow;
use crate::record::{AuditRecord, DEFAULT_MAX_POINTS, DEFAULT_SECTION, UNKNOWN_LOCATION};

/// Answer keywords accepted by the answer gate, with their point value.
static ANSWER_KEYWORDS: &[(&str, PerformanceRating, f64)] = &[
    ("excellent", PerformanceRating::Excellent, 4.0),
    ("good", PerformanceRating::Good, 3.0),
    ("fair", PerformanceRating::Fair, 2.0),
    ("poor", PerformanceRating::Poor, 1.0),
];

/// A row that passed the answer gate, before its date is validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub id: String,
    pub location: String,
    pub section: String,
    pub points: f64,
    pub max_points: f64,
    pub submitted_date: Option<NaiveDate>,
    pub comment: Option<String>,
    pub question_text: Option<String>,
    pub answer: PerformanceRating,
}

impl NormalizedRow {
    /// The canonical record, or `None` when no valid date was resolved.
    pub fn into_record(self) -> Option<AuditRecord> {
        Some(AuditRecord {
            id: self.id,
            location: self.location,
            section: self.section,
            points: self.points,
            max_points: self.max_points,
            submitted_date: self.submitted_date?,
            comment: self.comment,
            question_text: self.question_text,
        })
    }
}

/// The rating keyword found in an answer, earliest occurrence first.
///
/// Matching is a case-insensitive substring test, so `"Poor performance"`
/// matches `poor`.
pub fn answer_keyword(answer: &str) -> Option<(PerformanceRating, f64)> {
    let normalized = answer.trim().to_lowercase();
    ANSWER_KEYWORDS
        .iter()
        .filter_map(|(word, rating, points)| {
            normalized.find(word).map(|pos| (pos, *rating, *points))
        })
        .min_by_key(|(pos, _, _)| *pos)
        .map(|(_, rating, points)| (rating, points))
}

fn explicit_points(row: &RawRow) -> Option<f64> {
    resolve(row, Field::Points)?
        .as_number()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

fn explicit_max_points(row: &RawRow) -> Option<f64> {
    resolve(row, Field::MaxPoints)?
        .as_number()
        .filter(|m| m.is_finite() && *m > 0.0)
}

/// Normalizes row number `index` of a batch.
///
/// Returns `None` when the row has no answer containing `fair`, `good`,
/// `excellent` or `poor`.
pub fn normalize_row(row: &RawRow, index: usize) -> Option<NormalizedRow> {
    let answer = resolve_text(row, Field::Answer)?;
    let (rating, keyword_points) = answer_keyword(&answer)?;

    let submitted_date = resolve(row, Field::Date)
        .filter(|cell| !cell.is_blank())
        .and_then(coerce_date);

    Some(NormalizedRow {
        id: format!("audit-{index}"),
        location: resolve_text(row, Field::Location).unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        section: resolve_text(row, Field::Section).unwrap_or_else(|| DEFAULT_SECTION.to_string()),
        points: explicit_points(row).unwrap_or(keyword_points),
        max_points: explicit_max_points(row).unwrap_or(DEFAULT_MAX_POINTS),
        submitted_date,
        comment: resolve_text(row, Field::Comment),
        question_text: resolve_text(row, Field::QuestionText),
        answer: rating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::row::CellValue;

    fn base_row(answer: &str) -> RawRow {
        RawRow::new()
            .with("Store", "Store A")
            .with("Question ID", "Cash Desk")
            .with("Submitted On", "2024-03-05")
            .with("Answer", answer)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_answer_gate_rejects_missing_or_unknown() {
        assert!(normalize_row(&base_row("N/A"), 0).is_none());
        assert!(normalize_row(&base_row(""), 0).is_none());
        assert!(normalize_row(&base_row("   "), 0).is_none());
        assert!(normalize_row(&base_row("Satisfactory"), 0).is_none());

        let no_answer = RawRow::new()
            .with("Store", "Store A")
            .with("Submitted On", "2024-03-05");
        assert!(normalize_row(&no_answer, 0).is_none());
    }

    #[test]
    fn test_answer_gate_is_substring_match() {
        let row = normalize_row(&base_row("Poor performance"), 0).unwrap();
        assert_eq!(row.answer, PerformanceRating::Poor);
        assert_eq!(row.points, 1.0);

        let row = normalize_row(&base_row("  VERY GOOD "), 0).unwrap();
        assert_eq!(row.answer, PerformanceRating::Good);
        assert_eq!(row.points, 3.0);
    }

    #[test]
    fn test_answer_keyword_earliest_wins() {
        assert_eq!(
            answer_keyword("Good, not excellent"),
            Some((PerformanceRating::Good, 3.0))
        );
        assert_eq!(
            answer_keyword("fair to poor"),
            Some((PerformanceRating::Fair, 2.0))
        );
        assert_eq!(answer_keyword("n/a"), None);
    }

    #[test]
    fn test_keyword_scale_and_default_max() {
        let record = normalize_row(&base_row("Excellent"), 7)
            .and_then(NormalizedRow::into_record)
            .unwrap();
        assert_eq!(record.id, "audit-7");
        assert_eq!(record.location, "Store A");
        assert_eq!(record.section, "Cash Desk");
        assert_eq!(record.points, 4.0);
        assert_eq!(record.max_points, 4.0);
        assert_eq!(record.submitted_date, ymd(2024, 3, 5));
        assert_eq!(record.comment, None);
        assert_eq!(record.question_text, None);
    }

    #[test]
    fn test_explicit_points_win_over_keyword() {
        let row = base_row("Good")
            .with("Points Scored", "7")
            .with("Max Score", 10.0);
        let n = normalize_row(&row, 0).unwrap();
        assert_eq!(n.points, 7.0);
        assert_eq!(n.max_points, 10.0);
    }

    #[test]
    fn test_invalid_explicit_values_fall_back() {
        let row = base_row("Fair")
            .with("Points", "n/a")
            .with("Total Points", 0.0);
        let n = normalize_row(&row, 0).unwrap();
        assert_eq!(n.points, 2.0);
        assert_eq!(n.max_points, 4.0);

        let negative = base_row("Fair").with("Points", -3.0);
        assert_eq!(normalize_row(&negative, 0).unwrap().points, 2.0);
    }

    #[test]
    fn test_result_column_serves_answer_and_points() {
        let row = RawRow::new()
            .with("Store", "Store A")
            .with("Date", 45000.0)
            .with("Result", "Good");
        let n = normalize_row(&row, 0).unwrap();
        assert_eq!(n.points, 3.0);
        assert_eq!(n.submitted_date, Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn test_defaults_for_missing_labels() {
        let row = RawRow::new()
            .with("Rating", "good")
            .with("Audit Date", "2024-03-05")
            .with("Store", "  ");
        let n = normalize_row(&row, 0).unwrap();
        assert_eq!(n.location, UNKNOWN_LOCATION);
        assert_eq!(n.section, DEFAULT_SECTION);
    }

    #[test]
    fn test_comment_and_question_resolved() {
        let row = base_row("Poor")
            .with("Remarks", "Till left open")
            .with("Audit Item", "Is the till secured?");
        let n = normalize_row(&row, 0).unwrap();
        assert_eq!(n.comment.as_deref(), Some("Till left open"));
        assert_eq!(n.question_text.as_deref(), Some("Is the till secured?"));
    }

    #[test]
    fn test_unresolvable_date_yields_no_record() {
        let row = base_row("Good").with("Submitted On", "someday");
        let n = normalize_row(&row, 0).unwrap();
        assert_eq!(n.submitted_date, None);
        assert!(n.into_record().is_none());

        let no_date = RawRow::new().with("Answer", "Good");
        assert!(normalize_row(&no_date, 0).unwrap().into_record().is_none());
    }

    #[test]
    fn test_native_date_cell() {
        use chrono::{TimeZone, Utc};
        let dt = Utc.with_ymd_and_hms(2024, 1, 31, 18, 0, 0).unwrap();
        let row = base_row("Good").with("Submitted On", CellValue::Date(dt));
        assert_eq!(normalize_row(&row, 0).unwrap().submitted_date, Some(ymd(2024, 1, 31)));
    }
}
