//! Canonical fields and the header aliases that map onto them.

use crate::ingest::row::{CellValue, RawRow};

/// A canonical audit field that is looked up in a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Location,
    Section,
    Points,
    MaxPoints,
    Date,
    Comment,
    QuestionText,
    Answer,
}

/// Accepted headers per field, already normalized, in priority order.
static ALIASES: &[(Field, &[&str])] = &[
    (
        Field::Location,
        &["store", "location", "sitename", "site", "branch", "storename", "unit"],
    ),
    (
        Field::Section,
        &["questionid", "section", "category", "department", "area", "auditsection", "module"],
    ),
    (
        Field::Points,
        &["points", "score", "totalscore", "pointsscored", "result", "obtainedpoints", "actualpoints"],
    ),
    (
        Field::MaxPoints,
        &["totalpoints", "maxpoints", "maxscore", "maximumpoints", "targetscore", "possiblepoints"],
    ),
    (
        Field::Date,
        &["submittedon", "auditdate", "submitteddate", "date", "day", "timestamp", "createdat", "submitted"],
    ),
    (
        Field::Comment,
        &["comment", "comments", "notes", "remarks", "feedback", "auditcomments"],
    ),
    (
        Field::QuestionText,
        &["questiontext", "question", "item", "audititem", "criteria"],
    ),
    (
        Field::Answer,
        &["answer", "result", "response", "status", "rating", "outcome", "scoretext"],
    ),
];

impl Field {
    pub fn aliases(self) -> &'static [&'static str] {
        ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }
}

/// Returns the cell of the highest-priority alias of `field` present in `row`.
pub fn resolve(row: &RawRow, field: Field) -> Option<&CellValue> {
    field
        .aliases()
        .iter()
        .find_map(|alias| row.get_normalized(alias))
}

/// Resolved cell as trimmed text, `None` when missing or blank.
pub fn resolve_text(row: &RawRow, field: Field) -> Option<String> {
    let text = resolve(row, field)?.as_text();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_aliases() {
        for field in [
            Field::Location,
            Field::Section,
            Field::Points,
            Field::MaxPoints,
            Field::Date,
            Field::Comment,
            Field::QuestionText,
            Field::Answer,
        ] {
            assert!(!field.aliases().is_empty(), "{field:?}");
        }
    }

    #[test]
    fn test_resolve_ignores_case_spacing_and_separators() {
        let row = RawRow::new()
            .with("STORE NAME", "Store A")
            .with("question_id", "Cash Desk")
            .with("Total-Points", 4.0);
        assert_eq!(resolve_text(&row, Field::Location).as_deref(), Some("Store A"));
        assert_eq!(resolve_text(&row, Field::Section).as_deref(), Some("Cash Desk"));
        assert_eq!(resolve(&row, Field::MaxPoints), Some(&CellValue::Number(4.0)));
    }

    #[test]
    fn test_alias_priority_beats_column_order() {
        let row = RawRow::new()
            .with("Branch", "North")
            .with("Store", "Store A");
        assert_eq!(resolve_text(&row, Field::Location).as_deref(), Some("Store A"));
    }

    #[test]
    fn test_blank_text_is_missing() {
        let row = RawRow::new().with("Comments", "   ");
        assert!(resolve(&row, Field::Comment).is_some());
        assert_eq!(resolve_text(&row, Field::Comment), None);
    }

    #[test]
    fn test_numeric_label_renders_whole() {
        let row = RawRow::new().with("Unit", 12.0);
        assert_eq!(resolve_text(&row, Field::Location).as_deref(), Some("12"));
    }
}
