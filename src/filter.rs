//! Filter criteria and the date-scoped record filter.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::record::AuditRecord;

/// A location or section selector: the `All` wildcard or one concrete label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == label,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(label) => Some(label),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl From<&str> for Selection {
    /// Empty text and `All` (any case) both mean the wildcard.
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(trimmed.to_string())
        }
    }
}

impl FromStr for Selection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Selection::from(s))
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(label) => f.write_str(label),
        }
    }
}

/// Everything the dashboard is currently scoped to.
///
/// Each `audit*_date` is either unselected (`None`) or one concrete
/// `submitted_date` present in the data for the chosen location.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterState {
    pub location: Selection,
    pub section: Selection,
    pub search_query: String,
    pub audit1_date: Option<NaiveDate>,
    pub audit2_date: Option<NaiveDate>,
    pub audit3_date: Option<NaiveDate>,
}

impl FilterState {
    /// Switches location and clears all three snapshot dates, which belong to
    /// the previous location.
    pub fn with_location(mut self, location: Selection) -> Self {
        self.location = location;
        self.audit1_date = None;
        self.audit2_date = None;
        self.audit3_date = None;
        self
    }

    /// Picks the first available location when none is chosen yet.
    pub fn with_default_location(self, locations: &[String]) -> Self {
        match (&self.location, locations.first()) {
            (Selection::All, Some(first)) => self.with_location(Selection::Only(first.clone())),
            _ => self,
        }
    }

    /// Only an empty query is no query; whitespace is matched literally.
    fn search_matches(&self, record: &AuditRecord) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        record.location.to_lowercase().contains(&query)
            || record.section.to_lowercase().contains(&query)
    }

    /// Location, section and search criteria, ignoring the snapshot dates.
    pub fn in_scope(&self, record: &AuditRecord) -> bool {
        self.location.matches(&record.location)
            && self.section.matches(&record.section)
            && self.search_matches(record)
    }

    /// Selected snapshot dates that are not among `available`, in slot order.
    pub fn unavailable_dates(&self, available: &[NaiveDate]) -> Vec<(&'static str, NaiveDate)> {
        [
            ("audit1", self.audit1_date),
            ("audit2", self.audit2_date),
            ("audit3", self.audit3_date),
        ]
        .into_iter()
        .filter_map(|(slot, date)| date.map(|d| (slot, d)))
        .filter(|(_, date)| !available.contains(date))
        .collect()
    }
}

/// Returns every record in scope of `filters`, whatever its date.
pub fn filter_in_scope<'a>(records: &'a [AuditRecord], filters: &FilterState) -> Vec<&'a AuditRecord> {
    records.iter().filter(|r| filters.in_scope(r)).collect()
}

/// Returns the records of one snapshot that satisfy `filters`.
///
/// No target date means no snapshot was picked for that slot, and the slot
/// shows nothing rather than every date.
pub fn filter_by_date<'a>(
    records: &'a [AuditRecord],
    filters: &FilterState,
    target_date: Option<NaiveDate>,
) -> Vec<&'a AuditRecord> {
    let Some(target) = target_date else {
        return Vec::new();
    };

    records
        .iter()
        .filter(|r| r.submitted_date == target && filters.in_scope(r))
        .collect()
}

/// Sorted, deduplicated location labels.
pub fn distinct_locations(records: &[AuditRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, deduplicated section labels.
pub fn distinct_sections(records: &[AuditRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.section.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct audit dates for one location. The wildcard has none.
pub fn dates_for_location(records: &[AuditRecord], location: &Selection) -> Vec<NaiveDate> {
    let Some(location) = location.label() else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|r| r.location == location)
        .map(|r| r.submitted_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
