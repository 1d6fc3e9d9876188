//! Output formatting and persistence for dashboard results.
//!
//! Supports pretty-printing, JSON rendering, and canonical-record CSV export.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::grade::PerformanceRating;
use crate::analyzers::utility::round_half_up;
use crate::record::AuditRecord;
use csv::WriterBuilder;
use std::fs::File;

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Serializes `value` as pretty-printed JSON.
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `DD-MM-YYYY`, the format dates are shown in.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// A record as shown in listings: rounded score and display date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView<'a> {
    pub id: &'a str,
    pub location: &'a str,
    pub section: &'a str,
    pub question: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub score: f64,
    pub rating: PerformanceRating,
    pub date: String,
}

impl<'a> From<&'a AuditRecord> for RecordView<'a> {
    fn from(r: &'a AuditRecord) -> Self {
        Self {
            id: &r.id,
            location: &r.location,
            section: &r.section,
            question: r.question_text.as_deref(),
            comment: r.comment_text(),
            score: round_half_up(r.percentage()),
            rating: r.rating(),
            date: format_display_date(r.submitted_date),
        }
    }
}

/// Writes canonical records to a new CSV file at `path`, header first.
pub fn write_records<'a, I>(path: &str, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a AuditRecord>,
{
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    let mut count = 0;
    for record in records {
        writer.serialize(record)?;
        count += 1;
    }
    writer.flush()?;

    info!(path, records = count, "Records exported");
    Ok(count)
}
