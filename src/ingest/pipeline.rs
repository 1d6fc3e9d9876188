use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ingest::normalize::normalize_row;
use crate::ingest::row::RawRow;
use crate::record::AuditRecord;

/// Whole-batch ingestion failures. Individual bad rows are dropped silently.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("no rows found in the uploaded sheet")]
    EmptyBatch,
    #[error(
        "could not map any of {rows} rows to audit records; ensure headers such as \
         Store, Question ID, Answer, Points, Total Points and Submitted On are present"
    )]
    NoMappableRows { rows: usize },
}

/// Per-batch counters for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    pub rows: usize,
    pub accepted: usize,
    pub rejected_answer: usize,
    pub rejected_date: usize,
}

/// Normalizes every row and keeps the ones that form a dated record.
///
/// # Errors
///
/// [`IngestError::EmptyBatch`] for an empty input and
/// [`IngestError::NoMappableRows`] when no row survives normalization.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn ingest(rows: &[RawRow]) -> Result<Vec<AuditRecord>, IngestError> {
    if rows.is_empty() {
        warn!("Ingestion called with an empty batch");
        return Err(IngestError::EmptyBatch);
    }

    let mut stats = IngestStats {
        rows: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let Some(normalized) = normalize_row(row, index) else {
            stats.rejected_answer += 1;
            continue;
        };
        match normalized.into_record() {
            Some(record) => records.push(record),
            None => {
                debug!(index, "Row dropped: no valid submitted date");
                stats.rejected_date += 1;
            }
        }
    }
    stats.accepted = records.len();

    if records.is_empty() {
        warn!(
            rows = stats.rows,
            rejected_answer = stats.rejected_answer,
            rejected_date = stats.rejected_date,
            "No rows could be mapped; check the sheet headers"
        );
        return Err(IngestError::NoMappableRows { rows: stats.rows });
    }

    info!(
        rows = stats.rows,
        accepted = stats.accepted,
        rejected_answer = stats.rejected_answer,
        rejected_date = stats.rejected_date,
        "Batch ingested"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(answer: &str, date: &str) -> RawRow {
        RawRow::new()
            .with("Store", "Store A")
            .with("Section", "Cash")
            .with("Answer", answer)
            .with("Date", date)
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(ingest(&[]), Err(IngestError::EmptyBatch));
    }

    #[test]
    fn test_no_mappable_rows() {
        let rows = vec![row("N/A", "2024-01-10"), row("Good", "not a date")];
        assert_eq!(ingest(&rows), Err(IngestError::NoMappableRows { rows: 2 }));
    }

    #[test]
    fn test_bad_rows_are_dropped() {
        let rows = vec![
            row("Good", "2024-01-10"),
            row("", "2024-01-10"),
            row("Poor", ""),
            row("Excellent", "2024-01-11"),
        ];
        let records = ingest(&rows).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["audit-0", "audit-3"]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            IngestError::EmptyBatch.to_string(),
            "no rows found in the uploaded sheet"
        );
        assert!(
            IngestError::NoMappableRows { rows: 3 }
                .to_string()
                .contains("Submitted On")
        );
    }
}
