//! Spreadsheet ingestion.
//!
//! Raw rows coming out of a sheet parser are resolved against a static
//! header alias table, gated on a recognised rating answer, given a calendar
//! date, and swapped into the [`RecordStore`] as one batch.

pub mod columns;
pub mod dates;
pub mod normalize;
pub mod pipeline;
pub mod row;
pub mod store;

pub use pipeline::{IngestError, ingest};
pub use row::{CellValue, RawRow};
pub use store::{CommitOutcome, LoadTicket, RecordStore};
