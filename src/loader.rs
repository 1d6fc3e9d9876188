//! Sheet sync: fetch, parse and swap a new record collection into the store.

use anyhow::Result;
use tracing::info;

use crate::fetch::{HttpClient, load_bytes};
use crate::ingest::store::{CommitOutcome, RecordStore};
use crate::parser::parse_rows;

/// Loads `source` (file path or URL) into `store`.
///
/// The load ticket is taken before the fetch starts, so if another sync is
/// started while this one is in flight, this one's result is discarded.
///
/// # Errors
///
/// Fetch and parse failures, and [`crate::ingest::IngestError`] when the
/// sheet has no usable rows. The store keeps its previous records on error.
#[tracing::instrument(skip(client, store))]
pub async fn sync_source<C: HttpClient>(
    client: &C,
    store: &RecordStore,
    source: &str,
) -> Result<CommitOutcome> {
    let ticket = store.begin_load();
    let bytes = load_bytes(client, source).await?;
    let rows = parse_rows(&bytes)?;
    let outcome = store.commit(ticket, &rows)?;
    info!(?outcome, "Sheet sync finished");
    Ok(outcome)
}
