mod basic;
mod client;
pub mod sheets;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Fetches the body of `url`, failing on a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!(
            "failed to fetch {url} (status {status}); ensure the sheet is public (anyone with the link)"
        );
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Returns `true` when `source` names a remote sheet rather than a local file.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http")
}

/// Loads sheet data from a local file path or fetches it over HTTP.
///
/// Google Sheets links are fetched through their CSV export.
#[tracing::instrument(skip(client), fields(source = %source))]
pub async fn load_bytes<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        let url = sheets::export_url(source);
        debug!(url = %url, "Fetching sheet");
        fetch_bytes(client, &url).await?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };
    debug!(bytes = bytes.len(), "Sheet bytes loaded");
    Ok(bytes)
}
