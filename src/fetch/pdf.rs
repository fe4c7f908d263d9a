use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::text_table::extract_tables;
use crate::process::RawTable;

/// Statuses meaning the document has not been published.
fn is_missing(status: StatusCode) -> bool {
    matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE)
}

/// Download the PDF at `url`. `Ok(None)` when the server says it does not
/// exist; any other failure is an error.
pub async fn download_pdf(client: &Client, url: &Url) -> Result<Option<Vec<u8>>> {
    let resp = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?;

    if is_missing(resp.status()) {
        debug!(%url, status = %resp.status(), "document not published");
        return Ok(None);
    }
    let bytes = resp
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .bytes()
        .await
        .with_context(|| format!("reading body from {}", url))?;
    Ok(Some(bytes.to_vec()))
}

/// Extract the text of a PDF on the blocking pool and split it into tables.
pub async fn tables_from_pdf(bytes: Vec<u8>) -> Result<Vec<RawTable>> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .context("PDF extraction task failed")?
        .map_err(|e| anyhow!("PDF text extraction failed: {:?}", e))?;
    Ok(extract_tables(&text))
}
