// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::process::RawTable;
use crate::report::ReportId;

pub mod pdf;
pub mod text_table;
pub mod urls;

/// Source of raw tables for one report identifier.
///
/// Returns an empty list when the document has not been published; any
/// other failure is an error.
#[allow(async_fn_in_trait)]
pub trait ReportFetcher {
    async fn fetch(&self, id: &ReportId) -> Result<Vec<RawTable>>;
}

/// Fetches the published PDF over HTTP and extracts its tables.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl ReportFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self, id), fields(id = %id))]
    async fn fetch(&self, id: &ReportId) -> Result<Vec<RawTable>> {
        let url = urls::document_url(&self.base_url, id)?;
        let Some(bytes) = pdf::download_pdf(&self.client, &url).await? else {
            debug!("no document");
            return Ok(Vec::new());
        };
        let size = bytes.len();
        let tables = pdf::tables_from_pdf(bytes)
            .await
            .with_context(|| format!("extracting tables from {}", url))?;
        info!(bytes = size, tables = tables.len(), "extracted");
        Ok(tables)
    }
}
