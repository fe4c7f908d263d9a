// src/fetch/urls.rs
use anyhow::{Context, Result};
use url::Url;

use crate::report::ReportId;

/// Every daily summary lives under this prefix as `<prefix><stem>.pdf`.
pub const DEFAULT_BASE_URL: &str =
    "https://www1.nyc.gov/assets/doh/downloads/pdf/imm/covid-19-daily-data-summary-";

/// URL of the PDF for `id`.
pub fn document_url(base: &str, id: &ReportId) -> Result<Url> {
    let raw = format!("{}{}.pdf", base, id.stem());
    Url::parse(&raw).with_context(|| format!("parsing document URL {}", raw))
}
