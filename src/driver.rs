// src/driver.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use std::{fs, path::PathBuf};
use tracing::{debug, info, instrument};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::fetch::{HttpFetcher, ReportFetcher};
use crate::process::{normalize, CanonicalTable};
use crate::report::{Part, ReportId, ReportType};
use crate::series::{assemble, write_csv, write_parquet};

/// Inclusive day iterator.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

pub fn date_range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange {
        next: Some(start),
        end,
    }
}

/// Every identifier of `report` from its first publication through `until`,
/// both parts of each day.
pub fn identifiers(report: ReportType, until: NaiveDate) -> impl Iterator<Item = ReportId> {
    date_range(report.first_published(), until).flat_map(move |date| {
        Part::BOTH
            .into_iter()
            .map(move |part| ReportId::new(report, date, part))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Cached(CanonicalTable),
    Fetched(CanonicalTable),
    /// Document not published; nothing was written.
    Missing,
}

impl Outcome {
    pub fn table(self) -> Option<CanonicalTable> {
        match self {
            Outcome::Cached(t) | Outcome::Fetched(t) => Some(t),
            Outcome::Missing => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackfillStats {
    pub cached: usize,
    pub fetched: usize,
    pub missing: usize,
}

impl BackfillStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Cached(_) => self.cached += 1,
            Outcome::Fetched(_) => self.fetched += 1,
            Outcome::Missing => self.missing += 1,
        }
    }
}

/// Read `id` from the cache, or fetch, normalize and cache it.
///
/// A table that fails to normalize is never written.
pub async fn get_or_fetch<F: ReportFetcher>(
    id: &ReportId,
    cache: &CacheStore,
    fetcher: &F,
) -> Result<Outcome> {
    if cache.exists(id) {
        let table = cache
            .read(id)
            .with_context(|| format!("reading cached {}", id))?;
        return Ok(Outcome::Cached(table));
    }

    let tables = fetcher
        .fetch(id)
        .await
        .with_context(|| format!("fetching {}", id))?;
    if tables.is_empty() {
        return Ok(Outcome::Missing);
    }

    let normalized =
        normalize(&tables, id.report).with_context(|| format!("normalizing {}", id))?;
    cache.write(id, &normalized.table)?;
    info!(id = %id, rows = normalized.table.len(), total = ?normalized.reported_total, "cached");
    Ok(Outcome::Fetched(normalized.table))
}

/// Walk every identifier of every configured report, fetching what the cache lacks.
#[instrument(level = "info", skip(cache, fetcher))]
pub async fn backfill<F: ReportFetcher>(
    reports: &[ReportType],
    until: NaiveDate,
    cache: &CacheStore,
    fetcher: &F,
) -> Result<BackfillStats> {
    let mut stats = BackfillStats::default();
    for &report in reports {
        let mut per_report = BackfillStats::default();
        for id in identifiers(report, until) {
            debug!(id = %id, "doing");
            let outcome = get_or_fetch(&id, cache, fetcher).await?;
            per_report.record(&outcome);
            stats.record(&outcome);
        }
        info!(
            %report,
            cached = per_report.cached,
            fetched = per_report.fetched,
            missing = per_report.missing,
            "backfill done"
        );
    }
    Ok(stats)
}

/// Assemble the cached tables of `report` and write `<report>.csv`
/// (and `<report>.parquet` when asked). Returns the written paths.
pub fn write_series(
    report: ReportType,
    cache: &CacheStore,
    out_dir: &std::path::Path,
    parquet: bool,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let entries = cache.load_all(report)?;
    info!(%report, entries = entries.len(), "assembling series");
    let series = assemble(entries);

    let mut written = Vec::new();
    let csv_path = out_dir.join(format!("{}.csv", report));
    write_csv(&series, &csv_path)?;
    written.push(csv_path);
    if parquet {
        let parquet_path = out_dir.join(format!("{}.parquet", report));
        write_parquet(&series, &parquet_path)?;
        written.push(parquet_path);
    }
    Ok(written)
}

/// Backfill with `fetcher` (unless offline), then write every configured series.
pub async fn run_with<F: ReportFetcher>(config: &Config, fetcher: &F) -> Result<BackfillStats> {
    let cache = CacheStore::new(&config.cache_dir)?;
    let stats = if config.offline {
        info!("offline; skipping backfill");
        BackfillStats::default()
    } else {
        backfill(&config.reports, config.until, &cache, fetcher).await?
    };
    for &report in &config.reports {
        write_series(report, &cache, &config.out_dir, config.parquet)?;
    }
    Ok(stats)
}

pub async fn run(config: &Config) -> Result<BackfillStats> {
    let fetcher = HttpFetcher::new(Client::new(), config.base_url.clone());
    run_with(config, &fetcher).await
}
