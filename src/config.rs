use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

use crate::fetch::urls::DEFAULT_BASE_URL;
use crate::report::ReportType;

/// Backfill the health department's daily COVID-19 summary PDFs into CSV series.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Directory holding one normalized CSV per published document
    #[arg(long, env = "DOH_CACHE_DIR", default_value = "self_data/nyc")]
    pub cache_dir: PathBuf,

    /// Directory receiving `<report>.csv` series
    #[arg(long, env = "DOH_OUT_DIR", default_value = "self_data")]
    pub out_dir: PathBuf,

    /// Prefix of every document URL
    #[arg(long, env = "DOH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Last day to backfill (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Report types to process; defaults to all
    #[arg(long = "report", value_enum)]
    pub reports: Vec<ReportType>,

    /// Also write `<report>.parquet`
    #[arg(long)]
    pub parquet: bool,

    /// Assemble from the cache only, without fetching
    #[arg(long)]
    pub offline: bool,
}

/// Resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub cache_dir: PathBuf,
    pub out_dir: PathBuf,
    pub base_url: String,
    pub until: NaiveDate,
    pub reports: Vec<ReportType>,
    pub parquet: bool,
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("self_data/nyc"),
            out_dir: PathBuf::from("self_data"),
            base_url: DEFAULT_BASE_URL.to_string(),
            until: Local::now().date_naive(),
            reports: ReportType::ALL.to_vec(),
            parquet: false,
            offline: false,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut reports = if args.reports.is_empty() {
            ReportType::ALL.to_vec()
        } else {
            args.reports
        };
        reports.sort();
        reports.dedup();

        Self {
            cache_dir: args.cache_dir,
            out_dir: args.out_dir,
            base_url: args.base_url,
            until: args.until.unwrap_or_else(|| Local::now().date_naive()),
            reports,
            parquet: args.parquet,
            offline: args.offline,
        }
    }
}
