use anyhow::Result;
use clap::Parser;
use dohscraper::{
    config::{Args, Config},
    driver,
};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) resolve configuration ────────────────────────────────────
    let config = Config::from(Args::parse());
    info!(
        cache_dir = %config.cache_dir.display(),
        out_dir = %config.out_dir.display(),
        until = %config.until,
        reports = ?config.reports,
        offline = config.offline,
        "startup"
    );

    // ─── 3) backfill, then assemble and write series ─────────────────
    let start = Instant::now();
    let stats = driver::run(&config).await?;
    info!(
        cached = stats.cached,
        fetched = stats.fetched,
        missing = stats.missing,
        elapsed = ?start.elapsed(),
        "all done"
    );
    Ok(())
}
