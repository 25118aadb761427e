//! `wallfetch once` – one cycle, then exit once its downloads are done.

use anyhow::Result;
use wallfetch_core::config::WallfetchConfig;
use wallfetch_core::daemon::Daemon;

pub async fn run_once(cfg: &WallfetchConfig) -> Result<()> {
    let (report, stats) = Daemon::from_config(cfg)?.run_once().await?;
    println!(
        "regions: {} ok, {} failed; items: {} queued, {} downloaded, {} already present, {} failed",
        report.regions_ok,
        report.regions_failed,
        report.items_queued,
        stats.downloaded,
        stats.skipped,
        stats.failed
    );
    Ok(())
}
