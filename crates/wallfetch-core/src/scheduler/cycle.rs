//! One cycle: fetch every region's index, extract items, queue them.

use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

use crate::fetch::{FetchError, Fetcher};
use crate::index::{self, ExtractError};
use crate::item::{Item, StartRequest};
use crate::pipeline::ItemSender;

/// Summary of one cycle's index phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub regions_ok: usize,
    pub regions_failed: usize,
    /// Items handed to the pipeline (not necessarily downloaded yet).
    pub items_queued: usize,
}

/// Why a region produced no items this cycle.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("index fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("index parse failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("region task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Fetch and parse one region's index. Blocking.
pub fn fetch_region(req: &StartRequest, fetcher: &dyn Fetcher) -> Result<Vec<Item>, RegionError> {
    let fetched = fetcher.fetch(&req.url)?;
    // Resolve against the served URL unless a redirect dropped the region tag.
    let base: &Url = if has_region(&fetched.url) {
        &fetched.url
    } else {
        &req.url
    };
    Ok(index::extract(&fetched.body, base)?)
}

fn has_region(url: &Url) -> bool {
    url.query_pairs().any(|(k, _)| k == index::REGION_PARAM)
}

/// Runs all regions concurrently and pushes their items to `items`.
/// A failing region is logged and does not affect the others.
pub async fn run_cycle(
    cycle: u64,
    requests: Arc<[StartRequest]>,
    fetcher: Arc<dyn Fetcher>,
    items: ItemSender,
) -> CycleReport {
    let mut regions = JoinSet::new();
    for req in requests.iter().cloned() {
        let fetcher = Arc::clone(&fetcher);
        regions.spawn_blocking(move || {
            let found = fetch_region(&req, fetcher.as_ref());
            (req.region, found)
        });
    }

    let mut report = CycleReport {
        cycle,
        ..CycleReport::default()
    };
    while let Some(joined) = regions.join_next().await {
        let (region, found) = match joined {
            Ok((region, found)) => (region, found),
            Err(e) => (String::from("?"), Err(RegionError::from(e))),
        };
        match found {
            Ok(found) => {
                report.regions_ok += 1;
                tracing::debug!(cycle, region = %region, items = found.len(), "index fetched");
                for item in found {
                    if items.send(item).is_err() {
                        tracing::debug!(cycle, "pipeline closed, dropping remaining items");
                        break;
                    }
                    report.items_queued += 1;
                }
            }
            Err(e) => {
                report.regions_failed += 1;
                tracing::warn!(cycle, region = %region, "region skipped this cycle: {}", e);
            }
        }
    }

    tracing::info!(
        cycle,
        regions_ok = report.regions_ok,
        regions_failed = report.regions_failed,
        items = report.items_queued,
        "cycle index phase done"
    );
    report
}
