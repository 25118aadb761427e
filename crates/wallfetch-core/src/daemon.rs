//! Wires config → store → pipeline worker → scheduler.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::WallfetchConfig;
use crate::fetch::{CurlFetcher, Fetcher};
use crate::index;
use crate::pipeline::{Pipeline, StatsSnapshot};
use crate::scheduler::{CycleReport, Scheduler};
use crate::shutdown::ShutdownListener;
use crate::store::LocalStore;

/// A ready-to-run instance: destination created, worker started, scheduler idle.
pub struct Daemon {
    scheduler: Scheduler,
    pipeline: Arc<Pipeline>,
    worker: JoinHandle<()>,
}

impl Daemon {
    /// Production wiring with the curl fetcher.
    pub fn from_config(cfg: &WallfetchConfig) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(CurlFetcher::new(cfg.fetch.clone()));
        Self::new(cfg, fetcher)
    }

    /// Must be called within a tokio runtime (spawns the pipeline worker).
    pub fn new(cfg: &WallfetchConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        cfg.validate()?;
        let store = LocalStore::new(&cfg.destination_path);
        store
            .ensure_root()
            .context("cannot create destination directory")?;

        let requests = index::start_requests(&cfg.index_url, &cfg.regions, cfg.batch_size)
            .context("cannot build index URLs")?;

        let pipeline = Arc::new(Pipeline::new(store, Arc::clone(&fetcher)));
        let (items, worker) = Arc::clone(&pipeline).spawn();
        let scheduler = Scheduler::new(requests, fetcher, items, cfg.poll_interval());

        tracing::info!(
            destination = %cfg.destination_path.display(),
            regions = cfg.regions.len(),
            "wallfetch ready"
        );
        Ok(Self {
            scheduler,
            pipeline,
            worker,
        })
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.pipeline.stats()
    }

    /// Runs cycles until `shutdown` fires. In-flight downloads are not awaited.
    pub async fn run(self, shutdown: ShutdownListener) -> Result<u64> {
        let launched = self.scheduler.run(shutdown).await?;
        Ok(launched)
    }

    /// One cycle, then waits for the pipeline to finish every queued item.
    pub async fn run_once(self) -> Result<(CycleReport, StatsSnapshot)> {
        let Daemon {
            scheduler,
            pipeline,
            worker,
        } = self;
        let report = scheduler.run_once().await;
        // Last sender goes with the scheduler; the worker then drains and exits.
        drop(scheduler);
        worker.await.context("pipeline worker join")?;
        Ok((report, pipeline.stats()))
    }
}
