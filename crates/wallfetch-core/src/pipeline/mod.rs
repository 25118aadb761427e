//! Download pipeline: item → canonical path → existence check → fetch → rename.
//!
//! One lock covers the whole check-then-write sequence, so two items that map
//! to the same file can never both pass the existence check. Download volume
//! is a few dozen images per cycle; a per-path lock table buys nothing here.

mod stats;
mod worker;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::fetch::{FetchError, Fetcher};
use crate::item::Item;
use crate::naming::NamingError;
use crate::store::{LocalStore, StoreError};

pub use stats::{PipelineStats, StatsSnapshot};
pub use worker::ItemSender;

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Downloaded { path: PathBuf, bytes: u64 },
    AlreadyPresent { path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("cannot name item: {0}")]
    Naming(#[from] NamingError),
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// True when the failure is local disk trouble rather than network or naming.
    pub fn is_filesystem(&self) -> bool {
        match self {
            PipelineError::Store(_) => true,
            PipelineError::Fetch(e) => !e.is_network(),
            PipelineError::Naming(_) => false,
        }
    }
}

/// Owns the store, the fetcher and the single writer lock.
pub struct Pipeline {
    store: LocalStore,
    fetcher: Arc<dyn Fetcher>,
    lock: Mutex<()>,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(store: LocalStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            store,
            fetcher,
            lock: Mutex::new(()),
            stats: PipelineStats::default(),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Downloads `item` unless its canonical file already exists. Blocking.
    ///
    /// On failure nothing is left at the final path.
    pub fn process(&self, item: &Item) -> Result<Outcome, PipelineError> {
        let path = self.store.path_for(item)?;

        // The guarded section holds no invariant a panic could break.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.store.contains(&path) {
            return Ok(Outcome::AlreadyPresent { path });
        }

        let mut part = self.store.begin(&path)?;
        self.fetcher.fetch_into(&item.source_url, &mut part)?;
        let bytes = part.commit()?;
        Ok(Outcome::Downloaded { path, bytes })
    }

    /// `process` plus logging and stats; never fails.
    pub fn handle(&self, item: &Item) -> Option<Outcome> {
        match self.process(item) {
            Ok(outcome) => {
                match &outcome {
                    Outcome::Downloaded { path, bytes } => {
                        self.stats.record_download(*bytes);
                        tracing::info!(
                            region = %item.region,
                            url = %item.source_url,
                            path = %path.display(),
                            bytes,
                            "wallpaper downloaded"
                        );
                    }
                    Outcome::AlreadyPresent { path } => {
                        self.stats.record_skip();
                        tracing::debug!(
                            region = %item.region,
                            path = %path.display(),
                            "wallpaper already present"
                        );
                    }
                }
                Some(outcome)
            }
            Err(e) => {
                self.stats.record_failure();
                if let PipelineError::Fetch(fe) = &e {
                    tracing::warn!(
                        region = %item.region,
                        url = %item.source_url,
                        kind = ?fe.kind(),
                        "wallpaper download failed: {}",
                        e
                    );
                } else {
                    tracing::warn!(
                        region = %item.region,
                        url = %item.source_url,
                        filesystem = e.is_filesystem(),
                        "wallpaper skipped: {}",
                        e
                    );
                }
                None
            }
        }
    }
}
