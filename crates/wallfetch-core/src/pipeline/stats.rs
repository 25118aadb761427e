//! Counters for processed items.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals since the pipeline was created.
#[derive(Debug, Default)]
pub struct PipelineStats {
    downloaded: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    bytes: AtomicU64,
}

/// Point-in-time copy of `PipelineStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Items fetched and written.
    pub downloaded: u64,
    /// Items whose file already existed.
    pub skipped: u64,
    /// Items abandoned on a naming, fetch or filesystem error.
    pub failed: u64,
    /// Bytes written by successful downloads.
    pub bytes: u64,
}

impl StatsSnapshot {
    pub fn processed(&self) -> u64 {
        self.downloaded + self.skipped + self.failed
    }
}

impl PipelineStats {
    pub(super) fn record_download(&self, bytes: u64) {
        self.downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(super) fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
        }
    }
}
