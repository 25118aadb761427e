//! Cycle scheduler.
//!
//! Launches a cycle immediately, then one per interval tick, until shutdown.
//! Cycles are detached tasks and may overlap; the pipeline's existence check
//! is what keeps overlapping cycles from duplicating downloads.

mod cycle;
mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::fetch::Fetcher;
use crate::item::StartRequest;
use crate::pipeline::ItemSender;
use crate::shutdown::ShutdownListener;

pub use cycle::{fetch_region, run_cycle, CycleReport, RegionError};
pub use state::SchedulerState;

use state::StateCell;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler already started (state {0:?})")]
    AlreadyStarted(SchedulerState),
}

pub struct Scheduler {
    requests: Arc<[StartRequest]>,
    fetcher: Arc<dyn Fetcher>,
    items: ItemSender,
    interval: Duration,
    state: StateCell,
    cycles: AtomicU64,
}

impl Scheduler {
    pub fn new(
        requests: Vec<StartRequest>,
        fetcher: Arc<dyn Fetcher>,
        items: ItemSender,
        interval: Duration,
    ) -> Self {
        Self {
            requests: requests.into(),
            fetcher,
            items,
            // tokio's interval panics on zero.
            interval: interval.max(Duration::from_millis(1)),
            state: StateCell::new(),
            cycles: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state.get()
    }

    pub fn requests(&self) -> &[StartRequest] {
        &self.requests
    }

    /// Spawns the next cycle without waiting for it.
    fn launch_cycle(&self) -> JoinHandle<CycleReport> {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(cycle, regions = self.requests.len(), "launching cycle");
        tokio::spawn(run_cycle(
            cycle,
            Arc::clone(&self.requests),
            Arc::clone(&self.fetcher),
            self.items.clone(),
        ))
    }

    /// Runs a single cycle to completion, outside the timer loop. Does not
    /// change the scheduler state.
    pub async fn run_once(&self) -> CycleReport {
        match self.launch_cycle().await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("cycle task: {}", e);
                CycleReport::default()
            }
        }
    }

    /// Timer loop. Returns the number of cycles launched once `shutdown` fires.
    ///
    /// Cycles already launched keep running in the background; none are
    /// launched after cancellation is observed, even if a tick is due.
    pub async fn run(&self, mut shutdown: ShutdownListener) -> Result<u64, SchedulerError> {
        self.state
            .transition(SchedulerState::Idle, SchedulerState::Running)
            .map_err(SchedulerError::AlreadyStarted)?;
        tracing::info!(
            regions = self.requests.len(),
            interval_secs = self.interval.as_secs_f64(),
            "scheduler running"
        );

        // First tick completes immediately: that is the start-up cycle.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut launched = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    drop(self.launch_cycle());
                    launched += 1;
                }
            }
        }

        // Running -> Stopped cannot fail: only this call left Idle.
        let _ = self
            .state
            .transition(SchedulerState::Running, SchedulerState::Stopped);
        tracing::info!(cycles = launched, "scheduler stopped");
        Ok(launched)
    }
}
