//! Scheduler lifecycle: `Idle --run--> Running --shutdown--> Stopped`.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, no cycle launched yet.
    Idle,
    /// Timer armed; cycles are being launched.
    Running,
    /// Shutdown observed; no further cycles. Terminal.
    Stopped,
}

impl SchedulerState {
    fn to_u8(self) -> u8 {
        match self {
            SchedulerState::Idle => 0,
            SchedulerState::Running => 1,
            SchedulerState::Stopped => 2,
        }
    }

    fn can_become(self, next: SchedulerState) -> bool {
        matches!(
            (self, next),
            (SchedulerState::Idle, SchedulerState::Running)
                | (SchedulerState::Running, SchedulerState::Stopped)
        )
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => SchedulerState::Idle,
            1 => SchedulerState::Running,
            _ => SchedulerState::Stopped,
        }
    }
}

/// Atomic cell holding a `SchedulerState`.
#[derive(Debug)]
pub(super) struct StateCell(AtomicU8);

impl StateCell {
    pub(super) fn new() -> Self {
        Self(AtomicU8::new(SchedulerState::Idle.to_u8()))
    }

    pub(super) fn get(&self) -> SchedulerState {
        SchedulerState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move `from` → `to`. Only `Idle → Running` and `Running → Stopped` are
    /// accepted; anything else returns the actual state.
    pub(super) fn transition(
        &self,
        from: SchedulerState,
        to: SchedulerState,
    ) -> Result<(), SchedulerState> {
        if !from.can_become(to) {
            return Err(self.get());
        }
        self.0
            .compare_exchange(from.to_u8(), to.to_u8(), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(SchedulerState::from_u8)
    }
}
