//! Periodic trigger for deferred work.
//!
//! The timer-expiry context does exactly one thing: submit the work item.
//! Everything else happens when the worker context drains the queue.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use core::time::Duration;

use crate::deferred::{Submit, WorkItem, WorkQueue, WorkState};
use crate::defaults::{WORK_INITIAL_DELAY, WORK_PERIOD};

/// First expiry after `initial_delay`, then one every `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periodic {
    pub initial_delay: Duration,
    pub period: Duration,
}

impl Periodic {
    pub const fn new(initial_delay: Duration, period: Duration) -> Self {
        Self {
            initial_delay,
            period,
        }
    }

    /// Offset from start of the `n`-th expiry (0-based), saturating.
    pub fn deadline(&self, n: u32) -> Duration {
        self.period
            .checked_mul(n)
            .and_then(|d| d.checked_add(self.initial_delay))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for Periodic {
    fn default() -> Self {
        Self::new(WORK_INITIAL_DELAY, WORK_PERIOD)
    }
}

/// A periodic timer bound to one work item on a work queue.
///
/// Lifecycle: created disarmed, [`start`](Self::start) arms it,
/// [`stop`](Self::stop) disarms it and drains the queue.
pub struct PeriodicWorker<'q, 'a, const N: usize> {
    schedule: Periodic,
    item: &'a WorkItem<'a>,
    queue: &'q WorkQueue<'a, N>,
    armed: AtomicBool,
    expiries: AtomicU32,
}

impl<'q, 'a, const N: usize> PeriodicWorker<'q, 'a, N> {
    pub const fn new(schedule: Periodic, item: &'a WorkItem<'a>, queue: &'q WorkQueue<'a, N>) -> Self {
        Self {
            schedule,
            item,
            queue,
            armed: AtomicBool::new(false),
            expiries: AtomicU32::new(0),
        }
    }

    pub fn schedule(&self) -> Periodic {
        self.schedule
    }

    pub fn queue(&self) -> &'q WorkQueue<'a, N> {
        self.queue
    }

    /// Arm the timer. Returns `false` if it was already armed.
    pub fn start(&self) -> bool {
        let started = !self.armed.swap(true, Ordering::AcqRel);
        if started {
            log::info!(
                "Periodic work armed: first in {} ms, every {} ms",
                self.schedule.initial_delay.as_millis(),
                self.schedule.period.as_millis()
            );
        }
        started
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Timer-expiry action. Submits the work item and nothing else.
    ///
    /// Returns `None` once the timer has been stopped.
    pub fn on_expiry(&self) -> Option<Submit> {
        if !self.is_armed() {
            return None;
        }
        self.expiries.fetch_add(1, Ordering::Relaxed);
        Some(self.queue.submit(self.item))
    }

    /// Disarm the timer. Safe from any context.
    ///
    /// Work already queued stays queued for the worker context to run.
    /// Returns `false` if the timer was not armed.
    pub fn disarm(&self) -> bool {
        let was_armed = self.armed.swap(false, Ordering::AcqRel);
        if was_armed {
            log::info!("Periodic work disarmed after {} expiries", self.expiries());
        }
        was_armed
    }

    /// Disarm the timer and run whatever is still queued.
    ///
    /// The drained bodies run on the caller, so this belongs in the worker
    /// context. Returns how many bodies ran while draining.
    pub fn stop(&self) -> usize {
        self.disarm();
        let drained = self.queue.run_pending();
        log::info!("Periodic work stopped, {} drained", drained);
        drained
    }

    pub fn state(&self) -> WorkState {
        self.item.state()
    }

    pub fn expiries(&self) -> u32 {
        self.expiries.load(Ordering::Relaxed)
    }
}
