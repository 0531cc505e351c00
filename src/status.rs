//! Periodic status report: the deferred body run by the worker.

use core::sync::atomic::{AtomicU32, Ordering};

use log::Level;

use crate::deferred::Work;
use crate::protocol::{DeviceMessage, VERSION};
use crate::sink::Sink;
use crate::stats::ScanStats;

pub struct StatusReport<'a, S> {
    sink: S,
    stats: &'a ScanStats,
    seq: AtomicU32,
    /// Milliseconds since boot
    uptime_ms: fn() -> u64,
}

impl<'a, S: Sink> StatusReport<'a, S> {
    pub const fn new(sink: S, stats: &'a ScanStats, uptime_ms: fn() -> u64) -> Self {
        Self {
            sink,
            stats,
            seq: AtomicU32::new(0),
            uptime_ms,
        }
    }

    /// Emit one status message. The first one carries `seq` 1.
    pub fn emit(&self) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let snap = self.stats.snapshot();
        let msg = DeviceMessage::Status {
            seq,
            uptime: ((self.uptime_ms)() / 1000) as u32,
            reports: snap.reports,
            duplicates: snap.duplicates,
            named: snap.named,
            with_mfr: snap.with_manufacturer,
            version: VERSION,
        };
        self.sink.emit(Level::Info, &msg);
    }
}

impl<S: Sink + Sync> Work for StatusReport<'_, S> {
    fn run(&self) {
        self.emit();
    }
}
