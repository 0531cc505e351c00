//! Scan counters shared between the radio callback and the worker.

use core::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Default)]
pub struct ScanStats {
    reports: AtomicU32,
    duplicates: AtomicU32,
    named: AtomicU32,
    with_manufacturer: AtomicU32,
}

/// Point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Every report delivered by the radio, duplicates included
    pub reports: u32,
    pub duplicates: u32,
    pub named: u32,
    pub with_manufacturer: u32,
}

impl ScanStats {
    pub const fn new() -> Self {
        Self {
            reports: AtomicU32::new(0),
            duplicates: AtomicU32::new(0),
            named: AtomicU32::new(0),
            with_manufacturer: AtomicU32::new(0),
        }
    }

    pub(crate) fn record_report(&self) {
        self.reports.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fields(&self, named: bool, with_manufacturer: bool) {
        if named {
            self.named.fetch_add(1, Ordering::Relaxed);
        }
        if with_manufacturer {
            self.with_manufacturer.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reports: self.reports.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            named: self.named.load(Ordering::Relaxed),
            with_manufacturer: self.with_manufacturer.load(Ordering::Relaxed),
        }
    }
}
