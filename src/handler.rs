//! Scan report handler: the capability registered with the radio stack.
//!
//! Called synchronously from the BLE stack runner once per advertisement.
//! Must not block: it parses into stack-local storage, bumps counters and
//! hands one message to the sink.

use core::cell::RefCell;

use log::Level;

use crate::defaults::DEDUP_CAPACITY;
use crate::dedup::DuplicateFilter;
use crate::protocol::{format_hex, format_mac, DeviceMessage, HexString, MacString};
use crate::record::ParsedRecord;
use crate::scan::{AdvReport, ScanParams};
use crate::sink::Sink;
use crate::stats::ScanStats;

/// Receives advertisement reports from the radio stack.
pub trait ReportHandler {
    fn on_report(&self, report: &AdvReport<'_>);
}

pub struct ScanReportHandler<'a, S, const D: usize = DEDUP_CAPACITY> {
    sink: S,
    stats: &'a ScanStats,
    dedup: Option<RefCell<DuplicateFilter<D>>>,
}

impl<'a, S: Sink, const D: usize> ScanReportHandler<'a, S, D> {
    pub fn new(params: &ScanParams, sink: S, stats: &'a ScanStats) -> Self {
        Self {
            sink,
            stats,
            dedup: params
                .filter_duplicates
                .then(|| RefCell::new(DuplicateFilter::new())),
        }
    }

    pub fn stats(&self) -> &'a ScanStats {
        self.stats
    }

    /// Returns `false` for an address already reported.
    fn is_new(&self, addr: &[u8; 6]) -> bool {
        match &self.dedup {
            // A report delivered while another is still being handled skips
            // suppression rather than panic on the borrow.
            Some(seen) => match seen.try_borrow_mut() {
                Ok(mut seen) => seen.observe(addr),
                Err(_) => true,
            },
            None => true,
        }
    }
}

impl<S: Sink, const D: usize> ReportHandler for ScanReportHandler<'_, S, D> {
    fn on_report(&self, report: &AdvReport<'_>) {
        self.stats.record_report();

        if !self.is_new(&report.addr) {
            self.stats.record_duplicate();
            return;
        }

        let record: ParsedRecord = ParsedRecord::parse(report.data);
        self.stats
            .record_fields(!record.name.is_empty(), !record.manufacturer_data.is_empty());

        let mut mac = MacString::new();
        format_mac(&report.addr, &mut mac);

        let mut mfr = HexString::new();
        format_hex(&record.manufacturer_data, &mut mfr);

        let msg = DeviceMessage::Advertisement {
            mac: &mac,
            rssi: report.rssi,
            kind: report.kind.as_str(),
            name: record.name_str(),
            mfr: (!mfr.is_empty()).then_some(&mfr),
            cid: record.company_id(),
        };
        self.sink.emit(Level::Info, &msg);
    }
}
