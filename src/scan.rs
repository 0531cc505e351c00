//! Scan parameters and the advertisement report handed over by the radio stack.

use core::time::Duration;

use crate::defaults::{SCAN_FAST_INTERVAL, SCAN_FAST_WINDOW, SCAN_TIMING_MAX, SCAN_TIMING_MIN};
use crate::error::ScanError;

/// Scan mode. Only passive scanning is supported: no scan requests are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Passive,
}

impl ScanMode {
    pub fn is_active(&self) -> bool {
        match self {
            ScanMode::Passive => false,
        }
    }
}

/// Scan configuration, fixed once scanning starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    pub mode: ScanMode,
    /// Suppress repeated reports from the same advertiser
    pub filter_duplicates: bool,
    /// Time between the start of two consecutive scan windows
    pub interval: Duration,
    /// Time the radio listens within each interval
    pub window: Duration,
}

impl ScanParams {
    /// GAP fast-scan timing with duplicate filtering.
    pub const fn fast() -> Self {
        Self {
            mode: ScanMode::Passive,
            filter_duplicates: true,
            interval: SCAN_FAST_INTERVAL,
            window: SCAN_FAST_WINDOW,
        }
    }

    /// Check the timing against what the controller accepts.
    pub fn validate(&self) -> Result<(), ScanError> {
        if !(SCAN_TIMING_MIN..=SCAN_TIMING_MAX).contains(&self.interval) {
            return Err(ScanError::IntervalOutOfRange);
        }
        if !(SCAN_TIMING_MIN..=SCAN_TIMING_MAX).contains(&self.window) {
            return Err(ScanError::WindowOutOfRange);
        }
        if self.window > self.interval {
            return Err(ScanError::WindowExceedsInterval);
        }
        Ok(())
    }

    /// Radio duty cycle in percent (window / interval).
    pub fn duty_cycle_percent(&self) -> u32 {
        let interval = self.interval.as_micros();
        if interval == 0 {
            return 0;
        }
        (self.window.as_micros() * 100 / interval) as u32
    }
}

impl Default for ScanParams {
    fn default() -> Self {
        Self::fast()
    }
}

/// Advertising event type from the HCI LE advertising report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvKind {
    AdvInd,
    AdvDirectInd,
    AdvScanInd,
    AdvNonconnInd,
    ScanRsp,
    Unknown(u8),
}

impl AdvKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvKind::AdvInd => "adv_ind",
            AdvKind::AdvDirectInd => "adv_direct_ind",
            AdvKind::AdvScanInd => "adv_scan_ind",
            AdvKind::AdvNonconnInd => "adv_nonconn_ind",
            AdvKind::ScanRsp => "scan_rsp",
            AdvKind::Unknown(_) => "unknown",
        }
    }
}

impl From<u8> for AdvKind {
    fn from(raw: u8) -> Self {
        match raw {
            0x00 => AdvKind::AdvInd,
            0x01 => AdvKind::AdvDirectInd,
            0x02 => AdvKind::AdvScanInd,
            0x03 => AdvKind::AdvNonconnInd,
            0x04 => AdvKind::ScanRsp,
            other => AdvKind::Unknown(other),
        }
    }
}

/// One received advertisement, borrowed from the radio stack for the
/// duration of a single callback.
#[derive(Debug, Clone, Copy)]
pub struct AdvReport<'a> {
    pub addr: [u8; 6],
    pub rssi: i8,
    pub kind: AdvKind,
    /// Raw AD structures
    pub data: &'a [u8],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_params_are_valid_and_passive() {
        let params = ScanParams::default();
        assert_eq!(params, ScanParams::fast());
        assert_eq!(params.validate(), Ok(()));
        assert!(!params.mode.is_active());
        assert!(params.filter_duplicates);
        assert_eq!(params.duty_cycle_percent(), 50);
    }

    #[test]
    fn rejects_interval_out_of_range() {
        let params = ScanParams {
            interval: Duration::from_millis(2),
            window: Duration::from_millis(2),
            ..ScanParams::fast()
        };
        assert_eq!(params.validate(), Err(ScanError::IntervalOutOfRange));

        let params = ScanParams {
            interval: Duration::from_secs(11),
            ..ScanParams::fast()
        };
        assert_eq!(params.validate(), Err(ScanError::IntervalOutOfRange));
    }

    #[test]
    fn rejects_window_out_of_range() {
        let params = ScanParams {
            window: Duration::from_micros(100),
            ..ScanParams::fast()
        };
        assert_eq!(params.validate(), Err(ScanError::WindowOutOfRange));
    }

    #[test]
    fn rejects_window_longer_than_interval() {
        let params = ScanParams {
            interval: Duration::from_millis(30),
            window: Duration::from_millis(60),
            ..ScanParams::fast()
        };
        assert_eq!(params.validate(), Err(ScanError::WindowExceedsInterval));
    }

    #[test]
    fn accepts_boundary_timing() {
        let params = ScanParams {
            interval: SCAN_TIMING_MAX,
            window: SCAN_TIMING_MIN,
            ..ScanParams::fast()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn adv_kind_from_raw() {
        assert_eq!(AdvKind::from(0), AdvKind::AdvInd);
        assert_eq!(AdvKind::from(3), AdvKind::AdvNonconnInd);
        assert_eq!(AdvKind::from(4).as_str(), "scan_rsp");
        assert_eq!(AdvKind::from(9), AdvKind::Unknown(9));
    }
}
