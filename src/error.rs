//! Scan start-up errors.
//!
//! Only start-up can fail. Per-packet problems (malformed AD data, a busy
//! work queue) are absorbed where they happen and never surface here.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// Scan interval outside 2.5 ms ..= 10.24 s.
    IntervalOutOfRange,
    /// Scan window outside 2.5 ms ..= 10.24 s.
    WindowOutOfRange,
    /// Scan window longer than the scan interval.
    WindowExceedsInterval,
    /// The BLE controller could not be brought up.
    StackUnavailable,
    /// The host stack refused to start scanning.
    StartFailed,
}

impl ScanError {
    /// Stable tag used in `scan_error` messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanError::IntervalOutOfRange => "interval_out_of_range",
            ScanError::WindowOutOfRange => "window_out_of_range",
            ScanError::WindowExceedsInterval => "window_exceeds_interval",
            ScanError::StackUnavailable => "stack_unavailable",
            ScanError::StartFailed => "start_failed",
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ScanError::IntervalOutOfRange => "scan interval out of range",
            ScanError::WindowOutOfRange => "scan window out of range",
            ScanError::WindowExceedsInterval => "scan window exceeds scan interval",
            ScanError::StackUnavailable => "BLE controller unavailable",
            ScanError::StartFailed => "BLE scan failed to start",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for ScanError {}
