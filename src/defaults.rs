//! Compile-time defaults for parsing, scanning and deferred work.

use core::time::Duration;

/// Largest AD value a legacy advertisement can carry: 31 bytes of payload
/// minus one length byte and one type byte.
pub const MAX_AD_VALUE_LEN: usize = 29;

/// Capacity of the parsed device name.
pub const NAME_CAPACITY: usize = MAX_AD_VALUE_LEN;

/// Capacity of the parsed manufacturer-specific data (company ID included).
pub const MANUFACTURER_CAPACITY: usize = MAX_AD_VALUE_LEN;

/// Number of recently seen addresses remembered for duplicate suppression.
pub const DEDUP_CAPACITY: usize = 32;

/// Maximum number of distinct work items waiting on the work queue.
pub const WORK_QUEUE_DEPTH: usize = 4;

/// GAP fast scan interval (TGAP(scan_fast_interval), 0x0060 × 0.625 ms).
pub const SCAN_FAST_INTERVAL: Duration = Duration::from_millis(60);

/// GAP fast scan window (TGAP(scan_fast_window), 0x0030 × 0.625 ms).
pub const SCAN_FAST_WINDOW: Duration = Duration::from_millis(30);

/// Shortest interval or window the controller accepts (0x0004 × 0.625 ms).
pub const SCAN_TIMING_MIN: Duration = Duration::from_micros(2_500);

/// Longest interval or window the controller accepts (0x4000 × 0.625 ms).
pub const SCAN_TIMING_MAX: Duration = Duration::from_millis(10_240);

/// Delay before the first periodic work submission.
pub const WORK_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Period between work submissions.
pub const WORK_PERIOD: Duration = Duration::from_millis(1000);
