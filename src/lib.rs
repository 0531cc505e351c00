//! adscan library, passive BLE advertisement scanning core.
//!
//! Everything that does not touch the radio lives here and is testable on any
//! host with `cargo test`. The firmware binary (`src/main.rs`, `firmware`
//! feature) is a thin consumer that wires the BLE host stack, the timer and
//! the executor to these pieces.
//!
//! - `adv`, `record`: AD structure walker and the bounded parsed record
//! - `scan`, `handler`, `dedup`: scan parameters and the per-report handler
//! - `deferred`, `periodic`, `status`: timer → work queue handoff
//! - `protocol`, `sink`, `stats`: what gets reported and where it goes

#![cfg_attr(not(test), no_std)]

pub mod adv;
pub mod dedup;
pub mod deferred;
pub mod defaults;
pub mod error;
pub mod handler;
pub mod periodic;
pub mod protocol;
pub mod record;
pub mod scan;
pub mod sink;
pub mod stats;
pub mod status;

pub use error::ScanError;
pub use record::{parse, ParsedRecord};
