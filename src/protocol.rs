/// JSON messages emitted by the scanner to its observability sink.
///
/// Every message serializes to one line of JSON with a `type` tag.
/// Uses `heapless` types for no_std/no-alloc operation.
use core::fmt::Write;

use heapless::String;
use serde::Serialize;

use crate::defaults::{MANUFACTURER_CAPACITY, NAME_CAPACITY};

/// Maximum length for MAC address strings ("AA:BB:CC:DD:EE:FF")
pub type MacString = String<18>;

/// Lowercase hex of the manufacturer data, two characters per byte
pub type HexString = String<{ MANUFACTURER_CAPACITY * 2 }>;

/// Messages sent from the scanner to the sink
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum DeviceMessage<'a> {
    /// One parsed advertisement
    #[serde(rename = "adv")]
    Advertisement {
        mac: &'a MacString,
        rssi: i8,
        /// Advertising event type: "adv_ind", "adv_nonconn_ind", ...
        kind: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mfr: Option<&'a HexString>,
        /// Company ID from the first two manufacturer bytes
        #[serde(skip_serializing_if = "Option::is_none")]
        cid: Option<u16>,
    },
    /// Scanning started
    #[serde(rename = "scan")]
    ScanStarted {
        interval_ms: u32,
        window_ms: u32,
        dedup: bool,
    },
    /// Scanning could not start
    #[serde(rename = "scan_error")]
    ScanFailed { reason: &'static str },
    /// Periodic status from the deferred worker
    #[serde(rename = "status")]
    Status {
        /// Status sequence number, starting at 1
        seq: u32,
        /// Uptime in seconds
        uptime: u32,
        reports: u32,
        duplicates: u32,
        /// Reports that carried a device name
        named: u32,
        /// Reports that carried manufacturer data
        with_mfr: u32,
        /// Firmware version
        version: &'static str,
    },
}

/// Firmware version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed part of the longest `adv` line: keys, quotes, MAC, kind, rssi, cid.
const ADV_FRAME_LEN: usize = 128;

/// Maximum size of a serialized JSON message.
///
/// Sized for the worst `adv` line: every name byte a control character
/// escaped as `\u00XX`, plus the manufacturer data as hex.
pub const MAX_MSG_LEN: usize = ADV_FRAME_LEN + 6 * NAME_CAPACITY + 2 * MANUFACTURER_CAPACITY;

/// Serialize a DeviceMessage to JSON into `buf`.
/// Returns the JSON text, or None if it did not fit.
pub fn serialize_message<'b>(msg: &DeviceMessage<'_>, buf: &'b mut [u8]) -> Option<&'b str> {
    let len = serde_json_core::to_slice(msg, buf).ok()?;
    core::str::from_utf8(&buf[..len]).ok()
}

/// Format a 6-byte address into "AA:BB:CC:DD:EE:FF".
///
/// The radio delivers addresses least significant byte first; the string
/// puts the most significant byte first, as BLE addresses are conventionally
/// written.
pub fn format_mac(mac: &[u8; 6], buf: &mut MacString) {
    let _ = write!(
        buf,
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[5], mac[4], mac[3], mac[2], mac[1], mac[0]
    );
}

/// Format bytes as lowercase hex, stopping when `buf` is full.
pub fn format_hex<const N: usize>(bytes: &[u8], buf: &mut String<N>) {
    for b in bytes {
        if write!(buf, "{:02x}", b).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json<'b>(msg: &DeviceMessage<'_>, buf: &'b mut [u8; MAX_MSG_LEN]) -> &'b str {
        serialize_message(msg, buf).unwrap()
    }

    #[test]
    fn serialize_advertisement_message() {
        let mut mac = MacString::new();
        format_mac(&[0x06, 0x05, 0x04, 0x03, 0x02, 0x01], &mut mac);
        let mut mfr = HexString::new();
        format_hex(&[0x01, 0x02], &mut mfr);
        let msg = DeviceMessage::Advertisement {
            mac: &mac,
            rssi: -60,
            kind: "adv_ind",
            name: Some("Hello"),
            mfr: Some(&mfr),
            cid: Some(0x0201),
        };
        let mut buf = [0u8; MAX_MSG_LEN];
        assert_eq!(
            to_json(&msg, &mut buf),
            r#"{"type":"adv","mac":"01:02:03:04:05:06","rssi":-60,"kind":"adv_ind","name":"Hello","mfr":"0102","cid":513}"#
        );
    }

    #[test]
    fn advertisement_omits_absent_fields() {
        let mac = MacString::try_from("AA:BB:CC:DD:EE:FF").unwrap();
        let msg = DeviceMessage::Advertisement {
            mac: &mac,
            rssi: -90,
            kind: "adv_nonconn_ind",
            name: None,
            mfr: None,
            cid: None,
        };
        let mut buf = [0u8; MAX_MSG_LEN];
        let json = to_json(&msg, &mut buf);
        assert!(!json.contains("name"));
        assert!(!json.contains("mfr"));
        assert!(!json.contains("cid"));
    }

    #[test]
    fn serialize_status_message() {
        let msg = DeviceMessage::Status {
            seq: 12,
            uptime: 12,
            reports: 40,
            duplicates: 3,
            named: 7,
            with_mfr: 5,
            version: "0.1.0",
        };
        let mut buf = [0u8; MAX_MSG_LEN];
        assert_eq!(
            to_json(&msg, &mut buf),
            r#"{"type":"status","seq":12,"uptime":12,"reports":40,"duplicates":3,"named":7,"with_mfr":5,"version":"0.1.0"}"#
        );
    }

    #[test]
    fn serialize_scan_messages() {
        let mut buf = [0u8; MAX_MSG_LEN];
        let started = DeviceMessage::ScanStarted {
            interval_ms: 60,
            window_ms: 30,
            dedup: true,
        };
        assert_eq!(
            to_json(&started, &mut buf),
            r#"{"type":"scan","interval_ms":60,"window_ms":30,"dedup":true}"#
        );

        let failed = DeviceMessage::ScanFailed {
            reason: "stack_unavailable",
        };
        assert_eq!(
            to_json(&failed, &mut buf),
            r#"{"type":"scan_error","reason":"stack_unavailable"}"#
        );
    }

    #[test]
    fn serialize_fails_cleanly_when_buffer_too_small() {
        let msg = DeviceMessage::ScanFailed { reason: "start_failed" };
        let mut buf = [0u8; 8];
        assert_eq!(serialize_message(&msg, &mut buf), None);
    }

    #[test]
    fn name_with_quotes_is_escaped() {
        let mac = MacString::new();
        let msg = DeviceMessage::Advertisement {
            mac: &mac,
            rssi: 0,
            kind: "adv_ind",
            name: Some("a\"b"),
            mfr: None,
            cid: None,
        };
        let mut buf = [0u8; MAX_MSG_LEN];
        assert!(to_json(&msg, &mut buf).contains(r#""name":"a\"b""#));
    }

    #[test]
    fn longest_advertisement_fits() {
        let mac = MacString::try_from("AA:BB:CC:DD:EE:FF").unwrap();
        let name = core::str::from_utf8(&[0x01; NAME_CAPACITY]).unwrap();
        let mut mfr = HexString::new();
        format_hex(&[0xFF; MANUFACTURER_CAPACITY], &mut mfr);
        let msg = DeviceMessage::Advertisement {
            mac: &mac,
            rssi: i8::MIN,
            kind: "adv_nonconn_ind",
            name: Some(name),
            mfr: Some(&mfr),
            cid: Some(u16::MAX),
        };
        let mut buf = [0u8; MAX_MSG_LEN];
        let json = to_json(&msg, &mut buf);
        assert!(json.contains(r#""name":"\u0001\u0001"#));
        assert!(json.ends_with(r#""cid":65535}"#));
    }

    #[test]
    fn hex_stops_at_capacity() {
        let mut hex: String<5> = String::new();
        format_hex(&[0xAB, 0xCD, 0xEF], &mut hex);
        assert_eq!(hex.as_str(), "abcd");
    }

    #[test]
    fn full_manufacturer_data_fits_hex_string() {
        let mut hex = HexString::new();
        format_hex(&[0xFF; MANUFACTURER_CAPACITY], &mut hex);
        assert_eq!(hex.len(), MANUFACTURER_CAPACITY * 2);
    }
}
