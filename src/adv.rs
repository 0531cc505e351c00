//! Advertising data (AD structure) walker.
//!
//! AD structure format: [length] [type] [data...]
//!
//! `length` counts the type byte plus the data. Structures are packed
//! back-to-back with no overall length prefix. A zero length marks the end of
//! the significant part; anything after it is padding.
//!
//! Types we care about:
//!   0x08/0x09 = Shortened/Complete local name
//!   0xFF      = Manufacturer specific data (first 2 bytes = company ID, little-endian)

use core::iter::FusedIterator;
use core::ops::ControlFlow;

pub const AD_FLAGS: u8 = 0x01;
pub const AD_UUIDS_16_INCOMPLETE: u8 = 0x02;
pub const AD_UUIDS_16_COMPLETE: u8 = 0x03;
pub const AD_NAME_SHORTENED: u8 = 0x08;
pub const AD_NAME_COMPLETE: u8 = 0x09;
pub const AD_TX_POWER: u8 = 0x0A;
pub const AD_SERVICE_DATA_16: u8 = 0x16;
pub const AD_MANUFACTURER_DATA: u8 = 0xFF;

/// One AD structure borrowed from a report buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdField<'a> {
    pub ad_type: u8,
    pub data: &'a [u8],
}

/// Lazy sequence of AD structures.
///
/// Stops at the first zero length, at the first structure whose declared
/// length runs past the end of the buffer, or when the buffer is exhausted.
/// Never reads outside `buf`.
#[derive(Debug, Clone)]
pub struct AdFields<'a> {
    buf: &'a [u8],
}

impl<'a> AdFields<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }
}

impl<'a> Iterator for AdFields<'a> {
    type Item = AdField<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.buf.split_first()?;
        let len = len as usize;
        if len == 0 || len > rest.len() {
            // Padding or a truncated trailing structure: nothing more to parse.
            self.buf = &[];
            return None;
        }

        let (structure, tail) = rest.split_at(len);
        self.buf = tail;
        Some(AdField {
            ad_type: structure[0],
            data: &structure[1..],
        })
    }
}

impl FusedIterator for AdFields<'_> {}

/// Drive `visitor` over every AD structure in `buf`.
///
/// The visitor is called for every structure regardless of type. Returning
/// `ControlFlow::Break(())` ends the walk immediately; the result tells the
/// caller whether that happened.
pub fn visit<'a, F>(buf: &'a [u8], visitor: F) -> ControlFlow<()>
where
    F: FnMut(AdField<'a>) -> ControlFlow<()>,
{
    AdFields::new(buf).try_for_each(visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_back_to_back_structures() {
        let ad_data = [
            0x02, 0x01, 0x06, // Flags
            0x03, 0x03, 0x0F, 0x18, // Battery service UUID
            0x04, 0x09, b'A', b'B', b'C', // Complete name
        ];
        let fields: heapless::Vec<AdField<'_>, 4> = AdFields::new(&ad_data).collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], AdField { ad_type: AD_FLAGS, data: &[0x06] });
        assert_eq!(fields[1].ad_type, AD_UUIDS_16_COMPLETE);
        assert_eq!(fields[1].data, &[0x0F, 0x18]);
        assert_eq!(fields[2].data, b"ABC");
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        assert_eq!(AdFields::new(&[]).next(), None);
    }

    #[test]
    fn zero_length_terminates() {
        let ad_data = [0x02, 0x01, 0x06, 0x00, 0x02, 0x09, b'X'];
        assert_eq!(AdFields::new(&ad_data).count(), 1);
    }

    #[test]
    fn overlong_length_terminates_without_reading_past_end() {
        // Second structure claims 10 bytes but only 2 follow.
        let ad_data = [0x02, 0x01, 0x06, 0x0A, 0xFF, 0x01];
        let mut it = AdFields::new(&ad_data);
        assert_eq!(it.next().map(|f| f.ad_type), Some(AD_FLAGS));
        assert_eq!(it.next(), None);
        // Fused: stays exhausted.
        assert_eq!(it.next(), None);
    }

    #[test]
    fn lone_length_byte_is_ignored() {
        assert_eq!(AdFields::new(&[0x05]).count(), 0);
    }

    #[test]
    fn type_only_structure_has_empty_data() {
        let ad_data = [0x01, AD_NAME_COMPLETE];
        let field = AdFields::new(&ad_data).next().unwrap();
        assert_eq!(field.ad_type, AD_NAME_COMPLETE);
        assert!(field.data.is_empty());
    }

    #[test]
    fn visitor_sees_every_type_until_break() {
        let ad_data = [
            0x02, 0x01, 0x06, // Flags
            0x02, 0x0A, 0x04, // TX power
            0x02, 0x09, b'N', // Name, visitor stops here
            0x02, 0xFF, 0x01, // never visited
        ];
        let mut seen: heapless::Vec<u8, 8> = heapless::Vec::new();
        let flow = visit(&ad_data, |field| {
            seen.push(field.ad_type).unwrap();
            if field.ad_type == AD_NAME_COMPLETE {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen.as_slice(), &[AD_FLAGS, AD_TX_POWER, AD_NAME_COMPLETE]);
    }

    #[test]
    fn visitor_runs_to_completion() {
        let ad_data = [0x02, 0x01, 0x06, 0x02, 0x0A, 0x04];
        let mut count = 0;
        let flow = visit(&ad_data, |_| {
            count += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(count, 2);
    }
}
