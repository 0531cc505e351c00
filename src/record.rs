//! Bounded record of the fields we extract from one advertisement.

use core::ops::ControlFlow;

use heapless::Vec;

use crate::adv::{self, AdField, AD_MANUFACTURER_DATA, AD_NAME_COMPLETE, AD_NAME_SHORTENED};
use crate::defaults::{MANUFACTURER_CAPACITY, NAME_CAPACITY};

/// Which local-name AD type the name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Shortened,
    Complete,
}

/// Fields extracted from one advertisement.
///
/// Both buffers hold at most their capacity; longer source data is silently
/// truncated. A fresh record is empty, and fields absent from the
/// advertisement stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord<const NAME: usize = NAME_CAPACITY, const MFR: usize = MANUFACTURER_CAPACITY> {
    pub name: Vec<u8, NAME>,
    pub name_kind: Option<NameKind>,
    /// Manufacturer specific data, company ID included.
    pub manufacturer_data: Vec<u8, MFR>,
}

impl<const NAME: usize, const MFR: usize> ParsedRecord<NAME, MFR> {
    pub const fn new() -> Self {
        Self {
            name: Vec::new(),
            name_kind: None,
            manufacturer_data: Vec::new(),
        }
    }

    /// Parse advertisement data bytes into a fresh record.
    pub fn parse(ad_data: &[u8]) -> Self {
        let mut record = Self::new();
        let _ = record.fill(ad_data);
        record
    }

    /// Walk `ad_data` and store recognised fields into `self`.
    ///
    /// A name field ends the walk: the first shortened or complete name wins
    /// and nothing after it is consulted. Manufacturer data does not end the
    /// walk, so a later manufacturer field replaces an earlier one.
    pub fn fill(&mut self, ad_data: &[u8]) -> ControlFlow<()> {
        adv::visit(ad_data, |field| self.absorb(field))
    }

    fn absorb(&mut self, field: AdField<'_>) -> ControlFlow<()> {
        match field.ad_type {
            AD_NAME_SHORTENED | AD_NAME_COMPLETE => {
                copy_truncated(&mut self.name, field.data);
                self.name_kind = Some(if field.ad_type == AD_NAME_COMPLETE {
                    NameKind::Complete
                } else {
                    NameKind::Shortened
                });
                ControlFlow::Break(())
            }
            AD_MANUFACTURER_DATA => {
                copy_truncated(&mut self.manufacturer_data, field.data);
                ControlFlow::Continue(())
            }
            _ => ControlFlow::Continue(()),
        }
    }

    /// The name as text, if one was found and it is valid UTF-8.
    ///
    /// Truncation can split a multi-byte character, in which case this is
    /// `None` even though `name` holds bytes.
    pub fn name_str(&self) -> Option<&str> {
        if self.name.is_empty() {
            return None;
        }
        core::str::from_utf8(&self.name).ok()
    }

    /// Bluetooth SIG company identifier from the manufacturer data.
    pub fn company_id(&self) -> Option<u16> {
        match self.manufacturer_data.as_slice() {
            [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.manufacturer_data.is_empty()
    }
}

impl<const NAME: usize, const MFR: usize> Default for ParsedRecord<NAME, MFR> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse with the default capacities.
pub fn parse(ad_data: &[u8]) -> ParsedRecord {
    ParsedRecord::parse(ad_data)
}

fn copy_truncated<const C: usize>(dst: &mut Vec<u8, C>, src: &[u8]) {
    dst.clear();
    let len = src.len().min(C);
    // Cannot fail: `len` never exceeds the capacity.
    let _ = dst.extend_from_slice(&src[..len]);
}
