//! Shared decoder for the three data blocks that all share the same
//! 260-byte-ANSI + 520-byte-UTF-16LE payload shape: environment-variable
//! location (0xA0000001), Darwin properties (0xA0000006), and icon location
//! (0xA0000007). The teacher crate has three near-identical `read_exact`
//! bodies for these (`environment_variable_data_block.rs`,
//! `icon_environment_data_block.rs`, and an incomplete
//! `darwin_data_block.rs` that never actually read its payload); this
//! module generalizes them into one routine, dispatched by signature at the
//! call site instead of being copy-pasted three times.

use crate::codepage::{copy_from_utf16le, Codepage};
use crate::cursor::{find_nul, find_nul16};
use crate::string_data::DataString;

/// ANSI half width, in bytes, of a strings-block payload.
pub const ANSI_WIDTH: usize = 260;
/// UTF-16LE half width, in bytes, of a strings-block payload.
pub const UNICODE_WIDTH: usize = 520;

/// The decoded form of an environment-variable / Darwin / icon-location
/// data block: a single string, which may have come from either half of
/// the payload.
#[derive(Clone, Debug)]
pub struct StringsBlock {
    /// The canonical decoded string; empty if neither half was usable.
    pub value: DataString,
}

impl StringsBlock {
    /// Decodes `rest` (the bytes following the block's 4-byte signature,
    /// expected to be exactly `ANSI_WIDTH + UNICODE_WIDTH` bytes) into a
    /// [`StringsBlock`]. The returned `bool` is `true` when neither half had
    /// a terminating NUL, meaning `value` is an empty placeholder rather
    /// than a decoded string.
    pub fn decode(rest: &[u8], codepage: Codepage) -> (Self, bool) {
        let ansi_half = rest.get(..ANSI_WIDTH).unwrap_or(&[]);
        let unicode_half = rest.get(ANSI_WIDTH..ANSI_WIDTH + UNICODE_WIDTH).unwrap_or(&[]);

        let ansi_len = find_nul(ansi_half);
        let uni_len_units = find_nul16(unicode_half);

        let (value, unsupported) = if let Some(units) = uni_len_units {
            (
                DataString {
                    is_unicode: true,
                    data: unicode_half[..units * 2].to_vec(),
                },
                false,
            )
        } else if let Some(len) = ansi_len {
            (
                DataString {
                    is_unicode: false,
                    data: ansi_half[..len].to_vec(),
                },
                false,
            )
        } else {
            (
                DataString {
                    is_unicode: false,
                    data: Vec::new(),
                },
                true,
            )
        };

        // `value.to_utf8` decodes lazily from here on; eagerly decoding once
        // up front would force a codepage choice before the caller ever asks.
        let _ = codepage;

        (Self { value }, unsupported)
    }
}

/// Decodes a Unicode half directly, bypassing `DataString`'s codepage
/// indirection; used by callers that only care about the canonical string.
pub fn canonical_string(block: &StringsBlock, codepage: Codepage) -> String {
    if block.value.is_unicode {
        copy_from_utf16le(&block.value.data)
    } else {
        codepage.copy_from_ansi(&block.value.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(ansi: &[u8], unicode_units: &[u16]) -> Vec<u8> {
        let mut rest = vec![0u8; ANSI_WIDTH + UNICODE_WIDTH];
        rest[..ansi.len()].copy_from_slice(ansi);
        for (i, u) in unicode_units.iter().enumerate() {
            let bytes = u.to_le_bytes();
            rest[ANSI_WIDTH + i * 2] = bytes[0];
            rest[ANSI_WIDTH + i * 2 + 1] = bytes[1];
        }
        rest
    }

    #[test]
    fn prefers_unicode_half_when_present() {
        let units: Vec<u16> = "hi".encode_utf16().collect();
        let rest = payload(b"fallback", &units);
        let (block, unsupported) = StringsBlock::decode(&rest, Codepage::Ascii);
        assert!(block.value.is_unicode);
        assert_eq!(canonical_string(&block, Codepage::Ascii), "hi");
        assert!(!unsupported);
    }

    #[test]
    fn falls_back_to_ansi_half() {
        let rest = payload(b"ansi-only", &[]);
        let (block, unsupported) = StringsBlock::decode(&rest, Codepage::Ascii);
        assert!(!block.value.is_unicode);
        assert_eq!(canonical_string(&block, Codepage::Ascii), "ansi-only");
        assert!(!unsupported);
    }

    #[test]
    fn both_halves_absent_yields_empty() {
        let rest = vec![0u8; ANSI_WIDTH + UNICODE_WIDTH];
        let (block, unsupported) = StringsBlock::decode(&rest, Codepage::Ascii);
        assert_eq!(canonical_string(&block, Codepage::Ascii), "");
        assert!(unsupported);
    }
}
