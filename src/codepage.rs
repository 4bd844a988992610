//! ANSI codepage transcoding.
//!
//! Spec.md treats this as an external, pure-function collaborator (§6.2);
//! this module gives it a concrete body so the crate builds standalone.
//! Grounded on `examples/other_examples/fcce2a34_lilopkins-lnk-rs__src-linkinfo.rs.rs`
//! and the `Sculas-lnk-rs` manifest — the two other LNK-parsing crates in
//! the retrieval pack, both of which reach for `encoding_rs` to decode the
//! ANSI half of LNK string fields, rather than assuming UTF-8 the way the
//! teacher crate currently does (`String::from_utf8` in `link_info.rs` and
//! `string_data.rs`).

use crate::error::ParseError;
use encoding_rs::Encoding;

/// An ANSI codepage used to decode non-Unicode byte strings in an LNK file.
///
/// This is the enumerated, closed set from spec.md §6.2. Anything outside
/// this set is rejected — spec.md §9 Open Question 3 calls out that the C
/// original's validation of this value is buggy (an always-true `!=`
/// disjunction) and explicitly directs implementations to validate
/// properly instead of reproducing the bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Codepage {
    /// The 7-bit ASCII / Windows-1252 default system codepage.
    Ascii,
    /// Windows-874 (Thai).
    Windows874,
    /// Windows-932 (Shift-JIS, Japanese).
    Windows932,
    /// Windows-936 (GBK, simplified Chinese).
    Windows936,
    /// Windows-949 (Korean).
    Windows949,
    /// Windows-950 (Big5, traditional Chinese).
    Windows950,
    /// Windows-1250 (Central European).
    Windows1250,
    /// Windows-1251 (Cyrillic).
    Windows1251,
    /// Windows-1252 (Western European).
    Windows1252,
    /// Windows-1253 (Greek).
    Windows1253,
    /// Windows-1254 (Turkish).
    Windows1254,
    /// Windows-1255 (Hebrew).
    Windows1255,
    /// Windows-1256 (Arabic).
    Windows1256,
    /// Windows-1257 (Baltic).
    Windows1257,
    /// Windows-1258 (Vietnamese).
    Windows1258,
}

impl Default for Codepage {
    fn default() -> Self {
        Codepage::Ascii
    }
}

impl Codepage {
    /// Numeric Windows codepage identifier, used only for error reporting.
    pub fn numeric_id(self) -> u32 {
        match self {
            Codepage::Ascii => 20127,
            Codepage::Windows874 => 874,
            Codepage::Windows932 => 932,
            Codepage::Windows936 => 936,
            Codepage::Windows949 => 949,
            Codepage::Windows950 => 950,
            Codepage::Windows1250 => 1250,
            Codepage::Windows1251 => 1251,
            Codepage::Windows1252 => 1252,
            Codepage::Windows1253 => 1253,
            Codepage::Windows1254 => 1254,
            Codepage::Windows1255 => 1255,
            Codepage::Windows1256 => 1256,
            Codepage::Windows1257 => 1257,
            Codepage::Windows1258 => 1258,
        }
    }

    /// Builds a `Codepage` from a numeric Windows codepage identifier,
    /// rejecting anything not in the enumerated supported set.
    pub fn from_numeric_id(id: u32) -> Result<Self, ParseError> {
        Ok(match id {
            20127 | 0 => Codepage::Ascii,
            874 => Codepage::Windows874,
            932 => Codepage::Windows932,
            936 => Codepage::Windows936,
            949 => Codepage::Windows949,
            950 => Codepage::Windows950,
            1250 => Codepage::Windows1250,
            1251 => Codepage::Windows1251,
            1252 => Codepage::Windows1252,
            1253 => Codepage::Windows1253,
            1254 => Codepage::Windows1254,
            1255 => Codepage::Windows1255,
            1256 => Codepage::Windows1256,
            1257 => Codepage::Windows1257,
            1258 => Codepage::Windows1258,
            other => return Err(ParseError::CodepageError(other)),
        })
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            // There is no standalone "pure ASCII" table in encoding_rs; any
            // byte >= 0x80 under a nominal ASCII codepage is, in practice,
            // extended Windows-1252 on the systems that produced these
            // files, so that's what backs decoding here.
            Codepage::Ascii => encoding_rs::WINDOWS_1252,
            Codepage::Windows874 => encoding_rs::WINDOWS_874,
            Codepage::Windows932 => encoding_rs::SHIFT_JIS,
            Codepage::Windows936 => encoding_rs::GBK,
            Codepage::Windows949 => encoding_rs::EUC_KR,
            Codepage::Windows950 => encoding_rs::BIG5,
            Codepage::Windows1250 => encoding_rs::WINDOWS_1250,
            Codepage::Windows1251 => encoding_rs::WINDOWS_1251,
            Codepage::Windows1252 => encoding_rs::WINDOWS_1252,
            Codepage::Windows1253 => encoding_rs::WINDOWS_1253,
            Codepage::Windows1254 => encoding_rs::WINDOWS_1254,
            Codepage::Windows1255 => encoding_rs::WINDOWS_1255,
            Codepage::Windows1256 => encoding_rs::WINDOWS_1256,
            Codepage::Windows1257 => encoding_rs::WINDOWS_1257,
            Codepage::Windows1258 => encoding_rs::WINDOWS_1258,
        }
    }

    /// Transcodes `bytes` from this ANSI codepage to an owned UTF-8 `String`.
    pub fn copy_from_ansi(self, bytes: &[u8]) -> String {
        let (decoded, _, _) = self.encoding().decode(bytes);
        decoded.into_owned()
    }

    /// The length, in UTF-8 bytes, that [`Codepage::copy_from_ansi`] would
    /// produce for `bytes`, without allocating the final string.
    pub fn size_from_ansi(self, bytes: &[u8]) -> usize {
        let (decoded, _, _) = self.encoding().decode(bytes);
        decoded.len()
    }
}

/// Transcodes a UTF-16LE byte slice (an even number of bytes) to an owned
/// UTF-8 `String`, replacing unpaired surrogates per the WHATWG decode
/// algorithm.
pub fn copy_from_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    widestring::U16Str::from_slice(&units).to_string_lossy()
}

/// The length, in UTF-8 bytes, that [`copy_from_utf16le`] would produce.
pub fn size_from_utf16le(bytes: &[u8]) -> usize {
    copy_from_utf16le(bytes).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips_plain_text() {
        assert_eq!(Codepage::Ascii.copy_from_ansi(b"notepad.exe"), "notepad.exe");
    }

    #[test]
    fn rejects_unsupported_numeric_codepage() {
        assert!(Codepage::from_numeric_id(65001).is_err());
    }

    #[test]
    fn utf16le_decodes_ascii_subset() {
        let bytes = [b'h', 0, b'i', 0];
        assert_eq!(copy_from_utf16le(&bytes), "hi");
        assert_eq!(size_from_utf16le(&bytes), 2);
    }
}
