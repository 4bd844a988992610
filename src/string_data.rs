//! Definitions for the
//! [StringData](https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-shllink/17b69472-0f34-4bcf-b290-eccdb8de224b)
//! type.
//!
//! Each field is stored as the raw bytes read off the wire plus the
//! Unicode flag that governed how they were read — decoding into UTF-8 (or
//! UTF-16) happens lazily at the accessor layer, via [`DataString::to_utf8`],
//! so callers can choose their own codepage without having to re-parse.

use crate::byte_source::ByteSource;
use crate::codepage::{copy_from_utf16le, Codepage};
use crate::cursor::{read_exact_vec, read_u16};
use crate::error::{Breadcrumb, StringDataError};
use crate::{header::ShellLinkHeader, LinkFlags};

const SECTION: &str = "StringData";

/// One of the five optional length-prefixed strings in a `.lnk` file's
/// StringData section: raw bytes plus whether they're UTF-16LE or ANSI.
#[derive(Clone, Debug)]
pub struct DataString {
    /// `true` if `data` is UTF-16LE, `false` if it's an ANSI byte string.
    pub is_unicode: bool,
    /// The raw string bytes, without a terminating NUL.
    pub data: Vec<u8>,
}

impl DataString {
    /// Decodes this string to UTF-8, using `codepage` if it's an ANSI byte
    /// string or UTF-16LE decoding if it's already Unicode.
    pub fn to_utf8(&self, codepage: Codepage) -> String {
        if self.is_unicode {
            copy_from_utf16le(&self.data)
        } else {
            codepage.copy_from_ansi(&self.data)
        }
    }

    /// The number of UTF-8 bytes `to_utf8` would produce, without allocating.
    pub fn utf8_len(&self, codepage: Codepage) -> usize {
        if self.is_unicode {
            copy_from_utf16le(&self.data).len()
        } else {
            codepage.size_from_ansi(&self.data)
        }
    }
}

#[derive(Clone, Debug, Default)]
/// StringData refers to a set of structures that convey user interface and path identification information. The presence of these optional structures is controlled by LinkFlags (section 2.1.1) in the ShellLinkHeader (section 2.1).
/// The StringData structures conform to the following ABNF rules [RFC5234].
pub struct StringData {
    /// Description supplied by .lnk creator.
    pub name_string: Option<DataString>,

    /// Relative path from the .lnk to the resource.
    pub relative_path: Option<DataString>,

    /// Working directory to use when launching the resource.
    pub working_dir: Option<DataString>,

    /// Any arguments to be passed to the resource.
    pub command_line_arguments: Option<DataString>,

    /// Icon displayed for the .lnk.
    pub icon_location: Option<DataString>,
}

impl StringData {
    /// Parses a single length-prefixed string at the beginning of `cursor`.
    /// If `unicode` is `true`, the length is a UTF-16 code-unit count and
    /// twice as many bytes are read.
    fn parse_string(
        cursor: &mut impl ByteSource,
        unicode: bool,
        field: &'static str,
    ) -> Result<DataString, StringDataError> {
        let offset = cursor.position();
        let number_of_characters = read_u16(cursor).map_err(|_| {
            StringDataError::ShortInput(Breadcrumb::new(SECTION, field, offset))
        })?;

        let char_width: u64 = if unicode { 2 } else { 1 };
        let byte_length = (number_of_characters as u64)
            .checked_mul(char_width)
            .ok_or_else(|| {
                StringDataError::SizeOverflow(Breadcrumb::new(SECTION, field, offset))
            })?;

        let data = read_exact_vec(cursor, byte_length as usize).map_err(|_| {
            StringDataError::ShortInput(Breadcrumb::new(SECTION, field, offset + 2))
        })?;

        Ok(DataString {
            is_unicode: unicode,
            data,
        })
    }

    /// Build new `StringData` from data blob.
    pub fn new(
        cursor: &mut impl ByteSource,
        header: &ShellLinkHeader,
    ) -> Result<Self, StringDataError> {
        let unicode = header.link_flags.contains(LinkFlags::IS_UNICODE);
        let mut this = StringData::default();

        if header.link_flags.contains(LinkFlags::HAS_NAME) {
            this.name_string = Some(Self::parse_string(cursor, unicode, "name_string")?);
        }
        if header.link_flags.contains(LinkFlags::HAS_RELATIVE_PATH) {
            this.relative_path = Some(Self::parse_string(cursor, unicode, "relative_path")?);
        }
        if header.link_flags.contains(LinkFlags::HAS_WORKING_DIR) {
            this.working_dir = Some(Self::parse_string(cursor, unicode, "working_dir")?);
        }
        if header.link_flags.contains(LinkFlags::HAS_ARGUMENTS) {
            this.command_line_arguments =
                Some(Self::parse_string(cursor, unicode, "command_line_arguments")?);
        }
        if header.link_flags.contains(LinkFlags::HAS_ICON_LOCATION) {
            this.icon_location = Some(Self::parse_string(cursor, unicode, "icon_location")?);
        }
        Ok(this)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;
    use std::io::Cursor;

    fn header_with(flags: LinkFlags) -> ShellLinkHeader {
        let mut bytes = Vec::with_capacity(76);
        bytes.extend_from_slice(&76u32.to_le_bytes());
        bytes.extend_from_slice(&crate::header::CLASS_IDENTIFIER.to_le_bytes());
        bytes.extend_from_slice(&flags.bits().to_le_bytes());
        bytes.extend_from_slice(&[0u8; 76 - 4 - 16 - 4]);
        let mut cursor = Cursor::new(bytes);
        ShellLinkHeader::try_from(&mut cursor).unwrap()
    }

    #[test]
    fn reads_ansi_description() {
        let header = header_with(LinkFlags::HAS_NAME);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&5u16.to_le_bytes());
        bytes.extend_from_slice(b"hello");
        let mut cursor = Cursor::new(bytes);
        let strings = StringData::new(&mut cursor, &header).unwrap();
        let name = strings.name_string.unwrap();
        assert!(!name.is_unicode);
        assert_eq!(name.to_utf8(Codepage::Ascii), "hello");
    }

    #[test]
    fn reads_unicode_arguments() {
        let header = header_with(LinkFlags::HAS_ARGUMENTS | LinkFlags::IS_UNICODE);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&[b'h', 0, b'i', 0]);
        let mut cursor = Cursor::new(bytes);
        let strings = StringData::new(&mut cursor, &header).unwrap();
        let args = strings.command_line_arguments.unwrap();
        assert!(args.is_unicode);
        assert_eq!(args.to_utf8(Codepage::Ascii), "hi");
    }

    #[test]
    fn absent_fields_stay_none() {
        let header = header_with(LinkFlags::empty());
        let mut cursor = Cursor::new(Vec::new());
        let strings = StringData::new(&mut cursor, &header).unwrap();
        assert!(strings.name_string.is_none());
        assert!(strings.icon_location.is_none());
    }
}
