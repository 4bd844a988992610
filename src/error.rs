//! Error types used for `winlnk`.
//!
//! Errors are split per section, mirroring the structure of the parser
//! itself, and composed into a single [`ParseError`] at the top — the same
//! shape the teacher crate uses (`HeaderError`, `StringDataError`, ...
//! composed into `Error`). Each variant that can occur mid-section carries a
//! [`Breadcrumb`] naming the section, field, and byte offset at fault, per
//! the spec's requirement that a fatal error carry "a breadcrumb of the
//! containing section and field".

use thiserror::Error;

/// Names the section, field, and byte offset a parse failure occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// The section being read, e.g. `"LocationInformation"`.
    pub section: &'static str,
    /// The field being read within that section, e.g. `"volume_label_offset"`.
    pub field: &'static str,
    /// The absolute byte offset the read was attempted at.
    pub offset: u64,
}

impl Breadcrumb {
    /// Builds a new breadcrumb.
    pub fn new(section: &'static str, field: &'static str, offset: u64) -> Self {
        Self {
            section,
            field,
            offset,
        }
    }
}

impl std::fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} (offset 0x{:08x})",
            self.section, self.field, self.offset
        )
    }
}

/// Top-level error returned by [`crate::ShortcutFile::parse`] and friends.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Could not open the file backing the byte source.
    #[error("could not open file: {0}")]
    Open(#[from] std::io::Error),

    /// An error occurred while parsing the `ShellLinkHeader`.
    #[error("error parsing header: {0}")]
    Header(#[from] HeaderError),

    /// An error occurred while parsing `StringData`.
    #[error("error parsing string data: {0}")]
    StringData(#[from] StringDataError),

    /// An error occurred while parsing `LinkTargetIdList`.
    #[error("error parsing link target id list: {0}")]
    LinkTargetIdList(#[from] LinkTargetIdListError),

    /// An error occurred while parsing `LocationInformation`.
    #[error("error parsing location information: {0}")]
    LocationInformation(#[from] LocationInformationError),

    /// An error occurred while parsing the `ExtraData` block stream.
    #[error("error parsing extra data: {0}")]
    ExtraData(#[from] ExtraDataError),

    /// A requested ANSI codepage is not in the enumerated supported set.
    #[error("unsupported ANSI codepage: {0}")]
    CodepageError(u32),
}

/// An error occurred while parsing the `ShellLinkHeader`.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// Fewer than 76 bytes were available for the fixed header prefix.
    #[error("could not read header: {0}")]
    Read(#[from] std::io::Error),

    /// `header_size` was not 0x0000004C (76).
    #[error("bad header size: expected 76, got {0}")]
    BadHeaderSize(u32),

    /// `link_clsid` did not equal the LNK shell link class identifier.
    #[error("bad class identifier: {0:032x}")]
    BadClassIdentifier(u128),
}

/// An error occurred while parsing the `LinkTargetIdList` section.
#[derive(Debug, Error)]
pub enum LinkTargetIdListError {
    /// The declared size claimed bytes beyond the end of the stream.
    #[error("short input reading link target id list: {0}")]
    ShortInput(Breadcrumb),
}

/// An error occurred while parsing the `LocationInformation` section.
#[derive(Debug, Error)]
pub enum LocationInformationError {
    /// Fewer bytes were available than the section's own declared size.
    #[error("short input reading location information: {0}")]
    ShortInput(Breadcrumb),

    /// `header_size` was not one of 28, 32, or 36.
    #[error("bad location information header size {0} at {1}")]
    BadHeaderSize(u32, Breadcrumb),

    /// An internal offset fell outside `[header_size, total_size)`.
    #[error("offset out of range: {0}")]
    OffsetOutOfRange(Breadcrumb),

    /// A NUL-terminated string ran off the end of its containing buffer.
    #[error("unterminated string: {0}")]
    UnterminatedString(Breadcrumb),
}

/// An error occurred while parsing a `StringData` entry.
#[derive(Debug, Error)]
pub enum StringDataError {
    /// Fewer bytes were available than the string's declared length.
    #[error("short input reading string data: {0}")]
    ShortInput(Breadcrumb),

    /// `number_of_characters * char_width` overflowed a `usize`.
    #[error("size overflow reading string data: {0}")]
    SizeOverflow(Breadcrumb),
}

/// An error occurred while parsing the `ExtraData` block stream.
#[derive(Debug, Error)]
pub enum ExtraDataError {
    /// Fewer bytes were available than a block's declared size.
    #[error("short input reading data block: {0}")]
    ShortInput(Breadcrumb),

    /// A block's declared size was out of the legal `[4, MAX_ALLOC + 4]` range,
    /// or claimed more bytes than remain in the stream.
    #[error("data block size {0} out of bounds at {1}")]
    SizeOutOfBounds(u32, Breadcrumb),

    /// A `DistributedLinkTracker` block declared a `data_version` other than
    /// the only one this format defines. Unlike other known-signature
    /// decode failures, this is a fatal cross-field consistency violation,
    /// not a recoverable one.
    #[error("unsupported distributed link tracker version {0} at {1}")]
    UnsupportedVersion(u32, Breadcrumb),
}

/// A non-fatal problem encountered while decoding a known data-block
/// signature, or an unrecognized signature. Collected on `ShortcutFile` per
/// spec §7 ("warnings are enumerable from the ShortcutFile").
#[derive(Debug, Clone, Error)]
pub enum Warning {
    /// A data block whose signature is not in the recognized set.
    #[error("unrecognized data block signature 0x{signature:08x} (size {size})")]
    UnknownDataBlock {
        /// The raw `signature` field.
        signature: u32,
        /// The raw `size` field, including the 8-byte size+signature prefix.
        size: u32,
    },

    /// A known signature whose payload didn't decode as expected; raw bytes
    /// were retained and parsing continued with the next block.
    #[error("data block 0x{signature:08x} failed to decode: {reason}")]
    DataBlockDecodeFailed {
        /// The raw `signature` field.
        signature: u32,
        /// A human-readable description of what went wrong.
        reason: String,
    },

    /// A strings-style block (environment variable / Darwin / icon location)
    /// had neither an ANSI nor a Unicode half terminated by a NUL.
    #[error("strings block 0x{signature:08x} has no terminated ANSI or Unicode half")]
    StringsBlockUnsupported {
        /// The raw `signature` field.
        signature: u32,
    },
}
