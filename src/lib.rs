//! Read-only structural parser for Windows Shell Link (`.lnk`) files.
//!
//! # Examples
//!
//! ```no_run
//! use winlnk::ShortcutFile;
//! use std::convert::TryFrom;
//!
//! let path = std::path::Path::new("c:\\users\\me\\desktop\\firefox.lnk");
//! let shortcut = ShortcutFile::try_from(path).unwrap();
//! ```

#![warn(missing_docs)]

pub mod byte_source;
pub mod codepage;
mod cursor;
pub mod error;
pub mod extra_data;
pub mod header;
pub mod link_target_id_list;
pub mod location_information;
pub mod string_data;

pub use byte_source::ByteSource;
pub use codepage::Codepage;
pub use error::{ParseError, Warning};
pub use extra_data::{DataBlock, DataBlockValue, ExtraData};
pub use header::*;
pub use link_target_id_list::LinkTargetIdList;
pub use location_information::{LocationInformation, NetworkShareInformation, VolumeInformation};
pub use string_data::{DataString, StringData};

use std::convert::TryFrom;
use std::path::{Path, PathBuf};

/// Runtime-configurable input to [`ShortcutFile::parse`]. The only knob the
/// format exposes beyond the bytes themselves is which ANSI codepage to use
/// for the non-Unicode byte strings.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Codepage used to decode ANSI byte strings. Defaults to
    /// [`Codepage::Ascii`].
    pub ascii_codepage: Codepage,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            ascii_codepage: Codepage::Ascii,
        }
    }
}

/// A parsed Windows Shell Link (`.lnk`) file.
///
/// Built in one synchronous pass and immutable thereafter: no interior
/// mutability, no `&mut self` methods after [`ShortcutFile::parse`], so
/// `Send + Sync` accessor use across threads is sound without locking.
#[derive(Clone, Debug)]
pub struct ShortcutFile {
    /// Path this shortcut was loaded from, if constructed via `TryFrom<&Path>`.
    path: Option<PathBuf>,

    /// Codepage used to decode this file's ANSI byte strings.
    pub ascii_codepage: Codepage,

    /// The fixed 76-byte header.
    pub header: ShellLinkHeader,

    /// The optional, opaque link-target identifier list.
    pub link_target_id_list: LinkTargetIdList,

    /// The optional location-information record.
    pub location_information: LocationInformation,

    /// The five optional StringData fields.
    pub string_data: StringData,

    /// The ordered DataBlock stream.
    pub extra_data: ExtraData,

    /// Non-fatal problems encountered while parsing the DataBlock stream.
    pub warnings: Vec<Warning>,
}

impl ShortcutFile {
    /// Parses a `ShortcutFile` from `reader`, using the default
    /// [`ParseOptions`].
    pub fn new<S: std::io::Read>(reader: &mut S) -> Result<Self, ParseError> {
        Self::parse(reader, ParseOptions::default())
    }

    /// Parses a `ShortcutFile` from `reader` with explicit `options`.
    ///
    /// Implements the outer driver: header, then link-target identifier (if
    /// flagged), then location information (if flagged and not
    /// suppressed), then the five StringData fields in fixed order, then
    /// the DataBlock stream. Any read past end-of-stream, or any
    /// cross-field consistency violation, is fatal and aborts with a
    /// `ParseError` — the object is never partially populated.
    pub fn parse<S: std::io::Read>(reader: &mut S, options: ParseOptions) -> Result<Self, ParseError> {
        let mut cursor = byte_source::buffer_of(reader).map_err(ParseError::Open)?;

        let header = ShellLinkHeader::try_from(&mut cursor)?;
        let link_target_id_list = LinkTargetIdList::new(&mut cursor, header.link_flags)?;

        let location_information = if header.link_flags.contains(LinkFlags::FORCE_NO_LINK_INFO) {
            LocationInformation::default()
        } else {
            LocationInformation::new(&mut cursor, &header, options.ascii_codepage)?
        };

        let string_data = StringData::new(&mut cursor, &header)?;

        let mut warnings = Vec::new();
        let extra_data = ExtraData::new(&mut cursor, options.ascii_codepage, &mut warnings)?;

        Ok(Self {
            path: None,
            ascii_codepage: options.ascii_codepage,
            header,
            link_target_id_list,
            location_information,
            string_data,
            extra_data,
            warnings,
        })
    }

    /// `true` iff this shortcut carries location information, i.e. its
    /// target refers to a file-system location (as opposed to, say, a pure
    /// shell-namespace item only reachable via its target IDList).
    pub fn link_refers_to_file(&self) -> bool {
        self.header.link_flags.contains(LinkFlags::HAS_LINK_INFO)
            && !self.header.link_flags.contains(LinkFlags::FORCE_NO_LINK_INFO)
    }

    /// The description supplied by the shortcut's creator.
    pub fn description(&self) -> Option<&DataString> {
        self.string_data.name_string.as_ref()
    }

    /// The relative path from the shortcut to its target.
    pub fn relative_path(&self) -> Option<&DataString> {
        self.string_data.relative_path.as_ref()
    }

    /// The working directory to use when launching the target.
    pub fn working_directory(&self) -> Option<&DataString> {
        self.string_data.working_dir.as_ref()
    }

    /// Command-line arguments to pass to the target.
    pub fn command_line_arguments(&self) -> Option<&DataString> {
        self.string_data.command_line_arguments.as_ref()
    }

    /// The icon location string (not to be confused with the
    /// `IconLocation` data block; this is the StringData field).
    pub fn icon_location(&self) -> Option<&DataString> {
        self.string_data.icon_location.as_ref()
    }

    /// The volume label from `LocationInformation`'s volume record, if
    /// present.
    pub fn volume_label(&self) -> Option<&str> {
        self.location_information
            .volume_information
            .as_ref()
            .and_then(|v| v.volume_label.as_deref())
    }

    /// The full local path to the target: `local_path` joined with
    /// `common_path`, present only when `LocationInformation`'s volume
    /// record is present.
    pub fn local_path(&self) -> Option<String> {
        let info = &self.location_information;
        info.volume_information.as_ref()?;
        let local = info.local_path.as_deref().unwrap_or("");
        let common = info.common_path.as_deref().unwrap_or("");
        Some(format!("{local}{common}"))
    }

    /// The full UNC network path to the target: the network share's name
    /// joined with `common_path`, present only when `LocationInformation`'s
    /// network-share record is present.
    pub fn network_path(&self) -> Option<String> {
        let info = &self.location_information;
        let share = info.network_share_information.as_ref()?;
        let share_name = share.share_name.as_deref().unwrap_or("");
        let common = info.common_path.as_deref().unwrap_or("");
        Some(format!("{share_name}{common}"))
    }

    /// The environment-variable-encoded target location, if an
    /// `EnvVarLocation` data block is present.
    pub fn environment_variables_location(&self) -> Option<String> {
        self.extra_data.blocks.iter().find_map(|b| match &b.value {
            DataBlockValue::EnvVarLocation(s) => {
                Some(extra_data::canonical_string(s, self.ascii_codepage))
            }
            _ => None,
        })
    }

    /// The NetBIOS machine identifier from a `DistributedLinkTracker` data
    /// block, if present.
    pub fn machine_identifier(&self) -> Option<String> {
        self.distributed_link_tracker()
            .map(|t| t.machine_identifier_str(self.ascii_codepage))
    }

    /// Borrows the `DistributedLinkTracker` data block, if present.
    pub fn distributed_link_tracker(&self) -> Option<&extra_data::TrackerDataBlock> {
        self.extra_data.blocks.iter().find_map(|b| match &b.value {
            DataBlockValue::DistributedLinkTracker(t) => Some(t),
            _ => None,
        })
    }

    /// The volume droid GUID (raw packed bytes), if a `DistributedLinkTracker`
    /// block is present.
    pub fn droid_volume(&self) -> Option<&[u8; 16]> {
        self.distributed_link_tracker().map(|t| &t.droid_volume_identifier)
    }

    /// The file droid GUID (raw packed bytes), if a `DistributedLinkTracker`
    /// block is present.
    pub fn droid_file(&self) -> Option<&[u8; 16]> {
        self.distributed_link_tracker().map(|t| &t.droid_file_identifier)
    }

    /// The volume droid GUID recorded at link creation time, if a
    /// `DistributedLinkTracker` block is present.
    pub fn birth_droid_volume(&self) -> Option<&[u8; 16]> {
        self.distributed_link_tracker()
            .map(|t| &t.birth_droid_volume_identifier)
    }

    /// The file droid GUID recorded at link creation time, if a
    /// `DistributedLinkTracker` block is present.
    pub fn birth_droid_file(&self) -> Option<&[u8; 16]> {
        self.distributed_link_tracker()
            .map(|t| &t.birth_droid_file_identifier)
    }

    /// The creation `FILETIME`, raw.
    pub fn creation_time(&self) -> u64 {
        self.header.creation_time
    }

    /// The access `FILETIME`, raw.
    pub fn access_time(&self) -> u64 {
        self.header.access_time
    }

    /// The write (modification) `FILETIME`, raw.
    pub fn write_time(&self) -> u64 {
        self.header.write_time
    }

    /// The creation time as a `DateTime`, if non-zero.
    #[cfg(feature = "chrono")]
    pub fn created_on(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.header.created_on
    }

    /// The access time as a `DateTime`, if non-zero.
    #[cfg(feature = "chrono")]
    pub fn accessed_on(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.header.accessed_on
    }

    /// The write (modification) time as a `DateTime`, if non-zero.
    #[cfg(feature = "chrono")]
    pub fn modified_on(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.header.modified_on
    }

    /// Path this shortcut was loaded from, if known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl TryFrom<&Path> for ShortcutFile {
    type Error = ParseError;

    fn try_from(p: &Path) -> Result<Self, Self::Error> {
        let mut f = std::fs::File::open(p).map_err(ParseError::Open)?;
        ShortcutFile::new(&mut f).map(|mut shortcut| {
            shortcut.path = Some(p.to_path_buf());
            shortcut
        })
    }
}

impl TryFrom<&[u8]> for ShortcutFile {
    type Error = ParseError;

    fn try_from(mut p: &[u8]) -> Result<Self, Self::Error> {
        ShortcutFile::new(&mut p)
    }
}

impl TryFrom<Vec<u8>> for ShortcutFile {
    type Error = ParseError;

    fn try_from(p: Vec<u8>) -> Result<Self, Self::Error> {
        ShortcutFile::new(&mut &p[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_lnk(link_flags: LinkFlags) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(76);
        bytes.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        bytes.extend_from_slice(&CLASS_IDENTIFIER.to_le_bytes());
        bytes.extend_from_slice(&link_flags.bits().to_le_bytes());
        bytes.extend_from_slice(&[0u8; 76 - 4 - 16 - 4]);
        bytes.extend_from_slice(&0u32.to_le_bytes()); // data block sentinel
        bytes
    }

    #[test]
    fn parses_bare_header_only_file() {
        let bytes = minimal_lnk(LinkFlags::empty());
        let shortcut = ShortcutFile::try_from(bytes).unwrap();
        assert!(!shortcut.link_refers_to_file());
        assert!(shortcut.description().is_none());
        assert!(shortcut.warnings.is_empty());
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = vec![0u8; 10];
        let err = ShortcutFile::try_from(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, ParseError::Header(_)));
    }

    #[test]
    fn link_target_id_list_and_name_roundtrip() {
        let mut bytes = Vec::with_capacity(76);
        let flags = LinkFlags::HAS_LINK_TARGET_ID_LIST | LinkFlags::HAS_NAME;
        bytes.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        bytes.extend_from_slice(&CLASS_IDENTIFIER.to_le_bytes());
        bytes.extend_from_slice(&flags.bits().to_le_bytes());
        bytes.extend_from_slice(&[0u8; 76 - 4 - 16 - 4]);

        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        bytes.extend_from_slice(&5u16.to_le_bytes());
        bytes.extend_from_slice(b"hello");

        bytes.extend_from_slice(&0u32.to_le_bytes());

        let shortcut = ShortcutFile::try_from(bytes).unwrap();
        assert_eq!(shortcut.link_target_id_list.item_id_list(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(
            shortcut.description().unwrap().to_utf8(Codepage::Ascii),
            "hello"
        );
    }

    #[test]
    fn unsupported_tracker_version_fails_the_whole_parse() {
        let mut bytes = minimal_lnk(LinkFlags::empty());
        bytes.truncate(bytes.len() - 4); // drop the sentinel we'll replace

        let mut payload = Vec::new();
        payload.extend_from_slice(&88u32.to_le_bytes());
        payload.extend_from_slice(&1u32.to_le_bytes()); // unsupported version
        payload.extend_from_slice(&[0u8; 80]);

        let size = (payload.len() + 8) as u32;
        bytes.extend_from_slice(&size.to_le_bytes());
        bytes.extend_from_slice(&0xA000_0003u32.to_le_bytes());
        bytes.extend_from_slice(&payload);

        let err = ShortcutFile::try_from(bytes).unwrap_err();
        assert!(matches!(err, ParseError::ExtraData(_)));
    }
}
