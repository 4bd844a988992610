//! The DataBlock stream: a sequence of `{size, signature, payload}` records
//! following the StringData section, terminated by a zero-size sentinel.
//!
//! Unlike the rest of the parser, a single bad record here doesn't abort the
//! whole file: an unrecognized signature is retained as [`DataBlockValue::Opaque`],
//! and a recognized signature whose payload fails to decode keeps its raw
//! bytes and surfaces a [`Warning`] instead. The one exception is
//! `DistributedLinkTracker`'s unsupported-version check, which is a fatal
//! cross-field consistency violation per the rest of this crate's error
//! model, not a recoverable one.

mod console;
mod console_codepage;
mod id_list;
mod known_folder;
mod property_store;
mod shim;
mod special_folder;
mod strings_block;
mod tracker;

pub use console::{ConsoleDataBlock, FileAttributes, FontFamily};
pub use console_codepage::ConsoleCodepageDataBlock;
pub use id_list::ShellItemIdListDataBlock;
pub use known_folder::KnownFolderDataBlock;
pub use property_store::PropertyStoreDataBlock;
pub use shim::ShimDataBlock;
pub use special_folder::SpecialFolderDataBlock;
pub use strings_block::{canonical_string, StringsBlock};
pub use tracker::TrackerDataBlock;

use crate::byte_source::ByteSource;
use crate::codepage::Codepage;
use crate::cursor::read_u32;
use crate::error::{Breadcrumb, ExtraDataError, Warning};
use std::io::Cursor;

const SECTION: &str = "DataBlock";

/// Upper bound on a single data block's declared size. Nothing in the
/// format mandates a specific value; this is a defensive cap against a
/// corrupt or hostile `block_size` field, well above anything a real
/// `.lnk` file's extra data blocks need (the largest defined block,
/// a strings block, is 788 bytes).
pub const MAX_ALLOC: u32 = 0x0001_0000;

/// Known data-block signatures, in the order the spec's table lists them.
const SIG_ENV_VAR_LOCATION: u32 = 0xA000_0001;
const SIG_CONSOLE_PROPS: u32 = 0xA000_0002;
const SIG_DISTRIBUTED_LINK_TRACKER: u32 = 0xA000_0003;
const SIG_CONSOLE_CODEPAGE: u32 = 0xA000_0004;
const SIG_SPECIAL_FOLDER: u32 = 0xA000_0005;
const SIG_DARWIN_PROPS: u32 = 0xA000_0006;
const SIG_ICON_LOCATION: u32 = 0xA000_0007;
const SIG_SHIM_LAYER: u32 = 0xA000_0008;
const SIG_METADATA_PROPERTY_STORE: u32 = 0xA000_0009;
const SIG_KNOWN_FOLDER: u32 = 0xA000_000B;
const SIG_SHELL_ITEM_ID_LIST: u32 = 0xA000_000C;

/// The decoded form of a single data block's payload. `Opaque` is used both
/// for unrecognized signatures and, implicitly, whenever a recognized one
/// fails to decode (the raw bytes are kept in [`DataBlock::payload`] either
/// way; this enum only carries the additional structured view).
#[derive(Clone, Debug)]
pub enum DataBlockValue {
    /// Environment-variable location (0xA0000001).
    EnvVarLocation(StringsBlock),
    /// Darwin application properties (0xA0000006).
    DarwinProperties(StringsBlock),
    /// Icon location, block form (0xA0000007).
    IconLocation(StringsBlock),
    /// Distributed link tracker properties (0xA0000003).
    DistributedLinkTracker(TrackerDataBlock),
    /// Special-folder location (0xA0000005).
    SpecialFolder(SpecialFolderDataBlock),
    /// Known-folder location (0xA000000B).
    KnownFolder(KnownFolderDataBlock),
    /// Console display properties (0xA0000002).
    Console(Box<ConsoleDataBlock>),
    /// Console code page (0xA0000004).
    ConsoleCodepage(ConsoleCodepageDataBlock),
    /// Metadata property store (0xA0000009), not further decoded.
    MetadataPropertyStore(PropertyStoreDataBlock),
    /// Shim-layer properties (0xA0000008). Not named in the signature-to-
    /// variant list but present in the signature table; supplemented here
    /// since the teacher crate already carries a full decoder for it.
    ShimLayerProperties(ShimDataBlock),
    /// Shell-item identifier list (0xA000000C), alternate target IDList for
    /// platforms that support it. Likewise supplemented from the signature
    /// table; the identifier list itself is retained raw, not walked.
    ShellItemIdList(ShellItemIdListDataBlock),
    /// Any signature not in the recognized set, or a recognized signature
    /// whose payload failed to decode.
    Opaque(Vec<u8>),
}

/// A single record in the DataBlock stream.
#[derive(Clone, Debug)]
pub struct DataBlock {
    /// The declared `block_size`, including the 4 bytes of this field.
    pub size: u32,
    /// The 4-byte signature identifying the payload's shape.
    pub signature: u32,
    /// The raw bytes following the signature (i.e. `size - 8` bytes).
    pub payload: Vec<u8>,
    /// The structured decode of `payload`, or `Opaque` if unrecognized or
    /// undecodable.
    pub value: DataBlockValue,
}

/// The ordered stream of data blocks trailing the StringData section.
#[derive(Clone, Debug, Default)]
pub struct ExtraData {
    /// Every block encountered, in file order.
    pub blocks: Vec<DataBlock>,
}

impl ExtraData {
    /// Reads the DataBlock stream from `cursor` until the zero-size
    /// sentinel, or fails fatally on a malformed frame or an unsupported
    /// `DistributedLinkTracker` version.
    pub fn new(
        cursor: &mut impl ByteSource,
        codepage: Codepage,
        warnings: &mut Vec<Warning>,
    ) -> Result<Self, ExtraDataError> {
        let mut blocks = Vec::new();

        loop {
            let frame_start = cursor.position();
            let block_size = read_u32(cursor)
                .map_err(|_| ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "block_size", frame_start)))?;

            if block_size == 0 {
                break;
            }

            if !(4..=MAX_ALLOC + 4).contains(&block_size) {
                return Err(ExtraDataError::SizeOutOfBounds(
                    block_size,
                    Breadcrumb::new(SECTION, "block_size", frame_start),
                ));
            }

            let remaining = cursor.len() - cursor.position();
            if block_size as u64 > remaining + 4 {
                return Err(ExtraDataError::SizeOutOfBounds(
                    block_size,
                    Breadcrumb::new(SECTION, "block_size", frame_start),
                ));
            }

            let mut frame = vec![0u8; (block_size - 4) as usize];
            cursor
                .read_exact(&mut frame)
                .map_err(|_| ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "payload", frame_start + 4)))?;

            let mut frame_cursor = Cursor::new(frame);
            let signature = read_u32(&mut frame_cursor).map_err(|_| {
                ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "signature", frame_start + 4))
            })?;
            let payload = frame_cursor.into_inner().split_off(4);

            let decoded = Self::decode_payload(signature, &payload, codepage, warnings)?;

            blocks.push(DataBlock {
                size: block_size,
                signature,
                payload,
                value: decoded,
            });
        }

        Ok(Self { blocks })
    }

    fn decode_payload(
        signature: u32,
        payload: &[u8],
        codepage: Codepage,
        warnings: &mut Vec<Warning>,
    ) -> Result<DataBlockValue, ExtraDataError> {
        match signature {
            SIG_ENV_VAR_LOCATION => {
                let (block, unsupported) = StringsBlock::decode(payload, codepage);
                if unsupported {
                    warnings.push(Warning::StringsBlockUnsupported { signature });
                }
                Ok(DataBlockValue::EnvVarLocation(block))
            }
            SIG_DARWIN_PROPS => {
                let (block, unsupported) = StringsBlock::decode(payload, codepage);
                if unsupported {
                    warnings.push(Warning::StringsBlockUnsupported { signature });
                }
                Ok(DataBlockValue::DarwinProperties(block))
            }
            SIG_ICON_LOCATION => {
                let (block, unsupported) = StringsBlock::decode(payload, codepage);
                if unsupported {
                    warnings.push(Warning::StringsBlockUnsupported { signature });
                }
                Ok(DataBlockValue::IconLocation(block))
            }
            SIG_DISTRIBUTED_LINK_TRACKER => {
                let mut c = Cursor::new(payload.to_vec());
                match TrackerDataBlock::new(&mut c) {
                    Ok(block) => Ok(DataBlockValue::DistributedLinkTracker(block)),
                    // Not recoverable: propagate fatally.
                    Err(e @ ExtraDataError::UnsupportedVersion(_, _)) => Err(e),
                    Err(e) => {
                        log::warn!("distributed link tracker block failed to decode: {e}");
                        warnings.push(Warning::DataBlockDecodeFailed {
                            signature,
                            reason: e.to_string(),
                        });
                        Ok(DataBlockValue::Opaque(payload.to_vec()))
                    }
                }
            }
            SIG_SPECIAL_FOLDER => {
                Self::try_decode(payload, signature, warnings, SpecialFolderDataBlock::new)
                    .map(DataBlockValue::SpecialFolder)
                    .or_else(|()| Ok(DataBlockValue::Opaque(payload.to_vec())))
            }
            SIG_KNOWN_FOLDER => {
                Self::try_decode(payload, signature, warnings, KnownFolderDataBlock::new)
                    .map(DataBlockValue::KnownFolder)
                    .or_else(|()| Ok(DataBlockValue::Opaque(payload.to_vec())))
            }
            SIG_CONSOLE_PROPS => {
                Self::try_decode(payload, signature, warnings, ConsoleDataBlock::new)
                    .map(|b| DataBlockValue::Console(Box::new(b)))
                    .or_else(|()| Ok(DataBlockValue::Opaque(payload.to_vec())))
            }
            SIG_CONSOLE_CODEPAGE => {
                Self::try_decode(payload, signature, warnings, ConsoleCodepageDataBlock::new)
                    .map(DataBlockValue::ConsoleCodepage)
                    .or_else(|()| Ok(DataBlockValue::Opaque(payload.to_vec())))
            }
            SIG_METADATA_PROPERTY_STORE => {
                Self::try_decode(payload, signature, warnings, PropertyStoreDataBlock::new)
                    .map(DataBlockValue::MetadataPropertyStore)
                    .or_else(|()| Ok(DataBlockValue::Opaque(payload.to_vec())))
            }
            SIG_SHIM_LAYER => {
                Self::try_decode(payload, signature, warnings, ShimDataBlock::new)
                    .map(DataBlockValue::ShimLayerProperties)
                    .or_else(|()| Ok(DataBlockValue::Opaque(payload.to_vec())))
            }
            SIG_SHELL_ITEM_ID_LIST => {
                Self::try_decode(payload, signature, warnings, ShellItemIdListDataBlock::new)
                    .map(DataBlockValue::ShellItemIdList)
                    .or_else(|()| Ok(DataBlockValue::Opaque(payload.to_vec())))
            }
            other => {
                warnings.push(Warning::UnknownDataBlock {
                    signature: other,
                    size: payload.len() as u32 + 8,
                });
                Ok(DataBlockValue::Opaque(payload.to_vec()))
            }
        }
    }

    /// Runs `decode` over a fresh cursor on `payload`, turning a decode
    /// failure into a logged, collected [`Warning`] rather than propagating
    /// it — the caller falls back to `Opaque` retention.
    fn try_decode<T>(
        payload: &[u8],
        signature: u32,
        warnings: &mut Vec<Warning>,
        decode: impl FnOnce(&mut Cursor<Vec<u8>>) -> Result<T, ExtraDataError>,
    ) -> Result<T, ()> {
        let mut c = Cursor::new(payload.to_vec());
        match decode(&mut c) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::warn!("data block 0x{signature:08x} failed to decode: {e}");
                warnings.push(Warning::DataBlockDecodeFailed {
                    signature,
                    reason: e.to_string(),
                });
                Err(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_bytes(signature: u32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let size = (payload.len() + 8) as u32;
        bytes.extend_from_slice(&size.to_le_bytes());
        bytes.extend_from_slice(&signature.to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn terminates_on_zero_sentinel() {
        let mut cursor = Cursor::new(0u32.to_le_bytes().to_vec());
        let mut warnings = Vec::new();
        let extra = ExtraData::new(&mut cursor, Codepage::Ascii, &mut warnings).unwrap();
        assert!(extra.blocks.is_empty());
    }

    #[test]
    fn unknown_signature_is_opaque_and_warns() {
        let mut bytes = block_bytes(0xDEAD_BEEF, &[1, 2, 3, 4]);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let mut warnings = Vec::new();
        let extra = ExtraData::new(&mut cursor, Codepage::Ascii, &mut warnings).unwrap();
        assert_eq!(extra.blocks.len(), 1);
        assert!(matches!(extra.blocks[0].value, DataBlockValue::Opaque(_)));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn decodes_special_folder_block() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&7u32.to_le_bytes());
        payload.extend_from_slice(&11u32.to_le_bytes());
        let mut bytes = block_bytes(SIG_SPECIAL_FOLDER, &payload);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let mut warnings = Vec::new();
        let extra = ExtraData::new(&mut cursor, Codepage::Ascii, &mut warnings).unwrap();
        match &extra.blocks[0].value {
            DataBlockValue::SpecialFolder(b) => {
                assert_eq!(b.special_folder_id, 7);
                assert_eq!(b.offset, 11);
            }
            other => panic!("unexpected value: {other:?}"),
        }
        assert!(warnings.is_empty());
    }

    #[test]
    fn distributed_link_tracker_unsupported_version_is_fatal() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&88u32.to_le_bytes());
        payload.extend_from_slice(&1u32.to_le_bytes()); // bad version
        payload.extend_from_slice(&[0u8; 80]);
        let bytes = block_bytes(SIG_DISTRIBUTED_LINK_TRACKER, &payload);
        let mut cursor = Cursor::new(bytes);
        let mut warnings = Vec::new();
        let err = ExtraData::new(&mut cursor, Codepage::Ascii, &mut warnings).unwrap_err();
        assert!(matches!(err, ExtraDataError::UnsupportedVersion(1, _)));
    }

    #[test]
    fn rejects_oversized_block() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(MAX_ALLOC + 5).to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let mut warnings = Vec::new();
        let err = ExtraData::new(&mut cursor, Codepage::Ascii, &mut warnings).unwrap_err();
        assert!(matches!(err, ExtraDataError::SizeOutOfBounds(_, _)));
    }
}
