use crate::byte_source::ByteSource;
use crate::codepage::Codepage;
use crate::cursor::read_u32;
use crate::error::{Breadcrumb, ExtraDataError};

const SECTION: &str = "DistributedLinkTracker";

/// The minimum legal value of `length` (the MS-SHLLINK "Length" field,
/// confusingly not the same as the data block's own `block_size`).
pub const MIN_LENGTH: u32 = 88;

/// The TrackerDataBlock structure specifies data that can be used to resolve a link target if it is not found
/// in its original location when the link is resolved. This data is passed to the Link Tracking service
/// [MS-DLTW] to find the link target.
#[derive(Clone, Debug, Default)]
pub struct TrackerDataBlock {
    /// A 32-bit, unsigned integer that specifies the size of the rest of the TrackerDataBlock structure, including this field. MUST be >= 88.
    pub length: u32,

    /// A 32-bit, unsigned integer. MUST be zero; any other value is a fatal,
    /// unsupported-version error for this block.
    pub version: u32,

    /// A NUL-padded, 16-byte string, as defined by the system default code
    /// page, that specifies the NetBIOS name of the machine where the link
    /// target was last known to reside.
    pub machine_identifier: [u8; 16],

    /// A GUID, in packet representation, used to find the link target with
    /// the Link Tracking service.
    pub droid_volume_identifier: [u8; 16],
    /// A GUID, in packet representation, used to find the link target with
    /// the Link Tracking service.
    pub droid_file_identifier: [u8; 16],
    /// A GUID, in packet representation, recorded when the link was created.
    pub birth_droid_volume_identifier: [u8; 16],
    /// A GUID, in packet representation, recorded when the link was created.
    pub birth_droid_file_identifier: [u8; 16],
}

impl TrackerDataBlock {
    /// Decodes a `TrackerDataBlock` from the bytes following a data block's
    /// signature. Fails fatally (not as a recoverable warning) if
    /// `data_version` is anything other than zero, or if `length` is below
    /// the minimum this structure defines.
    pub(crate) fn new(cursor: &mut impl ByteSource) -> Result<Self, ExtraDataError> {
        let offset = cursor.position();
        let length = read_u32(cursor)
            .map_err(|_| ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "length", offset)))?;
        if length < MIN_LENGTH {
            return Err(ExtraDataError::SizeOutOfBounds(
                length,
                Breadcrumb::new(SECTION, "length", offset),
            ));
        }

        let version = read_u32(cursor).map_err(|_| {
            ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "version", offset + 4))
        })?;
        if version != 0 {
            return Err(ExtraDataError::UnsupportedVersion(
                version,
                Breadcrumb::new(SECTION, "version", offset + 4),
            ));
        }

        let mut machine_identifier = [0u8; 16];
        cursor.read_exact(&mut machine_identifier).map_err(|_| {
            ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "machine_identifier", offset + 8))
        })?;

        let read_guid = |cursor: &mut dyn ByteSource, field: &'static str| {
            let mut guid = [0u8; 16];
            cursor.read_exact(&mut guid).map_err(|_| {
                ExtraDataError::ShortInput(Breadcrumb::new(SECTION, field, cursor.position()))
            })?;
            Ok::<_, ExtraDataError>(guid)
        };

        let droid_volume_identifier = read_guid(cursor, "droid_volume_identifier")?;
        let droid_file_identifier = read_guid(cursor, "droid_file_identifier")?;
        let birth_droid_volume_identifier = read_guid(cursor, "birth_droid_volume_identifier")?;
        let birth_droid_file_identifier = read_guid(cursor, "birth_droid_file_identifier")?;

        Ok(Self {
            length,
            version,
            machine_identifier,
            droid_volume_identifier,
            droid_file_identifier,
            birth_droid_volume_identifier,
            birth_droid_file_identifier,
        })
    }

    /// Decodes `machine_identifier` to UTF-8 using `codepage`, stopping at
    /// the first NUL pad byte.
    pub fn machine_identifier_str(&self, codepage: Codepage) -> String {
        let len = self
            .machine_identifier
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.machine_identifier.len());
        codepage.copy_from_ansi(&self.machine_identifier[..len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn valid_payload() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&88u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let mut machine = [0u8; 16];
        machine[..4].copy_from_slice(b"HOST");
        bytes.extend_from_slice(&machine);
        bytes.extend_from_slice(&[0u8; 64]);
        bytes
    }

    #[test]
    fn decodes_machine_identifier() {
        let mut cursor = Cursor::new(valid_payload());
        let block = TrackerDataBlock::new(&mut cursor).unwrap();
        assert_eq!(block.machine_identifier_str(Codepage::Ascii), "HOST");
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut bytes = valid_payload();
        bytes[4..8].copy_from_slice(&1u32.to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let err = TrackerDataBlock::new(&mut cursor).unwrap_err();
        assert!(matches!(err, ExtraDataError::UnsupportedVersion(1, _)));
    }

    #[test]
    fn rejects_length_below_minimum() {
        let mut bytes = valid_payload();
        bytes[0..4].copy_from_slice(&10u32.to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let err = TrackerDataBlock::new(&mut cursor).unwrap_err();
        assert!(matches!(err, ExtraDataError::SizeOutOfBounds(10, _)));
    }
}
