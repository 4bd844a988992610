use crate::byte_source::ByteSource;
use crate::cursor::{read_u128, read_u32};
use crate::error::{Breadcrumb, ExtraDataError};

const SECTION: &str = "KnownFolderDataBlock";

/// The KnownFolderDataBlock structure specifies the location of a known folder. This data can be used when a link target is a known folder to keep track of the folder so that the link target IDList can be translated when the link is loaded.
#[derive(Clone, Debug, Default)]
pub struct KnownFolderDataBlock {
    /// A value in GUID packet representation ([MS-DTYP] section 2.3.4.2) that specifies the folder GUID ID.
    pub known_folder_id: u128,

    /// A 32-bit, unsigned integer that specifies the location of the ItemID of the first child segment of the IDList specified by KnownFolderID. This value is the offset, in bytes, into the link target IDList.
    pub offset: u32,
}

impl KnownFolderDataBlock {
    /// Decodes a `KnownFolderDataBlock` from the bytes following a data
    /// block's signature.
    pub(crate) fn new(cursor: &mut impl ByteSource) -> Result<Self, ExtraDataError> {
        let start = cursor.position();
        Ok(Self {
            known_folder_id: read_u128(cursor).map_err(|_| {
                ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "known_folder_id", start))
            })?,
            offset: read_u32(cursor).map_err(|_| {
                ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "offset", start + 16))
            })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn decodes_known_folder_id_and_offset() {
        let mut bytes = vec![0u8; 16];
        bytes[0] = 0xAA;
        bytes.extend_from_slice(&42u32.to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let block = KnownFolderDataBlock::new(&mut cursor).unwrap();
        assert_eq!(block.offset, 42);
    }

    #[test]
    fn short_input_is_an_error() {
        let mut cursor = Cursor::new(vec![0u8; 4]);
        assert!(KnownFolderDataBlock::new(&mut cursor).is_err());
    }
}
