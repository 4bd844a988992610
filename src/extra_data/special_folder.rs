use crate::byte_source::ByteSource;
use crate::cursor::read_u32;
use crate::error::{Breadcrumb, ExtraDataError};

const SECTION: &str = "SpecialFolderDataBlock";

/// The SpecialFolderDataBlock structure specifies the location of a special folder. This data can be used
/// when a link target is a special folder to keep track of the folder, so that the link target IDList can be
/// translated when the link is loaded.
#[derive(Clone, Debug, Default)]
pub struct SpecialFolderDataBlock {
    /// A 32-bit, unsigned integer that specifies the folder integer ID.
    pub special_folder_id: u32,

    /// A 32-bit, unsigned integer that specifies the location of the ItemID of the first child segment of the IDList specified by SpecialFolderID. This value is the offset, in bytes, into the link target IDList.
    pub offset: u32,
}

impl SpecialFolderDataBlock {
    /// Decodes a `SpecialFolderDataBlock` from the bytes following a data
    /// block's signature.
    pub(crate) fn new(cursor: &mut impl ByteSource) -> Result<Self, ExtraDataError> {
        let offset_pos = cursor.position();
        Ok(Self {
            special_folder_id: read_u32(cursor).map_err(|_| {
                ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "special_folder_id", offset_pos))
            })?,
            offset: read_u32(cursor).map_err(|_| {
                ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "offset", offset_pos + 4))
            })?,
        })
    }
}
