use crate::byte_source::ByteSource;
use crate::cursor::read_to_end_vec;
use crate::error::{Breadcrumb, ExtraDataError};

const SECTION: &str = "ShellItemIdListDataBlock";

/// The VistaAndAboveIDListDataBlock structure specifies an alternate IDList
/// that can be used instead of `LinkTargetIdList` on platforms that support
/// it. Named for what it carries rather than the Windows version it was
/// introduced in.
#[derive(Clone, Debug, Default)]
pub struct ShellItemIdListDataBlock {
    /// An IDList structure (section 2.2.1), retained raw and not walked.
    pub id_list: Vec<u8>,
}

impl ShellItemIdListDataBlock {
    /// Decodes a `ShellItemIdListDataBlock` from the bytes following a data
    /// block's signature.
    pub(crate) fn new(cursor: &mut impl ByteSource) -> Result<Self, ExtraDataError> {
        let start = cursor.position();
        let id_list = read_to_end_vec(cursor)
            .map_err(|_| ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "id_list", start)))?;
        Ok(Self { id_list })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn retains_raw_id_list_bytes() {
        let mut cursor = Cursor::new(vec![9, 8, 7]);
        let block = ShellItemIdListDataBlock::new(&mut cursor).unwrap();
        assert_eq!(block.id_list, vec![9, 8, 7]);
    }
}
