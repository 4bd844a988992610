use crate::byte_source::ByteSource;
use crate::cursor::read_to_end_vec;
use crate::error::{Breadcrumb, ExtraDataError};

const SECTION: &str = "PropertyStoreDataBlock";

/// A PropertyStoreDataBlock structure specifies a set of properties that can be used by applications to store extra data in the shell link.
#[derive(Clone, Debug, Default)]
pub struct PropertyStoreDataBlock {
    /// A serialized property storage structure ([MS-PROPSTORE] section 2.2), retained raw and not decoded.
    pub property_store: Vec<u8>,
}

impl PropertyStoreDataBlock {
    /// Decodes a `PropertyStoreDataBlock` from the bytes following a data
    /// block's signature. The property storage structure itself isn't
    /// decoded, only retained as raw bytes.
    pub(crate) fn new(cursor: &mut impl ByteSource) -> Result<Self, ExtraDataError> {
        let start = cursor.position();
        let property_store = read_to_end_vec(cursor)
            .map_err(|_| ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "property_store", start)))?;
        Ok(Self { property_store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn retains_raw_bytes() {
        let mut cursor = Cursor::new(vec![1, 2, 3, 4]);
        let block = PropertyStoreDataBlock::new(&mut cursor).unwrap();
        assert_eq!(block.property_store, vec![1, 2, 3, 4]);
    }
}
