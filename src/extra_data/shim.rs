use crate::byte_source::ByteSource;
use crate::cursor::read_to_end_vec;
use crate::error::{Breadcrumb, ExtraDataError};

const SECTION: &str = "ShimDataBlock";

/// The ShimDataBlock structure specifies the name of a shim that can be applied when activating a link target.
#[derive(Clone, Debug, Default)]
pub struct ShimDataBlock {
    /// A Unicode string that specifies the name of a shim layer to apply to a link target when it is being activated, as raw UTF-16LE bytes.
    pub layer_name: Vec<u8>,
}

impl ShimDataBlock {
    /// Decodes a `ShimDataBlock` from the bytes following a data block's
    /// signature. `layer_name` is whatever bytes remain in `cursor`; the
    /// caller has already sliced the payload to the block's declared size.
    pub(crate) fn new(cursor: &mut impl ByteSource) -> Result<Self, ExtraDataError> {
        let start = cursor.position();
        let layer_name = read_to_end_vec(cursor)
            .map_err(|_| ExtraDataError::ShortInput(Breadcrumb::new(SECTION, "layer_name", start)))?;
        Ok(Self { layer_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn decodes_layer_name() {
        let units: Vec<u16> = "Win8RTM".encode_utf16().collect();
        let mut bytes = Vec::new();
        for u in units {
            bytes.extend_from_slice(&u.to_le_bytes());
        }
        let mut cursor = Cursor::new(bytes.clone());
        let block = ShimDataBlock::new(&mut cursor).unwrap();
        assert_eq!(block.layer_name, bytes);
    }
}
