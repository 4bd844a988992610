//! Definitions for the
//! [LinkTargetIDList](https://docs.microsoft.com/en-us/openspecs/windows_protocols/ms-shllink/881d7a83-07a5-4702-93e3-f9fc34c3e1e4)
//! type.
//!
//! The shell item identifier list is not walked here; only its raw bytes
//! are retained, per the crate's explicit scope cut against tree-decoding
//! PIDLs.

use crate::byte_source::ByteSource;
use crate::cursor::{read_exact_vec, read_u16};
use crate::error::{Breadcrumb, LinkTargetIdListError};
use crate::LinkFlags;

/// The LinkTargetIDList structure specifies the target of the link. The presence of this optional
/// structure is specified by the `HAS_LINK_TARGET_ID_LIST` bit in the `ShellLinkHeader`'s
/// `LinkFlags`. The ItemIDList it carries is retained only as opaque bytes.
#[derive(Clone, Debug, Default)]
pub struct LinkTargetIdList {
    /// The raw bytes of this structure, including the 2-byte size prefix.
    /// Empty if the header's `HAS_LINK_TARGET_ID_LIST` flag was not set.
    pub raw: Vec<u8>,
}

impl LinkTargetIdList {
    /// Reads a `LinkTargetIdList` from `cursor`, or returns an empty one if
    /// `link_flags` doesn't have the `HAS_LINK_TARGET_ID_LIST` bit set.
    pub fn new(
        cursor: &mut impl ByteSource,
        link_flags: LinkFlags,
    ) -> Result<Self, LinkTargetIdListError> {
        if !link_flags.contains(LinkFlags::HAS_LINK_TARGET_ID_LIST) {
            return Ok(Self::default());
        }

        let offset = cursor.position();
        let id_list_size = read_u16(cursor).map_err(|_| {
            LinkTargetIdListError::ShortInput(Breadcrumb::new(
                "LinkTargetIdList",
                "id_list_size",
                offset,
            ))
        })?;

        let payload = read_exact_vec(cursor, id_list_size as usize).map_err(|_| {
            LinkTargetIdListError::ShortInput(Breadcrumb::new(
                "LinkTargetIdList",
                "item_id_list",
                offset + 2,
            ))
        })?;

        let mut raw = Vec::with_capacity(payload.len() + 2);
        raw.extend_from_slice(&id_list_size.to_le_bytes());
        raw.extend_from_slice(&payload);

        Ok(Self { raw })
    }

    /// The serialized size of this structure, including the 2-byte prefix.
    /// Zero if the structure was absent.
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// The raw ItemIDList payload, excluding the 2-byte size prefix.
    pub fn item_id_list(&self) -> &[u8] {
        if self.raw.len() < 2 {
            &[]
        } else {
            &self.raw[2..]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn absent_when_flag_unset() {
        let mut cursor = Cursor::new(Vec::new());
        let list = LinkTargetIdList::new(&mut cursor, LinkFlags::empty()).unwrap();
        assert_eq!(list.size(), 0);
        assert!(list.item_id_list().is_empty());
    }

    #[test]
    fn retains_raw_bytes_including_prefix() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let mut cursor = Cursor::new(bytes);
        let list =
            LinkTargetIdList::new(&mut cursor, LinkFlags::HAS_LINK_TARGET_ID_LIST).unwrap();
        assert_eq!(list.size(), 5);
        assert_eq!(list.item_id_list(), &[0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn short_input_is_an_error() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&10u16.to_le_bytes());
        bytes.extend_from_slice(&[0xAA]);
        let mut cursor = Cursor::new(bytes);
        let err =
            LinkTargetIdList::new(&mut cursor, LinkFlags::HAS_LINK_TARGET_ID_LIST).unwrap_err();
        assert!(matches!(err, LinkTargetIdListError::ShortInput(_)));
    }
}
