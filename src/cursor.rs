//! Little-endian integer decoders and bounded slice readers layered on top
//! of [`ByteSource`].
//!
//! Every reader module in this crate builds on these instead of repeating
//! `cursor.read_u32::<LE>()` boilerplate inline. Reading still happens
//! through the `byteorder` idiom the teacher crate uses throughout
//! `header.rs`/`link_info.rs`/`string_data.rs` — `ByteOrder::read_u32` and
//! friends decode a fixed-size buffer filled via [`ByteSource::read_exact`],
//! so every integer this crate parses goes through the same contract,
//! whatever concrete source backs it.

use crate::byte_source::ByteSource;
use byteorder::{ByteOrder, LE};
use std::io;

/// Reads a little-endian `u16` from `src`.
pub fn read_u16(src: &mut impl ByteSource) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    src.read_exact(&mut buf)?;
    Ok(LE::read_u16(&buf))
}

/// Reads a little-endian `u32` from `src`.
pub fn read_u32(src: &mut impl ByteSource) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    src.read_exact(&mut buf)?;
    Ok(LE::read_u32(&buf))
}

/// Reads a little-endian `u64` from `src`.
pub fn read_u64(src: &mut impl ByteSource) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    src.read_exact(&mut buf)?;
    Ok(LE::read_u64(&buf))
}

/// Reads a little-endian `u128` (used for packed GUIDs and 16-byte fields).
pub fn read_u128(src: &mut impl ByteSource) -> io::Result<u128> {
    let mut buf = [0u8; 16];
    src.read_exact(&mut buf)?;
    Ok(LE::read_u128(&buf))
}

/// Reads exactly `len` bytes into a freshly allocated `Vec<u8>`.
pub fn read_exact_vec(src: &mut impl ByteSource, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    src.read_exact(&mut buf)?;
    Ok(buf)
}

/// Reads every byte remaining in `src` (per `ByteSource::len`/`position`)
/// into a freshly allocated `Vec<u8>`.
pub fn read_to_end_vec(src: &mut impl ByteSource) -> io::Result<Vec<u8>> {
    let remaining = src.len().saturating_sub(src.position());
    read_exact_vec(src, remaining as usize)
}

/// Finds the index of the first NUL byte in `data`, if any.
pub fn find_nul(data: &[u8]) -> Option<usize> {
    data.iter().position(|&b| b == 0)
}

/// Finds the index (in `u16` units) of the first all-zero 16-bit code unit
/// in `data`, scanning two bytes at a time. Returns `None` if `data`'s
/// length is not even or no such unit exists.
pub fn find_nul16(data: &[u8]) -> Option<usize> {
    if data.len() % 2 != 0 {
        return None;
    }
    data.chunks_exact(2)
        .position(|chunk| chunk[0] == 0 && chunk[1] == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_le_integers_through_byte_source() {
        let mut cursor = Cursor::new(vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(read_u16(&mut cursor).unwrap(), 0x0201);
        assert_eq!(read_u16(&mut cursor).unwrap(), 0x0403);
    }

    #[test]
    fn read_to_end_vec_reads_remaining_bytes() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4, 5]);
        read_u16(&mut cursor).unwrap();
        assert_eq!(read_to_end_vec(&mut cursor).unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn finds_nul_in_ansi_bytes() {
        assert_eq!(find_nul(b"abc\0def"), Some(3));
        assert_eq!(find_nul(b"abcdef"), None);
    }

    #[test]
    fn finds_nul_in_utf16_halves() {
        let data = [b'a', 0, b'b', 0, 0, 0, b'c', 0];
        assert_eq!(find_nul16(&data), Some(2));
        assert_eq!(find_nul16(&[b'a', 0, b'b', 0]), None);
    }
}
