//! The [`ByteSource`] contract the parser drives its reads through.
//!
//! Per the design this is an external collaborator: something that can seek
//! to an absolute offset, read an exact number of bytes, and report its
//! total length. The teacher's `Lnk::new` takes any `S: std::io::Read` and
//! reads it to a `Vec<u8>` up front; this crate keeps that approach and
//! expresses the contract over the resulting in-memory `Cursor<Vec<u8>>`.

use std::io::{Cursor, Read, Seek, SeekFrom};

/// Random-access read of exact byte counts from a seekable source of known
/// total length.
pub trait ByteSource {
    /// Seeks to an absolute byte offset.
    fn seek(&mut self, offset: u64) -> std::io::Result<()>;

    /// Fills `buf` completely or fails.
    fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()>;

    /// Total length of the source, in bytes.
    fn len(&self) -> u64;

    /// Current read position.
    fn position(&mut self) -> u64;
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    fn seek(&mut self, offset: u64) -> std::io::Result<()> {
        Seek::seek(self, SeekFrom::Start(offset)).map(|_| ())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        Read::read_exact(self, buf)
    }

    fn len(&self) -> u64 {
        self.get_ref().as_ref().len() as u64
    }

    fn position(&mut self) -> u64 {
        Seek::stream_position(self).unwrap_or_default()
    }
}

/// Reads an entire `Read` source into memory and wraps it as a [`ByteSource`].
///
/// This is what `ShortcutFile::parse` does with whatever the caller passes
/// in, mirroring the teacher's `Lnk::new(&mut S)` which does
/// `reader.read_to_end(&mut data_buf)` before constructing its cursor.
pub fn buffer_of<R: Read>(mut reader: R) -> std::io::Result<Cursor<Vec<u8>>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(Cursor::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reports_length_and_position() {
        let mut src = Cursor::new(vec![1u8, 2, 3, 4, 5]);
        assert_eq!(ByteSource::len(&src), 5);
        ByteSource::seek(&mut src, 2).unwrap();
        assert_eq!(src.position(), 2);
        let mut buf = [0u8; 2];
        ByteSource::read_exact(&mut src, &mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
    }
}
