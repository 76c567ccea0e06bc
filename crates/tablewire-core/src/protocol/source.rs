//! Byte sources: the single "read exactly N bytes" capability every decoder
//! is written against.
//!
//! `ReadSource` wraps a blocking `std::io::Read` (the transport's stream);
//! `BufSource` wraps an in-memory `bytes::Buf`. Both report a short read as
//! `TableWireError::Truncated` instead of zero-filling.

use std::io::{ErrorKind, Read};

use bytes::Buf;

use crate::error::{Result, TableWireError};

/// Exact-length reads over some byte supply.
pub trait ByteSource {
    /// Fill all of `dst` or fail with `Truncated`.
    fn read_exact_into(&mut self, dst: &mut [u8]) -> Result<()>;

    fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        self.read_exact_into(&mut out)?;
        Ok(out)
    }

    /// Read `len` bytes into a fresh buffer.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.read_exact_into(&mut out)?;
        Ok(out)
    }
}

/// Blocking stream source. At most one decode may be in flight per stream.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    consumed: usize,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// Bytes pulled from the stream so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Short read: whatever arrived counts as consumed.
    fn short_read(&mut self, needed: usize, available: usize) -> TableWireError {
        self.consumed += available;
        TableWireError::Truncated { needed, available }
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read_exact_into(&mut self, dst: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < dst.len() {
            match self.inner.read(&mut dst[filled..]) {
                Ok(0) => return Err(self.short_read(dst.len(), filled)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(self.short_read(dst.len(), filled));
                }
                Err(e) => return Err(TableWireError::Io(e)),
            }
        }
        self.consumed += filled;
        Ok(())
    }

    // Grow with the data actually received so a bogus length prefix cannot
    // force a huge allocation up front.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match (&mut self.inner).take(len as u64).read_to_end(&mut out) {
            Ok(_) => {}
            // bytes read before the error stay in `out`
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {}
            Err(e) => return Err(TableWireError::Io(e)),
        }
        if out.len() < len {
            return Err(self.short_read(len, out.len()));
        }
        self.consumed += out.len();
        Ok(out)
    }
}

/// In-memory cursor source (non-blocking, offset arithmetic via `Buf`).
#[derive(Debug)]
pub struct BufSource<B> {
    buf: B,
}

impl<B: Buf> BufSource<B> {
    pub fn new(buf: B) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }
}

impl<B: Buf> ByteSource for BufSource<B> {
    fn read_exact_into(&mut self, dst: &mut [u8]) -> Result<()> {
        let available = self.buf.remaining();
        if available < dst.len() {
            return Err(TableWireError::Truncated {
                needed: dst.len(),
                available,
            });
        }
        self.buf.copy_to_slice(dst);
        Ok(())
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let available = self.buf.remaining();
        if available < len {
            return Err(TableWireError::Truncated {
                needed: len,
                available,
            });
        }
        Ok(self.buf.copy_to_bytes(len).to_vec())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    /// Hands out one byte per `read` call, like a slow socket.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match (self.0.split_first(), buf.first_mut()) {
                (Some((b, rest)), Some(slot)) => {
                    *slot = *b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn stream_reassembles_partial_reads() {
        let mut src = ReadSource::new(Trickle(&[1, 2, 3, 4, 5]));
        assert_eq!(src.read_array::<3>().unwrap(), [1, 2, 3]);
        assert_eq!(src.read_vec(2).unwrap(), vec![4, 5]);
        assert_eq!(src.consumed(), 5);
    }

    #[test]
    fn stream_short_read_is_truncation() {
        let mut src = ReadSource::new(&[1u8, 2][..]);
        let err = src.read_array::<4>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Truncated);
        match err {
            TableWireError::Truncated { needed, available } => {
                assert_eq!((needed, available), (4, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    /// Reports exhaustion as `UnexpectedEof` instead of `Ok(0)`.
    struct EofErr<'a>(&'a [u8]);

    impl Read for EofErr<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() && !buf.is_empty() {
                return Err(ErrorKind::UnexpectedEof.into());
            }
            self.0.read(buf)
        }
    }

    #[test]
    fn eof_error_from_reader_is_truncation() {
        let mut src = ReadSource::new(EofErr(&[1, 2]));
        match src.read_array::<4>().unwrap_err() {
            TableWireError::Truncated { needed, available } => {
                assert_eq!((needed, available), (4, 2));
            }
            other => panic!("unexpected {other:?}"),
        }

        let mut src = ReadSource::new(EofErr(&[1, 2, 3]));
        match src.read_vec(10).unwrap_err() {
            TableWireError::Truncated { needed, available } => {
                assert_eq!((needed, available), (10, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(src.consumed(), 3);
    }

    #[test]
    fn other_reader_errors_stay_io() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(ErrorKind::ConnectionReset.into())
            }
        }
        let mut src = ReadSource::new(Broken);
        assert_eq!(src.read_u8().unwrap_err().code(), ErrorCode::Io);
        assert_eq!(src.read_vec(3).unwrap_err().code(), ErrorCode::Io);
    }

    #[test]
    fn stream_read_vec_does_not_trust_length() {
        let mut src = ReadSource::new(&[9u8; 3][..]);
        let err = src.read_vec(u32::MAX as usize).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Truncated);
    }

    #[test]
    fn buffer_checks_remaining_before_copy() {
        let mut src = BufSource::new(&[7u8, 8][..]);
        assert_eq!(src.read_u8().unwrap(), 7);
        assert_eq!(src.read_vec(2).unwrap_err().code(), ErrorCode::Truncated);
        // failed read leaves the cursor untouched
        assert_eq!(src.remaining(), 1);
    }
}
