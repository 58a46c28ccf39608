//! Sequential byte sources the decoder reads from.

use crate::error::PnmError;

/// A sequential byte source.
///
/// `read` may return fewer bytes than requested. A return of `Ok(0)` for a
/// non-empty `buf` means the source is exhausted.
pub trait ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, PnmError>;

    /// Exact number of bytes left, when the source knows it.
    fn remaining_len(&self) -> Option<usize> {
        None
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, PnmError> {
        (**self).read(buf)
    }

    fn remaining_len(&self) -> Option<usize> {
        (**self).remaining_len()
    }
}

/// Cursor over an in-memory byte slice.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, PnmError> {
        let rest = self.remaining();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn remaining_len(&self) -> Option<usize> {
        Some(self.data.len() - self.pos)
    }
}

/// Adapter for any [`std::io::Read`].
///
/// Interrupted reads are retried; other I/O failures become
/// [`PnmError::StreamRead`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, PnmError> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(PnmError::StreamRead(alloc::format!("{e}"))),
            }
        }
    }
}
