//! Buffered reader over a [`ByteSource`].
//!
//! Serves single bytes to the header tokenizer and bulk reads to the pixel
//! codec from one internal buffer, so the header and the payload are read
//! through the same cursor.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::PnmError;
use crate::source::ByteSource;

/// Default internal buffer size.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Smallest accepted buffer size. Must stay above the 12-byte header token
/// buffer; smaller requests are raised to this value.
pub const MIN_BUFFER_CAPACITY: usize = 16;

/// Buffered reader over a byte source.
///
/// Invariant: `position <= valid_length <= buffer.len()`.
pub struct BufferedReader<S> {
    source: S,
    buffer: Vec<u8>,
    position: usize,
    valid_length: usize,
    exhausted: bool,
}

impl<S: ByteSource> BufferedReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            buffer: vec![0u8; capacity.max(MIN_BUFFER_CAPACITY)],
            position: 0,
            valid_length: 0,
            exhausted: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes currently buffered and not yet consumed.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer[self.position..self.valid_length]
    }

    /// Bytes still readable, buffered plus what the source reports, if the
    /// source knows its length.
    pub fn remaining_len(&self) -> Option<usize> {
        let buffered = self.valid_length - self.position;
        if self.exhausted {
            return Some(buffered);
        }
        self.source.remaining_len()?.checked_add(buffered)
    }

    /// Give back the source. Buffered bytes are dropped.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Next byte, or `UnexpectedEof` once the source is exhausted.
    pub fn read_byte(&mut self) -> Result<u8, PnmError> {
        self.next_byte()?.ok_or(PnmError::UnexpectedEof)
    }

    /// Next byte, or `None` once the source is exhausted.
    pub fn next_byte(&mut self) -> Result<Option<u8>, PnmError> {
        if self.position == self.valid_length && self.refill()? == 0 {
            return Ok(None);
        }
        let b = self.buffer[self.position];
        self.position += 1;
        Ok(Some(b))
    }

    /// Fill `dest` from the buffer, then from the source.
    ///
    /// Returns the number of bytes delivered, which is less than
    /// `dest.len()` only when the source ran out.
    pub fn read_exact(&mut self, dest: &mut [u8]) -> Result<usize, PnmError> {
        let mut filled = self.take_buffered(dest);
        while filled < dest.len() && !self.exhausted {
            let remaining = dest.len() - filled;
            if remaining >= self.buffer.len() {
                // Large remainders bypass the buffer.
                let n = self.source.read(&mut dest[filled..])?;
                log::trace!("direct read: {n} of {remaining} bytes");
                if n == 0 {
                    self.exhausted = true;
                    break;
                }
                filled += n;
            } else {
                if self.refill()? == 0 {
                    break;
                }
                filled += self.take_buffered(&mut dest[filled..]);
            }
        }
        Ok(filled)
    }

    /// Like [`read_exact`](Self::read_exact), reporting whether `dest` was
    /// completely filled. Source failures are still errors.
    pub fn try_read_exact(&mut self, dest: &mut [u8]) -> Result<bool, PnmError> {
        Ok(self.read_exact(dest)? == dest.len())
    }

    /// Fill `dest` completely or fail with `UnexpectedEof`.
    pub fn fill_exact(&mut self, dest: &mut [u8]) -> Result<(), PnmError> {
        if self.try_read_exact(dest)? {
            Ok(())
        } else {
            Err(PnmError::UnexpectedEof)
        }
    }

    fn take_buffered(&mut self, dest: &mut [u8]) -> usize {
        let available = &self.buffer[self.position..self.valid_length];
        let n = available.len().min(dest.len());
        dest[..n].copy_from_slice(&available[..n]);
        self.position += n;
        n
    }

    /// Move the unread tail to the front and top the buffer up with one
    /// source read. Returns the number of bytes read from the source.
    fn refill(&mut self) -> Result<usize, PnmError> {
        if self.exhausted {
            return Ok(0);
        }
        let tail = self.valid_length - self.position;
        self.buffer.copy_within(self.position..self.valid_length, 0);
        self.position = 0;
        self.valid_length = tail;

        let read = self.source.read(&mut self.buffer[tail..])?;
        log::trace!("refill: {read} bytes, {tail} carried over");
        self.valid_length = tail + read;
        if read == 0 {
            self.exhausted = true;
        }
        Ok(read)
    }
}
