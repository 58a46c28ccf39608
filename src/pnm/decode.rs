//! Payload decoder: sub-byte packing, 16-bit byte order and shift, strides.

use alloc::vec;

use enough::Stop;

use super::{PnmFormat, PnmHeader};
use crate::error::PnmError;
use crate::pixel::PixelFormat;
use crate::reader::BufferedReader;
use crate::source::ByteSource;

/// Validate a caller buffer for a `width` x `height` image. Returns the
/// tight row size.
pub(crate) fn check_destination(
    width: u32,
    height: u32,
    format: PixelFormat,
    dst_len: usize,
    stride: usize,
) -> Result<usize, PnmError> {
    let too_large = || PnmError::DimensionsTooLarge { width, height };
    if width == 0 || height == 0 {
        return Err(PnmError::BadHeader("image has a zero dimension".into()));
    }
    let row_bytes = format.min_stride(width).ok_or_else(too_large)?;
    if stride < row_bytes {
        return Err(PnmError::StrideTooSmall {
            needed: row_bytes,
            actual: stride,
        });
    }
    let needed = stride
        .checked_mul(height as usize - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or_else(too_large)?;
    if dst_len < needed {
        return Err(PnmError::BufferTooSmall {
            needed,
            actual: dst_len,
        });
    }
    Ok(row_bytes)
}

/// Bytes of payload the stream must still hold for `header`.
pub(crate) fn payload_len(header: &PnmHeader, format: PixelFormat) -> Option<usize> {
    let width = header.width as usize;
    let row = match (header.format, format) {
        (PnmFormat::Bitmap, _) => width.div_ceil(8),
        (_, PixelFormat::BlackWhite | PixelFormat::Gray2 | PixelFormat::Gray4) => width,
        _ => format.min_stride(header.width)?,
    };
    row.checked_mul(header.height as usize)
}

/// Read the payload from `reader` into `dst`.
///
/// `dst` and `stride` must have passed [`check_destination`].
pub(crate) fn decode_payload<S: ByteSource>(
    reader: &mut BufferedReader<S>,
    header: &PnmHeader,
    format: PixelFormat,
    sample_shift: u32,
    dst: &mut [u8],
    stride: usize,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    let width = header.width as usize;
    let height = header.height as usize;

    match (header.format, format) {
        (PnmFormat::Bitmap, PixelFormat::BlackWhite) => {
            decode_bitmap(reader, width, height, dst, stride, stop)
        }
        (PnmFormat::Graymap, PixelFormat::BlackWhite) => {
            unpack_rows(reader, width, height, dst, stride, stop, pack_bits_row)
        }
        (PnmFormat::Graymap, PixelFormat::Gray2) => {
            unpack_rows(reader, width, height, dst, stride, stop, pack_crumbs_row)
        }
        (PnmFormat::Graymap, PixelFormat::Gray4) => {
            unpack_rows(reader, width, height, dst, stride, stop, pack_nibbles_row)
        }
        (_, PixelFormat::Gray8 | PixelFormat::Rgb8) => {
            let row_bytes = width * format.channels();
            copy_rows(reader, row_bytes, height, dst, stride, stop)
        }
        (_, PixelFormat::Gray16 | PixelFormat::Rgb16) => {
            let row_bytes = width * format.channels() * 2;
            copy_rows(reader, row_bytes, height, dst, stride, stop)?;
            for row in dst.chunks_mut(stride).take(height) {
                big_endian_to_little_endian(&mut row[..row_bytes], sample_shift);
            }
            Ok(())
        }
        _ => Err(PnmError::UnsupportedPixelFormat {
            format: header.format,
            bits_per_sample: header.bits_per_sample(),
        }),
    }
}

/// Byte-aligned payloads: one bulk read when rows are tight, else row by row.
fn copy_rows<S: ByteSource>(
    reader: &mut BufferedReader<S>,
    row_bytes: usize,
    height: usize,
    dst: &mut [u8],
    stride: usize,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    if stride == row_bytes {
        return reader.fill_exact(&mut dst[..row_bytes * height]);
    }

    log::debug!("stride {stride} != row size {row_bytes}, copying row by row");
    for (y, row) in dst.chunks_mut(stride).take(height).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        reader.fill_exact(&mut row[..row_bytes])?;
    }
    Ok(())
}

/// P4 rows are already packed MSB first, but use 1 for black.
fn decode_bitmap<S: ByteSource>(
    reader: &mut BufferedReader<S>,
    width: usize,
    height: usize,
    dst: &mut [u8],
    stride: usize,
    stop: &dyn Stop,
) -> Result<(), PnmError> {
    let row_bytes = width.div_ceil(8);
    let tail_mask = match width % 8 {
        0 => 0xFF,
        used => 0xFFu8 << (8 - used),
    };
    for (y, row) in dst.chunks_mut(stride).take(height).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let row = &mut row[..row_bytes];
        reader.fill_exact(row)?;
        row.iter_mut().for_each(|b| *b = !*b);
        if let Some(last) = row.last_mut() {
            *last &= tail_mask;
        }
    }
    Ok(())
}

/// Low-depth graymaps store one sample per byte; pack each row into `dst`.
fn unpack_rows<S: ByteSource>(
    reader: &mut BufferedReader<S>,
    width: usize,
    height: usize,
    dst: &mut [u8],
    stride: usize,
    stop: &dyn Stop,
    pack: fn(&[u8], &mut [u8]),
) -> Result<(), PnmError> {
    let mut samples = vec![0u8; width];
    for (y, row) in dst.chunks_mut(stride).take(height).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        reader.fill_exact(&mut samples)?;
        pack(&samples, row);
    }
    Ok(())
}

/// Pack 1-bit samples, eight per byte, first sample in the high bit.
pub(crate) fn pack_bits_row(samples: &[u8], out: &mut [u8]) {
    let chunks = samples.chunks_exact(8);
    let tail = chunks.remainder();
    let full = samples.len() / 8;
    for (o, s) in out[..full].iter_mut().zip(chunks) {
        *o = pack_bits(s);
    }
    if !tail.is_empty() {
        out[full] = pack_bits(tail);
    }
}

fn pack_bits(samples: &[u8]) -> u8 {
    samples
        .iter()
        .enumerate()
        .fold(0, |acc, (i, &s)| acc | (s & 0x01) << (7 - i))
}

/// Pack 2-bit samples, four per byte, first sample in the high bits.
pub(crate) fn pack_crumbs_row(samples: &[u8], out: &mut [u8]) {
    let crumb = |s: u8| s & 0x03;
    let chunks = samples.chunks_exact(4);
    let tail = chunks.remainder();
    let full = samples.len() / 4;
    for (o, s) in out[..full].iter_mut().zip(chunks) {
        *o = crumb(s[0]) << 6 | crumb(s[1]) << 4 | crumb(s[2]) << 2 | crumb(s[3]);
    }
    match *tail {
        [] => {}
        [a] => out[full] = crumb(a) << 6,
        [a, b] => out[full] = crumb(a) << 6 | crumb(b) << 4,
        [a, b, c, ..] => out[full] = crumb(a) << 6 | crumb(b) << 4 | crumb(c) << 2,
    }
}

/// Pack 4-bit samples, two per byte, first sample in the high nibble.
pub(crate) fn pack_nibbles_row(samples: &[u8], out: &mut [u8]) {
    let nibble = |s: u8| s & 0x0F;
    let chunks = samples.chunks_exact(2);
    let tail = chunks.remainder();
    let full = samples.len() / 2;
    for (o, s) in out[..full].iter_mut().zip(chunks) {
        *o = nibble(s[0]) << 4 | nibble(s[1]);
    }
    if let [a] = *tail {
        out[full] = nibble(a) << 4;
    }
}

/// Convert one big-endian sample to a host value with the significant bits
/// at the top of the word.
pub(crate) fn normalize_sample(raw: [u8; 2], shift: u32) -> u16 {
    u16::from_be_bytes(raw) << shift
}

/// In-place big-endian → little-endian, shifting by `shift`.
fn big_endian_to_little_endian(row: &mut [u8], shift: u32) {
    for pair in row.chunks_exact_mut(2) {
        let value = normalize_sample([pair[0], pair[1]], shift);
        pair.copy_from_slice(&value.to_le_bytes());
    }
}
