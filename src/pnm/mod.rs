//! Binary Netpbm: P4 (PBM), P5 (PGM), P6 (PPM).

pub(crate) mod decode;
pub(crate) mod header;

use alloc::vec::Vec;

use enough::Stop;

use crate::decode::DecodedImage;
use crate::error::PnmError;
use crate::limits::Limits;
use crate::pixel::PixelFormat;
use crate::reader::BufferedReader;
use crate::source::ByteSource;

/// Which PNM sub-format a header declares.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// P4: binary bitmap, 1 bit per pixel, no maxval in the header.
    Bitmap,
    /// P5: binary grayscale.
    Graymap,
    /// P6: binary RGB.
    Pixmap,
}

/// Parsed PNM header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PnmHeader {
    pub format: PnmFormat,
    pub width: u32,
    pub height: u32,
    /// Declared maximum sample value. Always 1 for [`PnmFormat::Bitmap`].
    pub max_sample_value: u32,
}

impl PnmHeader {
    /// Bits needed to hold `max_sample_value`.
    pub fn bits_per_sample(&self) -> u32 {
        bit_width(self.max_sample_value)
    }

    /// Samples per pixel.
    pub fn channels(&self) -> usize {
        match self.format {
            PnmFormat::Bitmap | PnmFormat::Graymap => 1,
            PnmFormat::Pixmap => 3,
        }
    }

    /// Recommended output format and 16-bit sample shift.
    pub fn pixel_format(&self) -> Result<(PixelFormat, u32), PnmError> {
        PixelFormat::for_header(self)
    }
}

/// Smallest `n` with `2^n - 1 >= value`.
pub fn bit_width(value: u32) -> u32 {
    u32::BITS - value.leading_zeros()
}

/// Whether `prefix` starts with a magic number this crate decodes.
///
/// Only the first two bytes are looked at; shorter prefixes are rejected.
pub fn is_pnm_file(prefix: &[u8]) -> bool {
    matches!(prefix, [b'P', b'4' | b'5' | b'6', ..])
}

/// Probe a seekable stream for a PNM magic number.
///
/// Reads at most two bytes and restores the stream position before
/// returning. Streams too short to hold a magic number are reported as not
/// recognized.
#[cfg(feature = "std")]
pub fn query_capability<R: std::io::Read + std::io::Seek>(
    stream: &mut R,
) -> std::io::Result<bool> {
    use std::io::{ErrorKind, SeekFrom};

    let original = stream.stream_position()?;
    let mut magic = [0u8; 2];
    let mut filled = 0;
    while filled < magic.len() {
        match stream.read(&mut magic[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    stream.seek(SeekFrom::Start(original))?;
    Ok(is_pnm_file(&magic[..filled]))
}

/// One decode session: header, then payload, through a single buffered
/// reader.
///
/// ```
/// use pnmstream::{PixelFormat, SliceSource, Unstoppable, pnm::PnmDecoder};
///
/// let data = b"P5 2 2 255\n\x01\x02\x03\x04";
/// let mut decoder = PnmDecoder::new(SliceSource::new(data));
/// assert_eq!(decoder.pixel_format()?, PixelFormat::Gray8);
///
/// let stride = 4;
/// let mut buf = vec![0xAAu8; decoder.output_buf_size(stride)?];
/// decoder.decode_into(&mut buf, stride, Unstoppable)?;
/// assert_eq!(buf, [1, 2, 0xAA, 0xAA, 3, 4, 0xAA, 0xAA]);
/// # Ok::<(), pnmstream::PnmError>(())
/// ```
pub struct PnmDecoder<S> {
    reader: BufferedReader<S>,
    header: Option<PnmHeader>,
}

impl<S: ByteSource> PnmDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            reader: BufferedReader::new(source),
            header: None,
        }
    }

    /// Use an internal read buffer of `capacity` bytes.
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            reader: BufferedReader::with_capacity(source, capacity),
            header: None,
        }
    }

    /// Parse the header on first call; later calls return the cached copy.
    pub fn read_header(&mut self) -> Result<PnmHeader, PnmError> {
        match self.header {
            Some(header) => Ok(header),
            None => {
                let header = header::parse_header(&mut self.reader)?;
                self.header = Some(header);
                Ok(header)
            }
        }
    }

    pub fn pixel_format(&mut self) -> Result<PixelFormat, PnmError> {
        Ok(self.read_header()?.pixel_format()?.0)
    }

    /// Tightly packed row size of the output.
    pub fn min_stride(&mut self) -> Result<usize, PnmError> {
        let header = self.read_header()?;
        let (format, _) = header.pixel_format()?;
        format
            .min_stride(header.width)
            .ok_or(PnmError::DimensionsTooLarge {
                width: header.width,
                height: header.height,
            })
    }

    /// Buffer size for `height` rows of `stride` bytes.
    pub fn output_buf_size(&mut self, stride: usize) -> Result<usize, PnmError> {
        let header = self.read_header()?;
        stride
            .checked_mul(header.height as usize)
            .ok_or(PnmError::DimensionsTooLarge {
                width: header.width,
                height: header.height,
            })
    }

    /// Decode the payload into `dst`, rows `stride` bytes apart.
    ///
    /// Bytes past each row's pixels are left as they were. `dst` must hold
    /// `stride * (height - 1)` bytes plus one tight row.
    pub fn decode_into(
        mut self,
        dst: &mut [u8],
        stride: usize,
        stop: impl Stop,
    ) -> Result<PnmHeader, PnmError> {
        let header = self.read_header()?;
        let (format, shift) = header.pixel_format()?;
        decode::check_destination(header.width, header.height, format, dst.len(), stride)?;
        stop.check()?;
        decode::decode_payload(&mut self.reader, &header, format, shift, dst, stride, &stop)?;
        Ok(header)
    }

    /// Decode into a newly allocated, tightly packed buffer.
    pub fn decode(self, stop: impl Stop) -> Result<DecodedImage, PnmError> {
        self.decode_with(None, 1, &stop)
    }

    pub(crate) fn decode_with(
        mut self,
        limits: Option<&Limits>,
        stride_alignment: usize,
        stop: &dyn Stop,
    ) -> Result<DecodedImage, PnmError> {
        let header = self.read_header()?;
        if let Some(limits) = limits {
            limits.check(&header)?;
        }
        let (format, shift) = header.pixel_format()?;

        let too_large = || PnmError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        };
        let stride = format
            .min_stride(header.width)
            .and_then(|row| row.checked_next_multiple_of(stride_alignment.max(1)))
            .ok_or_else(too_large)?;
        let out_bytes = stride
            .checked_mul(header.height as usize)
            .ok_or_else(too_large)?;
        if let Some(limits) = limits {
            limits.check_memory(out_bytes)?;
        }
        let payload = decode::payload_len(&header, format).ok_or_else(too_large)?;
        if let Some(available) = self.reader.remaining_len() {
            if available < payload {
                log::debug!("payload needs {payload} bytes, stream holds {available}");
                return Err(PnmError::UnexpectedEof);
            }
        }
        stop.check()?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(out_bytes).map_err(|_| {
            PnmError::LimitExceeded(alloc::format!(
                "cannot allocate {out_bytes} bytes for a {}x{} image",
                header.width,
                header.height
            ))
        })?;
        pixels.resize(out_bytes, 0);
        decode::check_destination(header.width, header.height, format, pixels.len(), stride)?;
        decode::decode_payload(&mut self.reader, &header, format, shift, &mut pixels, stride, stop)?;
        Ok(DecodedImage::new(pixels, header, format, shift, stride))
    }
}
