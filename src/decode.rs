use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use enough::Stop;

use crate::error::PnmError;
use crate::limits::Limits;
use crate::pixel::PixelFormat;
use crate::pnm::{PnmDecoder, PnmFormat, PnmHeader};
use crate::reader::DEFAULT_BUFFER_CAPACITY;
use crate::source::{ByteSource, SliceSource};

/// Resolution reported for every decoded image; Netpbm stores none.
pub const DEFAULT_RESOLUTION_DPI: f64 = 96.0;

/// Decode an in-memory PNM file into a tightly packed buffer.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodedImage, PnmError> {
    DecodeRequest::new(SliceSource::new(data)).decode(stop)
}

/// Like [`decode`], rejecting images that exceed `limits` before allocating.
pub fn decode_with_limits(
    data: &[u8],
    limits: &Limits,
    stop: impl Stop,
) -> Result<DecodedImage, PnmError> {
    DecodeRequest::new(SliceSource::new(data))
        .with_limits(limits)
        .decode(stop)
}

/// Decode request builder.
///
/// ```
/// use pnmstream::{DecodeRequest, Limits, PixelFormat, SliceSource, Unstoppable};
///
/// let data = b"P6 1 1 255\n\xff\x80\x00";
/// let limits = Limits { max_pixels: Some(1 << 20), ..Default::default() };
/// let image = DecodeRequest::new(SliceSource::new(data))
///     .with_limits(&limits)
///     .with_stride_alignment(4)
///     .decode(Unstoppable)?;
/// assert_eq!(image.format, PixelFormat::Rgb8);
/// assert_eq!(image.stride, 4);
/// assert_eq!(image.row(0), Some(&[0xff, 0x80, 0x00][..]));
/// # Ok::<(), pnmstream::PnmError>(())
/// ```
pub struct DecodeRequest<'a, S> {
    source: S,
    limits: Option<&'a Limits>,
    buffer_capacity: usize,
    stride_alignment: usize,
}

impl<'a, S: ByteSource> DecodeRequest<'a, S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            limits: None,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            stride_alignment: 1,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Size of the internal read buffer. Values below
    /// [`crate::MIN_BUFFER_CAPACITY`] are raised to it.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Round each output row up to a multiple of `alignment` bytes.
    pub fn with_stride_alignment(mut self, alignment: usize) -> Self {
        self.stride_alignment = alignment.max(1);
        self
    }

    /// Parse only the header.
    pub fn read_header(self) -> Result<PnmHeader, PnmError> {
        PnmDecoder::with_capacity(self.source, self.buffer_capacity).read_header()
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodedImage, PnmError> {
        PnmDecoder::with_capacity(self.source, self.buffer_capacity).decode_with(
            self.limits,
            self.stride_alignment,
            &stop,
        )
    }
}

/// Decoded image with an owned, possibly padded, pixel buffer.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bytes between the starts of consecutive rows.
    pub stride: usize,
    pub format: PixelFormat,
    /// The Netpbm variant the pixels came from.
    pub source_format: PnmFormat,
    pub max_sample_value: u32,
    /// Left shift applied to 16-bit samples.
    pub sample_shift: u32,
}

impl DecodedImage {
    pub(crate) fn new(
        pixels: Vec<u8>,
        header: PnmHeader,
        format: PixelFormat,
        sample_shift: u32,
        stride: usize,
    ) -> Self {
        Self {
            pixels,
            width: header.width,
            height: header.height,
            stride,
            format,
            source_format: header.format,
            max_sample_value: header.max_sample_value,
            sample_shift,
        }
    }

    /// Access the pixel data, padding included.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Tightly packed bytes of row `y`, without padding.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let row_bytes = self.format.min_stride(self.width)?;
        let start = y as usize * self.stride;
        self.pixels.get(start..start + row_bytes)
    }

    /// Horizontal and vertical resolution in DPI.
    pub fn resolution(&self) -> (f64, f64) {
        (DEFAULT_RESOLUTION_DPI, DEFAULT_RESOLUTION_DPI)
    }

    /// Reinterpret pixel data as typed pixel slice, row padding included.
    ///
    /// Returns [`PnmError::LayoutMismatch`] if the pixel format doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], PnmError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.format != P::format() {
            return Err(PnmError::LayoutMismatch {
                expected: P::format(),
                actual: self.format,
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels, honoring
    /// the row stride.
    ///
    /// Returns [`PnmError::LayoutMismatch`] if the pixel format doesn't
    /// match `P`, or if the stride is not a whole number of pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(
        &self,
    ) -> Result<imgref::ImgRef<'_, P>, PnmError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        let bytes_per_pixel = core::mem::size_of::<P>();
        if self.stride % bytes_per_pixel != 0 {
            return Err(PnmError::LayoutMismatch {
                expected: P::format(),
                actual: self.format,
            });
        }
        Ok(imgref::ImgRef::new_stride(
            pixels,
            self.width as usize,
            self.height as usize,
            self.stride / bytes_per_pixel,
        ))
    }
}
