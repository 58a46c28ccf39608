use crate::error::PnmError;
use crate::pnm::{PnmFormat, PnmHeader};

/// Container format reported by [`crate::FrameDecoder`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// Binary Netpbm: PBM (P4), PGM (P5), PPM (P6).
    Netpbm,
}

/// Output pixel format, derived from the header.
///
/// Sub-byte formats pack samples most-significant first. 16-bit formats
/// hold little-endian words.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 1 bit per pixel, 0 = black, 1 = white.
    BlackWhite,
    /// 2 bits per pixel grayscale.
    Gray2,
    /// 4 bits per pixel grayscale.
    Gray4,
    /// 8 bits per pixel grayscale.
    Gray8,
    /// 16 bits per pixel grayscale, little endian.
    Gray16,
    /// 3 channels, 8 bits each.
    Rgb8,
    /// 3 channels, 16 bits each, little endian.
    Rgb16,
}

impl PixelFormat {
    /// Pick the output format for a header, along with the left shift that
    /// moves sub-16-bit samples to the top of a 16-bit word.
    pub fn for_header(header: &PnmHeader) -> Result<(Self, u32), PnmError> {
        let bits = header.bits_per_sample();
        let unsupported = PnmError::UnsupportedPixelFormat {
            format: header.format,
            bits_per_sample: bits,
        };
        match header.format {
            PnmFormat::Bitmap => Ok((Self::BlackWhite, 0)),
            PnmFormat::Graymap => match bits {
                1 => Ok((Self::BlackWhite, 0)),
                2 => Ok((Self::Gray2, 0)),
                4 => Ok((Self::Gray4, 0)),
                8 => Ok((Self::Gray8, 0)),
                9..=16 => Ok((Self::Gray16, 16 - bits)),
                _ => Err(unsupported),
            },
            PnmFormat::Pixmap => match bits {
                8 => Ok((Self::Rgb8, 0)),
                9..=16 => Ok((Self::Rgb16, 16 - bits)),
                _ => Err(unsupported),
            },
        }
    }

    /// Bits per pixel for this format.
    pub fn bits_per_pixel(&self) -> usize {
        match self {
            Self::BlackWhite => 1,
            Self::Gray2 => 2,
            Self::Gray4 => 4,
            Self::Gray8 => 8,
            Self::Gray16 => 16,
            Self::Rgb8 => 24,
            Self::Rgb16 => 48,
        }
    }

    /// Bytes per pixel, or `None` for sub-byte formats.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self.bits_per_pixel() {
            b if b % 8 == 0 => Some(b / 8),
            _ => None,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb8 | Self::Rgb16 => 3,
            _ => 1,
        }
    }

    /// Tightly packed row size in bytes.
    pub fn min_stride(&self, width: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(self.bits_per_pixel())
            .map(|bits| bits.div_ceil(8))
    }
}

/// Typed pixels a decoded image can be viewed as.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    /// The output format whose memory layout matches `Self`.
    fn format() -> PixelFormat;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGB8 {
    fn format() -> PixelFormat {
        PixelFormat::Rgb8
    }
}
