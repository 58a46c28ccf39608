use alloc::string::String;
use enough::StopReason;

use crate::pnm::PnmFormat;

/// Errors from PNM header parsing and pixel decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PnmError {
    #[error("bad header: {0}")]
    BadHeader(String),

    #[error("unsupported pixel format: {format:?} with {bits_per_sample} bits per sample")]
    UnsupportedPixelFormat {
        format: PnmFormat,
        bits_per_sample: u32,
    },

    #[error("stream read failed: {0}")]
    StreamRead(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("stride too small: need at least {needed} bytes per row, got {actual}")]
    StrideTooSmall { needed: usize, actual: usize },

    #[error("frame {0} does not exist, Netpbm files hold a single frame")]
    FrameMissing(u32),

    #[error("decoder has no source to read from")]
    NotInitialized,

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelFormat,
        actual: crate::PixelFormat,
    },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl PnmError {
    /// Whether the error came from the byte source rather than from the
    /// content of the stream.
    pub fn is_stream_error(&self) -> bool {
        matches!(self, PnmError::StreamRead(_) | PnmError::UnexpectedEof)
    }
}

impl From<StopReason> for PnmError {
    fn from(r: StopReason) -> Self {
        PnmError::Cancelled(r)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PnmError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => PnmError::UnexpectedEof,
            _ => PnmError::StreamRead(alloc::format!("{e}")),
        }
    }
}
