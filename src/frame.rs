//! Single-frame decoder facade.
//!
//! Netpbm files hold exactly one frame. [`FrameDecoder`] decodes it lazily
//! on first access, caches it, and copies it out into caller buffers with
//! the caller's stride.

use enough::Unstoppable;

use crate::decode::{DecodeRequest, DecodedImage};
use crate::error::PnmError;
use crate::limits::Limits;
use crate::pixel::{ContainerFormat, PixelFormat};
use crate::pnm::decode::check_destination;
use crate::reader::DEFAULT_BUFFER_CAPACITY;
use crate::source::ByteSource;

pub struct FrameDecoder<S> {
    source: Option<S>,
    frame: Option<Frame>,
    limits: Limits,
    buffer_capacity: usize,
}

impl<S: ByteSource> FrameDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            frame: None,
            limits: Limits::default(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Point the decoder at a new source, dropping any cached frame.
    pub fn initialize(&mut self, source: S) {
        self.source = Some(source);
        self.frame = None;
    }

    pub fn container_format(&self) -> ContainerFormat {
        ContainerFormat::Netpbm
    }

    pub fn frame_count(&self) -> u32 {
        1
    }

    /// The frame at `index`, decoding it on first access.
    ///
    /// A failed decode consumes the source; later calls report
    /// [`PnmError::NotInitialized`] until [`initialize`](Self::initialize)
    /// is called again.
    pub fn frame(&mut self, index: u32) -> Result<&Frame, PnmError> {
        if index != 0 {
            return Err(PnmError::FrameMissing(index));
        }
        if self.frame.is_none() {
            let source = self.source.take().ok_or(PnmError::NotInitialized)?;
            let image = DecodeRequest::new(source)
                .with_limits(&self.limits)
                .with_buffer_capacity(self.buffer_capacity)
                .decode(Unstoppable)?;
            log::debug!(
                "decoded frame 0: {}x{} {:?}",
                image.width,
                image.height,
                image.format
            );
            self.frame = Some(Frame { image });
        }
        self.frame.as_ref().ok_or(PnmError::NotInitialized)
    }
}

/// A decoded frame.
#[derive(Clone, Debug)]
pub struct Frame {
    image: DecodedImage,
}

impl Frame {
    pub fn size(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.image.format
    }

    pub fn resolution(&self) -> (f64, f64) {
        self.image.resolution()
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// Copy all rows into `dst`, `stride` bytes apart.
    ///
    /// Bytes past each row's pixels are not written.
    pub fn copy_pixels(&self, stride: usize, dst: &mut [u8]) -> Result<(), PnmError> {
        let image = &self.image;
        let row_bytes =
            check_destination(image.width, image.height, image.format, dst.len(), stride)?;

        let src_rows = image.pixels().chunks(image.stride);
        for (src, out) in src_rows.zip(dst.chunks_mut(stride)) {
            out[..row_bytes].copy_from_slice(&src[..row_bytes]);
        }
        Ok(())
    }
}
