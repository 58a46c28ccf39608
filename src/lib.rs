//! # pnmstream
//!
//! Streaming decoder for binary Netpbm images: PBM (P4), PGM (P5) and
//! PPM (P6).
//!
//! Bytes are pulled from any [`ByteSource`] through a fixed-size
//! [`BufferedReader`], so a whole file never has to be in memory before
//! decoding starts. Output is written row by row into a caller buffer with
//! an arbitrary stride, or into a newly allocated [`DecodedImage`].
//!
//! ## Output formats
//!
//! | File                      | Output                              |
//! |---------------------------|-------------------------------------|
//! | P4                        | [`PixelFormat::BlackWhite`], 1 = white |
//! | P5, maxval 1 / 3 / 15     | `BlackWhite` / `Gray2` / `Gray4`, packed MSB first |
//! | P5, maxval 255            | `Gray8`                             |
//! | P5, 9 to 16 bits          | `Gray16`, little endian, scaled to the top bits |
//! | P6, maxval 255            | `Rgb8`                              |
//! | P6, 9 to 16 bits          | `Rgb16`, little endian, scaled to the top bits |
//!
//! ## Non-Goals
//!
//! - ASCII PNM formats (P1, P2, P3), PAM and PFM
//! - Encoding
//! - Multi-image streams
//!
//! ## Usage
//!
//! ```
//! use pnmstream::{DecodeRequest, ImageProperties, PixelFormat, SliceSource, Unstoppable};
//!
//! let data: &[u8] = b"P5 2 2 255\n\x0a\x14\x1e\x28";
//!
//! // Probe without decoding
//! let props = ImageProperties::read(SliceSource::new(data))?;
//! assert_eq!(props.dimensions(), "2x2");
//!
//! let image = DecodeRequest::new(SliceSource::new(data)).decode(Unstoppable)?;
//! assert_eq!(image.format, PixelFormat::Gray8);
//! assert_eq!(image.pixels(), &[0x0a, 0x14, 0x1e, 0x28]);
//! # Ok::<(), pnmstream::PnmError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod error;
mod frame;
mod limits;
mod pixel;
mod properties;
mod source;

pub mod pnm;
pub mod reader;

// Re-exports
pub use decode::{DEFAULT_RESOLUTION_DPI, DecodeRequest, DecodedImage, decode, decode_with_limits};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::PnmError;
pub use frame::{Frame, FrameDecoder};
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::{ContainerFormat, PixelFormat};
#[cfg(feature = "std")]
pub use pnm::query_capability;
pub use pnm::{PnmFormat, PnmHeader, bit_width, is_pnm_file};
pub use properties::{Compression, ImageProperties};
pub use reader::{BufferedReader, DEFAULT_BUFFER_CAPACITY, MIN_BUFFER_CAPACITY};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{ByteSource, SliceSource};
