use alloc::format;
use alloc::string::String;

use crate::error::PnmError;
use crate::pnm::{PnmDecoder, PnmFormat, PnmHeader};
use crate::source::ByteSource;

/// Compression scheme of the payload. Binary Netpbm has none.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    Uncompressed,
}

/// Header-derived image properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageProperties {
    pub width: u32,
    pub height: u32,
    /// Bits per pixel in the file, all channels together.
    pub bit_depth: u32,
    pub compression: Compression,
}

impl ImageProperties {
    pub fn from_header(header: &PnmHeader) -> Self {
        let bit_depth = match header.format {
            PnmFormat::Bitmap => 1,
            PnmFormat::Graymap => header.bits_per_sample(),
            PnmFormat::Pixmap => 3 * header.bits_per_sample(),
        };
        Self {
            width: header.width,
            height: header.height,
            bit_depth,
            compression: Compression::Uncompressed,
        }
    }

    /// Parse only the header of `source`.
    pub fn read<S: ByteSource>(source: S) -> Result<Self, PnmError> {
        let header = PnmDecoder::with_capacity(source, 512).read_header()?;
        Ok(Self::from_header(&header))
    }

    /// `"{width}x{height}"`.
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    #[test]
    fn bit_depth_per_format() {
        let cases: [(&[u8], u32); 5] = [
            (b"P4 8 1\n", 1),
            (b"P5 1 1 3\n", 2),
            (b"P5 1 1 255\n", 8),
            (b"P6 1 1 255\n", 24),
            (b"P6 1 1 4095\n", 36),
        ];
        for (data, depth) in cases {
            let props = ImageProperties::read(SliceSource::new(data)).unwrap();
            assert_eq!(props.bit_depth, depth, "{data:?}");
            assert_eq!(props.compression, Compression::Uncompressed);
        }
    }

    #[test]
    fn dimensions_string() {
        let props = ImageProperties::read(SliceSource::new(b"P5 640 480 255\n")).unwrap();
        assert_eq!(props.dimensions(), "640x480");
    }

    #[test]
    fn header_errors_propagate() {
        assert!(matches!(
            ImageProperties::read(SliceSource::new(b"P3 1 1 255\n")),
            Err(PnmError::BadHeader(_))
        ));
    }
}
