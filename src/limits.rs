use alloc::format;

use crate::error::PnmError;
use crate::pnm::PnmHeader;

/// Caps on what a decode may commit to before reading the payload.
///
/// `None` means unbounded. The default bounds nothing.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Cap on `width * height`.
    pub max_pixels: Option<u64>,
    /// Cap on the size of the output buffer, row padding included.
    pub max_memory_bytes: Option<u64>,
}

fn exceeds(what: &str, value: u64, cap: Option<u64>) -> Result<(), PnmError> {
    match cap {
        Some(cap) if value > cap => Err(PnmError::LimitExceeded(format!(
            "{what} {value} is over the cap of {cap}"
        ))),
        _ => Ok(()),
    }
}

impl Limits {
    pub(crate) fn check(&self, header: &PnmHeader) -> Result<(), PnmError> {
        let (width, height) = (u64::from(header.width), u64::from(header.height));
        exceeds("width", width, self.max_width)?;
        exceeds("height", height, self.max_height)?;
        exceeds("pixel count", width * height, self.max_pixels)
    }

    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), PnmError> {
        exceeds("output size", bytes as u64, self.max_memory_bytes)
    }
}
