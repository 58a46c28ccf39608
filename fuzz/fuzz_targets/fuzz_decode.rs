#![no_main]
use libfuzzer_sys::fuzz_target;
use pnmstream::{DecodeRequest, Limits, SliceSource};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };

    // Whole-image decode with a small read buffer; must never panic
    let _ = DecodeRequest::new(SliceSource::new(data))
        .with_limits(&limits)
        .with_buffer_capacity(64)
        .with_stride_alignment(4)
        .decode(enough::Unstoppable);

    // Caller buffer with a padded stride
    let mut decoder = pnmstream::pnm::PnmDecoder::new(SliceSource::new(data));
    if let Ok(header) = decoder.read_header() {
        if u64::from(header.width) * u64::from(header.height) <= 1 << 24 {
            if let (Ok(stride), Ok(_)) = (decoder.min_stride(), decoder.pixel_format()) {
                let stride = stride + 3;
                if let Ok(size) = decoder.output_buf_size(stride) {
                    if size <= 64 * 1024 * 1024 {
                        let mut buf = vec![0u8; size];
                        let _ = decoder.decode_into(&mut buf, stride, enough::Unstoppable);
                    }
                }
            }
        }
    }
});
