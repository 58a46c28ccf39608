//! Test corpus: synthetic images across formats, sizes, and strides,
//! checked against a per-pixel reference.

use enough::Unstoppable;
use pnmstream::*;

const PAD: u8 = 0x5A;

fn noise_pattern(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn checkerboard(w: usize, h: usize, dark: u8, light: u8) -> Vec<u8> {
    (0..h)
        .flat_map(|y| (0..w).map(move |x| if (x + y) % 2 == 0 { light } else { dark }))
        .collect()
}

fn encode(magic: &str, w: usize, h: usize, maxval: Option<u32>, payload: &[u8]) -> Vec<u8> {
    let mut out = match maxval {
        Some(m) => format!("{magic} {w} {h} {m}\n").into_bytes(),
        None => format!("{magic} {w} {h}\n").into_bytes(),
    };
    out.extend_from_slice(payload);
    out
}

/// Decode with a padded stride and return the buffer and stride.
fn decode_padded(data: &[u8], extra: usize) -> (Vec<u8>, usize) {
    let mut decoder = pnm::PnmDecoder::with_capacity(SliceSource::new(data), 37);
    let stride = decoder.min_stride().unwrap() + extra;
    let mut buf = vec![PAD; decoder.output_buf_size(stride).unwrap()];
    decoder.decode_into(&mut buf, stride, Unstoppable).unwrap();
    (buf, stride)
}

fn packed_sample(row: &[u8], x: usize, bits: usize) -> u8 {
    let per_byte = 8 / bits;
    let shift = 8 - bits * (x % per_byte + 1);
    (row[x / per_byte] >> shift) & ((1 << bits) - 1) as u8
}

fn check_padding(buf: &[u8], stride: usize, row_bytes: usize) {
    for row in buf.chunks(stride) {
        assert!(row[row_bytes..].iter().all(|&b| b == PAD), "padding was written");
    }
}

#[test]
fn packed_graymaps_all_widths() {
    for (maxval, bits) in [(1u32, 1usize), (3, 2), (15, 4)] {
        for w in 1..=17 {
            let h = 3;
            let samples: Vec<u8> = noise_pattern(w * h, w as u32)
                .into_iter()
                .map(|s| s & maxval as u8)
                .collect();
            let data = encode("P5", w, h, Some(maxval), &samples);
            let row_bytes = (w * bits).div_ceil(8);
            for extra in [0, 3] {
                let (buf, stride) = decode_padded(&data, extra);
                assert_eq!(stride, row_bytes + extra);
                for y in 0..h {
                    let row = &buf[y * stride..];
                    for x in 0..w {
                        assert_eq!(
                            packed_sample(row, x, bits),
                            samples[y * w + x],
                            "maxval {maxval} w {w} x {x} y {y}"
                        );
                    }
                }
                check_padding(&buf, stride, row_bytes);
            }
        }
    }
}

#[test]
fn bitmaps_all_widths() {
    for w in 1usize..=17 {
        let h = 4;
        let row_bytes = w.div_ceil(8);
        let payload = noise_pattern(row_bytes * h, 7 + w as u32);
        let data = encode("P4", w, h, None, &payload);
        for extra in [0, 2] {
            let (buf, stride) = decode_padded(&data, extra);
            for y in 0..h {
                let src = &payload[y * row_bytes..];
                let out = &buf[y * stride..];
                for x in 0..row_bytes * 8 {
                    let got = packed_sample(out, x, 1);
                    if x < w {
                        assert_eq!(got, 1 - packed_sample(src, x, 1), "w {w} x {x} y {y}");
                    } else {
                        assert_eq!(got, 0, "row padding bit {x} set, w {w}");
                    }
                }
            }
            check_padding(&buf, stride, row_bytes);
        }
    }
}

#[test]
fn deep_graymaps_and_pixmaps() {
    for (magic, channels) in [("P5", 1usize), ("P6", 3)] {
        for (maxval, shift) in [(511u32, 7u32), (4095, 4), (65535, 0)] {
            let (w, h) = (5, 3);
            let samples: Vec<u16> = noise_pattern(w * h * channels * 2, maxval)
                .chunks_exact(2)
                .map(|p| u16::from_be_bytes([p[0], p[1]]) & maxval as u16)
                .collect();
            let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_be_bytes()).collect();
            let data = encode(magic, w, h, Some(maxval), &payload);
            let row_bytes = w * channels * 2;
            for extra in [0, 6] {
                let (buf, stride) = decode_padded(&data, extra);
                for y in 0..h {
                    let row = &buf[y * stride..y * stride + row_bytes];
                    let got: Vec<u16> = row
                        .chunks_exact(2)
                        .map(|p| u16::from_le_bytes([p[0], p[1]]))
                        .collect();
                    let want: Vec<u16> = samples[y * w * channels..(y + 1) * w * channels]
                        .iter()
                        .map(|s| s << shift)
                        .collect();
                    assert_eq!(got, want, "{magic} maxval {maxval} y {y}");
                }
                check_padding(&buf, stride, row_bytes);
            }
        }
    }
}

#[test]
fn eight_bit_checkerboards() {
    for (w, h) in [(1, 1), (2, 3), (17, 5), (64, 2)] {
        let gray = checkerboard(w, h, 10, 200);
        let image = decode(&encode("P5", w, h, Some(255), &gray), Unstoppable).unwrap();
        assert_eq!(image.pixels(), &gray[..]);

        let rgb: Vec<u8> = gray.iter().flat_map(|&g| [g, g / 2, 255 - g]).collect();
        let data = encode("P6", w, h, Some(255), &rgb);
        let (buf, stride) = decode_padded(&data, 1);
        for y in 0..h {
            assert_eq!(
                &buf[y * stride..y * stride + w * 3],
                &rgb[y * w * 3..(y + 1) * w * 3]
            );
        }
        check_padding(&buf, stride, w * 3);
    }
}

#[test]
fn large_image_crosses_many_refills() {
    let (w, h) = (300, 200);
    let payload = noise_pattern(w * h * 3, 99);
    let data = encode("P6", w, h, Some(255), &payload);
    let image = DecodeRequest::new(SliceSource::new(&data))
        .with_buffer_capacity(1000)
        .with_stride_alignment(16)
        .decode(Unstoppable)
        .unwrap();
    assert_eq!(image.stride, 912);
    for y in 0..h as u32 {
        let start = y as usize * w * 3;
        assert_eq!(image.row(y).unwrap(), &payload[start..start + w * 3]);
    }
}
