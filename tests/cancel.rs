use enough::{Stop, StopReason};
use pnmstream::*;

/// Allows `budget` checks, then reports cancellation.
struct Countdown(std::sync::atomic::AtomicUsize);

impl Stop for Countdown {
    fn check(&self) -> Result<(), StopReason> {
        use std::sync::atomic::Ordering;
        match self.0.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)) {
            Ok(_) => Ok(()),
            Err(_) => Err(StopReason::Cancelled),
        }
    }
}

fn gray_image(w: usize, h: usize) -> Vec<u8> {
    let mut data = format!("P5 {w} {h} 255\n").into_bytes();
    data.resize(data.len() + w * h, 0x80);
    data
}

#[test]
fn cancelled_before_payload() {
    let data = gray_image(4, 4);
    let err = decode(&data, Countdown(0.into())).unwrap_err();
    assert!(matches!(err, PnmError::Cancelled(_)));
}

#[test]
fn cancelled_between_rows() {
    // Padded rows are copied one at a time and checked every 16 rows.
    let data = gray_image(3, 64);
    let err = DecodeRequest::new(SliceSource::new(&data))
        .with_stride_alignment(4)
        .decode(Countdown(2.into()))
        .unwrap_err();
    assert!(matches!(err, PnmError::Cancelled(_)));
}

#[test]
fn generous_budget_completes() {
    let data = gray_image(3, 64);
    let image = DecodeRequest::new(SliceSource::new(&data))
        .with_stride_alignment(4)
        .decode(Countdown(100.into()))
        .unwrap();
    assert_eq!(image.row(63), Some(&[0x80, 0x80, 0x80][..]));
}
