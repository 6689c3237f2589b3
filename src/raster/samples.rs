//! Sample widening
//!
//! Converts raw sample bytes to f32 elevations without rescaling.

use crate::io::byte_order::ByteOrderHandler;
use crate::raster::header::SampleKind;

/// Widens the samples in `src` into `dst`
///
/// Converts as many whole samples as both slices hold and returns that count.
pub fn widen_samples(src: &[u8], dst: &mut [f32], kind: SampleKind, handler: &dyn ByteOrderHandler) -> usize {
    let step = kind.bytes();
    let mut written = 0;
    for (raw, out) in src.chunks_exact(step).zip(dst.iter_mut()) {
        *out = match kind {
            SampleKind::U16 => handler.decode_u16(raw) as f32,
            SampleKind::I16 => handler.decode_i16(raw) as f32,
            SampleKind::F32 => handler.decode_f32(raw),
        };
        written += 1;
    }
    written
}
