pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Quantize a unit-interval weight to 0..=255.
pub(crate) fn unit_to_u8(t: f32) -> u16 {
    ((t.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

/// Scale every byte of `src` by `weight` into `dst` (fade toward black).
pub(crate) fn scale_bytes_into(dst: &mut [u8], src: &[u8], weight: f32) {
    let w = unit_to_u8(weight);
    if w == 255 {
        dst.copy_from_slice(src);
        return;
    }
    if w == 0 {
        dst.fill(0);
        return;
    }
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = mul_div255_u8(u16::from(s), w);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
