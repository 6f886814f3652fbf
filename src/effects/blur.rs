use crate::foundation::error::{StillreelError, StillreelResult};

/// Background blur radius in pixels (a 99-tap kernel).
pub const BACKGROUND_BLUR_RADIUS: u32 = 49;
/// Background blur standard deviation.
pub const BACKGROUND_BLUR_SIGMA: f32 = 30.0;

/// Separable Gaussian blur over tightly packed 8-bit pixels with `channels` interleaved
/// channels. Edges clamp to the nearest pixel.
pub fn gaussian_blur_u8(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    radius: u32,
    sigma: f32,
) -> StillreelResult<Vec<u8>> {
    if channels == 0 || channels > 4 {
        return Err(StillreelError::invalid_job("blur supports 1..=4 channels"));
    }
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| StillreelError::invalid_job("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(StillreelError::invalid_job(
            "gaussian_blur_u8 expects src matching width*height*channels",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    let geom = Geom {
        width: width as i32,
        height: height as i32,
        channels,
    };
    horizontal_pass(src, &mut tmp, geom, &kernel);
    vertical_pass(&tmp, &mut out, geom, &kernel);
    Ok(out)
}

#[derive(Clone, Copy)]
struct Geom {
    width: i32,
    height: i32,
    channels: usize,
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> StillreelResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(StillreelError::invalid_job("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Rounding drift goes to the center tap so the kernel sums to exactly 1.0 in Q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], g: Geom, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let ch = g.channels;
    for y in 0..g.height {
        let row = (y * g.width) as usize;
        for x in 0..g.width {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, g.width - 1);
                let idx = (row + sx as usize) * ch;
                for c in 0..ch {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (row + x as usize) * ch;
            for c in 0..ch {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], g: Geom, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let ch = g.channels;
    for y in 0..g.height {
        for x in 0..g.width {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, g.height - 1);
                let idx = ((sy * g.width + x) as usize) * ch;
                for c in 0..ch {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * g.width + x) as usize) * ch;
            for c in 0..ch {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
