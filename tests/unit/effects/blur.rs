use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = gaussian_blur_u8(&src, 1, 2, 3, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8];
    let src = px.repeat((w * h) as usize);
    let out = gaussian_blur_u8(&src, w, h, 3, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 3) as usize];
    let center = ((2 * w + 2) * 3) as usize;
    src[center..center + 3].copy_from_slice(&[255, 255, 255]);

    let out = gaussian_blur_u8(&src, w, h, 3, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(3).filter(|px| px[0] != 0).count();
    assert!(nonzero > 1);

    let sum_r: u32 = out.chunks_exact(3).map(|px| u32::from(px[0])).sum();
    assert!((sum_r as i32 - 255).abs() <= 4);
}

#[test]
fn kernel_wider_than_image_clamps_edges() {
    let src = vec![0u8, 0, 0, 255, 255, 255];
    let out = gaussian_blur_u8(
        &src,
        2,
        1,
        3,
        BACKGROUND_BLUR_RADIUS,
        BACKGROUND_BLUR_SIGMA,
    )
    .unwrap();
    assert_eq!(out.len(), src.len());
    // Both pixels converge toward the mean of the clamped row.
    assert!(out[0] > 64 && out[0] < 192);
    assert!(out[3] > 64 && out[3] < 192);
}

#[test]
fn blur_rejects_bad_inputs() {
    assert!(gaussian_blur_u8(&[0u8; 5], 1, 2, 3, 1, 1.0).is_err());
    assert!(gaussian_blur_u8(&[0u8; 6], 1, 2, 3, 1, 0.0).is_err());
    assert!(gaussian_blur_u8(&[0u8; 6], 1, 2, 0, 1, 1.0).is_err());
}
