use super::*;

fn gradient(path: &str, w: u32, h: u32) -> SourceImage {
    let mut rgb = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            rgb.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 200]);
        }
    }
    SourceImage::from_rgb8(path, w, h, rgb).unwrap()
}

fn fast_opts() -> ComposeOpts {
    ComposeOpts {
        blur_radius: 4,
        blur_sigma: 2.0,
    }
}

#[test]
fn placement_height_bound_source_on_landscape() {
    let p = fit_placement(800, 600, Canvas::new(1920, 1080).unwrap());
    assert_eq!(
        p,
        Placement {
            x: 240,
            y: 0,
            width: 1440,
            height: 1080
        }
    );
}

#[test]
fn placement_width_bound_source_on_portrait() {
    let p = fit_placement(800, 600, Canvas::new(1080, 1920).unwrap());
    assert_eq!(p.width, 1080);
    assert_eq!(p.height, 810);
    assert_eq!(p.x, 0);
    assert_eq!(p.y, (1920 - 810) / 2);
}

#[test]
fn placement_never_exceeds_canvas_and_touches_one_edge() {
    let canvases = [(1920, 1080), (1080, 1920), (7, 5), (1, 1)];
    let sources = [(1, 1), (3, 7), (800, 600), (4000, 10), (10, 4000), (1921, 1081)];
    for (cw, ch) in canvases {
        let canvas = Canvas::new(cw, ch).unwrap();
        for (sw, sh) in sources {
            let p = fit_placement(sw, sh, canvas);
            assert!(p.width <= cw && p.height <= ch, "{sw}x{sh} on {cw}x{ch}");
            assert!(p.width == cw || p.height == ch, "{sw}x{sh} on {cw}x{ch}");
            assert!(p.x + p.width <= cw && p.y + p.height <= ch);
        }
    }
}

#[test]
fn composed_frame_has_exact_canvas_size() {
    let src = gradient("tall.png", 9, 31);
    let canvas = Canvas::new(64, 36).unwrap();
    let frame = compose_frame(&src, canvas, &fast_opts()).unwrap();
    assert_eq!((frame.width, frame.height), (64, 36));
    assert_eq!(frame.rgb8.len(), 64 * 36 * 3);
    assert_eq!(frame.foreground.height, 36);
}

#[test]
fn compose_is_idempotent() {
    let src = gradient("a.png", 40, 30);
    let canvas = Canvas::new(96, 54).unwrap();
    let a = compose_frame(&src, canvas, &fast_opts()).unwrap();
    let b = compose_frame(&src, canvas, &fast_opts()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unscaled_foreground_is_pasted_verbatim() {
    // Same aspect and size as the canvas: the foreground covers everything untouched.
    let src = gradient("same.png", 16, 9);
    let frame = compose_frame(&src, Canvas::new(16, 9).unwrap(), &fast_opts()).unwrap();
    assert_eq!(frame.rgb8, src.rgb8);
}

#[test]
fn bands_come_from_blurred_background() {
    // A bright square on a portrait canvas: the bands above and below stay filled (non-black)
    // by the blurred stretch of the same image.
    let src = SourceImage::from_rgb8("white.png", 8, 8, vec![255; 8 * 8 * 3]).unwrap();
    let frame = compose_frame(&src, Canvas::new(8, 16).unwrap(), &fast_opts()).unwrap();
    assert_eq!(frame.foreground.y, 4);
    assert_eq!(frame.pixel(0, 0), [255, 255, 255]);
    assert_eq!(frame.pixel(7, 15), [255, 255, 255]);
}

#[test]
fn reference_scenario_geometry_with_full_blur() {
    let src = gradient("photo.jpg", 800, 600);
    let frame = compose_frame(&src, Canvas::new(1920, 1080).unwrap(), &ComposeOpts::default())
        .unwrap();
    assert_eq!((frame.width, frame.height), (1920, 1080));
    assert_eq!(frame.foreground.width, 1440);
    assert_eq!(frame.foreground.height, 1080);
    assert_eq!(frame.foreground.x, 240);
    // The centre of the canvas shows the sharp foreground (blue channel is constant 200).
    assert_eq!(frame.pixel(960, 540)[2], 200);
}

#[test]
fn compose_missing_file_is_recoverable() {
    let err = compose_image_file(
        Path::new("target/missing/nope.png"),
        Canvas::new(4, 4).unwrap(),
        &fast_opts(),
    )
    .unwrap_err();
    assert!(err.is_recoverable());
}
