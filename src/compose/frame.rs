use std::path::Path;

use image::imageops::{self, FilterType};

use crate::assets::decode::{SourceImage, decode_image_file};
use crate::effects::blur::{BACKGROUND_BLUR_RADIUS, BACKGROUND_BLUR_SIGMA, gaussian_blur_u8};
use crate::foundation::core::Canvas;
use crate::foundation::error::{StillreelError, StillreelResult};

/// One fully composited, opaque RGB8 canvas.
///
/// `width`/`height` always equal the canvas the frame was composed for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub rgb8: Vec<u8>,
    /// Where the sharp foreground sits on the canvas.
    pub foreground: Placement,
}

impl Frame {
    /// Solid-color frame, mainly useful for tests and previews.
    pub fn solid(canvas: Canvas, rgb: [u8; 3]) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            rgb8: rgb.repeat(canvas.pixel_count()),
            foreground: Placement {
                x: 0,
                y: 0,
                width: canvas.width,
                height: canvas.height,
            },
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.rgb8[i], self.rgb8[i + 1], self.rgb8[i + 2]]
    }
}

/// Axis-aligned rectangle of the foreground inside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Knobs for the background treatment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComposeOpts {
    /// Gaussian blur radius applied to the background source.
    pub blur_radius: u32,
    /// Gaussian blur sigma.
    pub blur_sigma: f32,
}

impl Default for ComposeOpts {
    fn default() -> Self {
        Self {
            blur_radius: BACKGROUND_BLUR_RADIUS,
            blur_sigma: BACKGROUND_BLUR_SIGMA,
        }
    }
}

/// Fit `src_w x src_h` inside `canvas` with a uniform scale of
/// `min(W / src_w, H / src_h)` and center it.
///
/// The binding dimension matches the canvas exactly; the other one is truncated. Offsets are
/// truncated too, so an odd leftover puts the extra pixel on the right/bottom band.
pub fn fit_placement(src_w: u32, src_h: u32, canvas: Canvas) -> Placement {
    let (cw, ch) = (u64::from(canvas.width), u64::from(canvas.height));
    let (sw, sh) = (u64::from(src_w.max(1)), u64::from(src_h.max(1)));

    // W/sw <= H/sh  <=>  W*sh <= H*sw
    let (width, height) = if cw * sh <= ch * sw {
        (cw, (sh * cw / sw).clamp(1, ch))
    } else {
        ((sw * ch / sh).clamp(1, cw), ch)
    };

    Placement {
        x: ((cw - width) / 2) as u32,
        y: ((ch - height) / 2) as u32,
        width: width as u32,
        height: height as u32,
    }
}

/// Compose one still into a `canvas`-sized frame: a heavily blurred, stretched copy of the image
/// fills the canvas and the sharp, aspect-preserving fit is pasted over its center.
#[tracing::instrument(level = "debug", skip(src, opts), fields(path = %src.path.display()))]
pub fn compose_frame(
    src: &SourceImage,
    canvas: Canvas,
    opts: &ComposeOpts,
) -> StillreelResult<Frame> {
    let view = src
        .view()
        .ok_or_else(|| StillreelError::image_decode(&src.path, "pixel buffer size mismatch"))?;

    let blurred = gaussian_blur_u8(
        &src.rgb8,
        src.width,
        src.height,
        3,
        opts.blur_radius,
        opts.blur_sigma,
    )?;
    let blurred = image::RgbImage::from_raw(src.width, src.height, blurred)
        .ok_or_else(|| StillreelError::image_decode(&src.path, "blurred buffer size mismatch"))?;
    let mut background = imageops::resize(
        &blurred,
        canvas.width,
        canvas.height,
        FilterType::Triangle,
    );

    let place = fit_placement(src.width, src.height, canvas);
    tracing::debug!(
        src_w = src.width,
        src_h = src.height,
        fg_w = place.width,
        fg_h = place.height,
        x = place.x,
        y = place.y,
        "foreground placement"
    );

    if place.width == src.width && place.height == src.height {
        imageops::replace(&mut background, &view, i64::from(place.x), i64::from(place.y));
    } else {
        let foreground = imageops::resize(&view, place.width, place.height, FilterType::Triangle);
        imageops::replace(
            &mut background,
            &foreground,
            i64::from(place.x),
            i64::from(place.y),
        );
    }

    Ok(Frame {
        width: canvas.width,
        height: canvas.height,
        rgb8: background.into_raw(),
        foreground: place,
    })
}

/// Decode `path` and compose it. Decode problems surface as [`StillreelError::ImageDecode`].
pub fn compose_image_file(
    path: &Path,
    canvas: Canvas,
    opts: &ComposeOpts,
) -> StillreelResult<Frame> {
    let src = decode_image_file(path)?;
    compose_frame(&src, canvas, opts)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/frame.rs"]
mod tests;
