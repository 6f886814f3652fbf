use std::path::{Path, PathBuf};

use crate::foundation::error::{StillreelError, StillreelResult};

/// A decoded still image in the canonical compositing layout (RGB8, row-major, tightly packed).
///
/// Alpha is discarded during decode: slideshow frames are always opaque.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Path the image was read from (its identity in reports).
    pub path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub rgb8: Vec<u8>,
}

impl SourceImage {
    /// Wrap an already decoded RGB8 buffer.
    pub fn from_rgb8(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        rgb8: Vec<u8>,
    ) -> StillreelResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(StillreelError::image_decode(path, "image has zero size"));
        }
        if rgb8.len() != width as usize * height as usize * 3 {
            return Err(StillreelError::image_decode(
                path,
                "rgb8 buffer does not match width*height*3",
            ));
        }
        Ok(Self {
            path,
            width,
            height,
            rgb8,
        })
    }

    pub(crate) fn view(&self) -> Option<image::ImageBuffer<image::Rgb<u8>, &[u8]>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.rgb8.as_slice())
    }
}

/// Read and decode an image file.
///
/// Any failure (missing file, unknown format, corrupt data) is reported as
/// [`StillreelError::ImageDecode`] carrying `path`.
pub fn decode_image_file(path: &Path) -> StillreelResult<SourceImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| StillreelError::image_decode(path, format!("read failed: {e}")))?;
    decode_image(path, &bytes)
}

/// Decode encoded image bytes and convert to RGB8.
pub fn decode_image(path: impl Into<PathBuf>, bytes: &[u8]) -> StillreelResult<SourceImage> {
    let path = path.into();
    let dyn_img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => return Err(StillreelError::image_decode(path, e.to_string())),
    };
    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    SourceImage::from_rgb8(path, width, height, rgb.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
