use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster ready for compositing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Decode an encoded image (any format the `image` crate recognizes) at its native size.
pub fn decode_image(bytes: &[u8]) -> ReelResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Load a background image scaled to cover `canvas` and center-cropped to exactly its size.
pub fn load_background(path: &Path, canvas: Canvas) -> ReelResult<PreparedImage> {
    if !path.is_file() {
        return Err(ReelError::resource_not_found("background image", path));
    }

    let dyn_img =
        image::open(path).with_context(|| format!("decode background '{}'", path.display()))?;
    let (src_w, src_h) = (dyn_img.width(), dyn_img.height());

    let filled = if (src_w, src_h) == (canvas.width, canvas.height) {
        dyn_img
    } else {
        dyn_img.resize_to_fill(
            canvas.width,
            canvas.height,
            image::imageops::FilterType::Triangle,
        )
    };

    let mut rgba8_premul = filled.to_rgba8().into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    tracing::debug!(
        path = %path.display(),
        src_w,
        src_h,
        dst_w = canvas.width,
        dst_h = canvas.height,
        "background prepared"
    );

    Ok(PreparedImage {
        width: canvas.width,
        height: canvas.height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
