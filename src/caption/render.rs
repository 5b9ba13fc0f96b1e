//! Caption rasterization onto a transparent, canvas-sized overlay.

use crate::caption::layout::{CaptionLayout, CaptionLayoutEngine, select_font_size};
use crate::config::settings::CaptionStyle;
use crate::foundation::color::Rgb8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::resolve::{CaptionFont, resolve_font};

/// Premultiplied RGBA8 image, transparent wherever no caption ink landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionOverlay {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub data: Vec<u8>,
}

impl CaptionOverlay {
    /// Fully transparent overlay covering `canvas`.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba_len()],
        }
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`; out-of-bounds reads are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
            self.data[off + 3],
        ]
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

/// Draws laid-out caption lines with an outline pass followed by a fill pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionRenderer {
    canvas: Canvas,
    fill: Rgb8,
    stroke: Rgb8,
    stroke_width: u32,
}

impl CaptionRenderer {
    /// Renderer for `canvas` using the colors and outline radius from `style`.
    pub fn new(canvas: Canvas, style: &CaptionStyle) -> Self {
        Self {
            canvas,
            fill: style.fill,
            stroke: style.stroke,
            stroke_width: style.stroke_width,
        }
    }

    /// Rasterize `layout` with `font`. The font must be the one the layout was measured with.
    pub fn render(
        &self,
        layout: &CaptionLayout,
        font: &mut CaptionFont,
    ) -> ReelResult<CaptionOverlay> {
        match font {
            CaptionFont::Outline(f) => self.render_outline(layout, f),
            CaptionFont::Builtin(f) => Ok(self.render_builtin(layout, f)),
        }
    }

    fn stroke_offsets(&self) -> Vec<(i32, i32)> {
        let s = self.stroke_width as i32;
        let mut out = Vec::new();
        for dy in -s..=s {
            for dx in -s..=s {
                if dx != 0 || dy != 0 {
                    out.push((dx, dy));
                }
            }
        }
        out
    }

    fn render_outline(
        &self,
        layout: &CaptionLayout,
        font: &mut crate::text::outline::OutlineFont,
    ) -> ReelResult<CaptionOverlay> {
        let w = u16::try_from(self.canvas.width)
            .map_err(|_| ReelError::invalid_input("caption canvas width exceeds u16"))?;
        let h = u16::try_from(self.canvas.height)
            .map_err(|_| ReelError::invalid_input("caption canvas height exceeds u16"))?;

        let offsets = self.stroke_offsets();
        let stroke = self.stroke.to_opaque_rgba8();
        let fill = self.fill.to_opaque_rgba8();

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for line in layout.lines.iter().filter(|l| !l.is_spacer()) {
            let (x, y) = (f64::from(line.x), f64::from(line.y));
            let shaped = font.shape_line(&line.text);
            for (dx, dy) in &offsets {
                shaped.fill(&mut ctx, x + f64::from(*dx), y + f64::from(*dy), stroke);
            }
            shaped.fill(&mut ctx, x, y, fill);
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(CaptionOverlay {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn render_builtin(
        &self,
        layout: &CaptionLayout,
        font: &crate::text::builtin::BuiltinFont,
    ) -> CaptionOverlay {
        let mut overlay = CaptionOverlay::transparent(self.canvas);
        let offsets = self.stroke_offsets();
        let stroke = self.stroke.to_opaque_rgba8();
        let fill = self.fill.to_opaque_rgba8();

        for line in layout.lines.iter().filter(|l| !l.is_spacer()) {
            for (dx, dy) in &offsets {
                font.draw(
                    &mut overlay.data,
                    self.canvas,
                    &line.text,
                    line.x + dx,
                    line.y + dy,
                    stroke,
                );
            }
            font.draw(
                &mut overlay.data,
                self.canvas,
                &line.text,
                line.x,
                line.y,
                fill,
            );
        }
        overlay
    }
}

/// Select the font size for `text`, resolve a font at that size and lay the caption out.
pub fn prepare_caption(
    text: &str,
    style: &CaptionStyle,
    canvas: Canvas,
) -> ReelResult<(CaptionLayout, CaptionFont)> {
    let size = select_font_size(text, style.base_font_size);
    let mut font = resolve_font(style.font_path.as_deref(), size);
    let engine = CaptionLayoutEngine::new(style.max_width_px, canvas, style.anchor);
    let layout = engine.layout(text, &mut font)?;
    Ok((layout, font))
}

/// Lay out and rasterize one caption in a single call.
#[tracing::instrument(level = "debug", skip(text, style), fields(chars = text.len()))]
pub fn render_caption(
    text: &str,
    style: &CaptionStyle,
    canvas: Canvas,
) -> ReelResult<CaptionOverlay> {
    let (layout, mut font) = prepare_caption(text, style, canvas)?;
    tracing::debug!(font = %font.describe(), size = layout.font_size, "caption font");
    CaptionRenderer::new(canvas, style).render(&layout, &mut font)
}

#[cfg(test)]
#[path = "../../tests/unit/caption/render.rs"]
mod tests;
