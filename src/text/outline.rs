use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};
use crate::text::measure::{TextExtent, TextMeasurer};

/// A TrueType/OpenType font shaped with Parley and drawn through `vello_cpu` glyph runs.
pub struct OutlineFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font_blob_id: u64,
    font_data: vello_cpu::peniko::FontData,
    faces: Vec<(u64, u32, vello_cpu::peniko::FontData)>,
    size_px: u32,
    source: PathBuf,
    line_height: Option<u32>,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("family_name", &self.family_name)
            .field("size_px", &self.size_px)
            .field("source", &self.source)
            .finish()
    }
}

impl OutlineFont {
    /// Read a font file from disk and register it at `size_px`.
    pub fn load(path: &Path, size_px: u32) -> ReelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes, size_px, path)
    }

    /// Register raw font bytes (the first face of a collection is used).
    pub fn from_bytes(
        font_bytes: Vec<u8>,
        size_px: u32,
        source: impl Into<PathBuf>,
    ) -> ReelResult<Self> {
        if size_px == 0 {
            return Err(ReelError::invalid_input("font size must be > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let blob = parley::fontique::Blob::from(font_bytes.clone());
        let font_blob_id = blob.id();
        let families = font_ctx.collection.register_fonts(blob, None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::invalid_input("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::invalid_input("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font_blob_id,
            font_data,
            faces: Vec::new(),
            size_px,
            source: source.into(),
            line_height: None,
        })
    }

    /// Family name reported by the font's name table.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Where the font bytes came from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    fn shape(&mut self, text: &str) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px as f32));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Shape `text` once so it can be drawn at several offsets.
    pub(crate) fn shape_line(&mut self, text: &str) -> ShapedLine {
        let layout = self.shape(text);
        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let face = run.run().font();
                let font = self.face_for(face.data.id(), face.index, || face.data.data().to_vec());
                let glyphs = run
                    .positioned_glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                runs.push(ShapedRun {
                    font,
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }
        ShapedLine { runs }
    }

    // Runs carry the face parley picked, which need not be face 0 of the loaded file.
    fn face_for(
        &mut self,
        blob_id: u64,
        index: u32,
        bytes: impl FnOnce() -> Vec<u8>,
    ) -> vello_cpu::peniko::FontData {
        let key = (blob_id, index);
        if key == (self.font_blob_id, 0) {
            return self.font_data.clone();
        }
        if let Some((_, _, face)) = self.faces.iter().find(|(id, idx, _)| (*id, *idx) == key) {
            return face.clone();
        }
        let blob = if key.0 == self.font_blob_id {
            self.font_data.data.clone()
        } else {
            vello_cpu::peniko::Blob::from(bytes())
        };
        let face = vello_cpu::peniko::FontData::new(blob, index);
        self.faces.push((key.0, key.1, face.clone()));
        face
    }

    /// Shape and queue `text` with its line box's top-left at `(x, y)`.
    pub fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        x: f64,
        y: f64,
        color: [u8; 4],
    ) {
        self.shape_line(text).fill(ctx, x, y, color);
    }
}

struct ShapedRun {
    font: vello_cpu::peniko::FontData,
    font_size: f32,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// Glyph runs of one shaped line, positioned relative to the line box's top-left.
pub(crate) struct ShapedLine {
    runs: Vec<ShapedRun>,
}

impl ShapedLine {
    /// Queue every run with the line box's top-left at `(x, y)`.
    pub(crate) fn fill(&self, ctx: &mut vello_cpu::RenderContext, x: f64, y: f64, color: [u8; 4]) {
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color[0], color[1], color[2], color[3],
        ));
        for run in &self.runs {
            let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&run.font)
                .font_size(run.font_size)
                .fill_glyphs(glyphs);
        }
    }
}

impl TextMeasurer for OutlineFont {
    fn size_px(&self) -> u32 {
        self.size_px
    }

    fn measure(&mut self, text: &str) -> TextExtent {
        let layout = self.shape(text);
        TextExtent {
            width: layout.full_width().max(0.0).ceil() as u32,
            height: layout.height().max(0.0).ceil() as u32,
        }
    }

    fn line_height(&mut self) -> u32 {
        if let Some(h) = self.line_height {
            return h;
        }
        let h = self.measure("Hg").height.max(1);
        self.line_height = Some(h);
        h
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/outline.rs"]
mod tests;
