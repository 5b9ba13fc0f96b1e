use std::path::{Path, PathBuf};

use crate::foundation::error::ReelError;
use crate::foundation::probe::{Probe, first_available};
use crate::text::builtin::BuiltinFont;
use crate::text::measure::{TextExtent, TextMeasurer};
use crate::text::outline::OutlineFont;

/// Font files tried, in order, after the configured font.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A font that can always measure and draw: either a loaded outline font or the built-in
/// bitmap glyphs.
#[derive(Debug)]
pub enum CaptionFont {
    /// A font file resolved from the configured path or a system candidate.
    Outline(Box<OutlineFont>),
    /// Built-in bitmap glyphs.
    Builtin(BuiltinFont),
}

impl CaptionFont {
    /// Whether resolution fell all the way through to the built-in glyphs.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Outline(f) => format!("{} ({})", f.family_name(), f.source().display()),
            Self::Builtin(f) => format!("built-in bitmap x{}", f.scale()),
        }
    }
}

impl TextMeasurer for CaptionFont {
    fn size_px(&self) -> u32 {
        match self {
            Self::Outline(f) => f.size_px(),
            Self::Builtin(f) => f.size_px(),
        }
    }

    fn measure(&mut self, text: &str) -> TextExtent {
        match self {
            Self::Outline(f) => f.measure(text),
            Self::Builtin(f) => f.measure(text),
        }
    }

    fn line_height(&mut self) -> u32 {
        match self {
            Self::Outline(f) => f.line_height(),
            Self::Builtin(f) => f.line_height(),
        }
    }
}

struct FontFileProbe {
    path: PathBuf,
    size_px: u32,
}

impl Probe for FontFileProbe {
    type Output = OutlineFont;

    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn probe(&self) -> anyhow::Result<OutlineFont> {
        OutlineFont::load(&self.path, self.size_px).map_err(anyhow::Error::from)
    }
}

/// Resolve a caption font: the configured file first, then [`SYSTEM_FONT_CANDIDATES`].
///
/// Never fails. When every candidate is rejected the exhaustion is logged and the built-in
/// bitmap font is returned.
pub fn resolve_font(configured: Option<&Path>, size_px: u32) -> CaptionFont {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));
    resolve_font_from(candidates, size_px)
}

/// Resolve from an explicit candidate list, falling back to the built-in bitmap font.
pub fn resolve_font_from(candidates: impl IntoIterator<Item = PathBuf>, size_px: u32) -> CaptionFont {
    let probes = candidates
        .into_iter()
        .map(|path| FontFileProbe { path, size_px });
    match first_available(probes) {
        Ok((font, label)) => {
            tracing::debug!(font = %label, family = font.family_name(), size_px, "resolved caption font");
            CaptionFont::Outline(Box::new(font))
        }
        Err(exhausted) => {
            let err = ReelError::font_exhausted(exhausted.to_string());
            tracing::warn!(error = %err, size_px, "using built-in bitmap font");
            CaptionFont::Builtin(BuiltinFont::new(size_px))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/resolve.rs"]
mod tests;
