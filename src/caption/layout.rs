//! Caption layout: font size selection, greedy word wrapping, block placement.
//!
//! Font size is picked from character counts before any measurement happens. That heuristic
//! can misjudge proportional fonts with unusually wide or narrow glyphs; wrapping itself is
//! always done against measured pixel widths.

use crate::config::settings::VerticalAnchor;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::text::measure::TextMeasurer;

/// Smallest size long lines are scaled down to.
pub const MIN_FONT_SIZE_PX: u32 = 32;
/// Largest size short lines are scaled up to.
pub const MAX_FONT_SIZE_PX: u32 = 72;
/// Longest-line length above which the font shrinks.
pub const LONG_LINE_CHARS: usize = 60;
/// Longest-line length below which the font grows.
pub const SHORT_LINE_CHARS: usize = 30;
/// Distance kept from the canvas edge by the top and bottom anchors.
pub const EDGE_MARGIN_PX: i32 = 100;

/// One wrapped caption line positioned on the overlay canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutLine {
    /// Line content; empty for a spacer.
    pub text: String,
    /// Measured width in pixels.
    pub width: u32,
    /// Measured height in pixels.
    pub height: u32,
    /// Left edge, horizontally centered.
    pub x: i32,
    /// Top edge.
    pub y: i32,
}

impl LayoutLine {
    /// Spacer lines keep a blank paragraph's vertical room but draw nothing.
    pub fn is_spacer(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Result of laying out one caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionLayout {
    /// Pixel size the lines were measured at.
    pub font_size: u32,
    /// Lines in reading order.
    pub lines: Vec<LayoutLine>,
    /// Height of the whole block including inter-line spacing.
    pub total_height: u32,
}

impl CaptionLayout {
    /// Gap inserted between consecutive lines.
    pub fn line_spacing(&self) -> u32 {
        line_spacing(self.font_size)
    }
}

fn line_spacing(font_size: u32) -> u32 {
    font_size / 4
}

/// Pick a font size from the longest explicit line (in characters) of `text`.
pub fn select_font_size(text: &str, base_size: u32) -> u32 {
    let text = text.trim();
    let longest = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r').chars().count())
        .max()
        .unwrap_or(0);

    if longest > LONG_LINE_CHARS {
        let scaled = (f64::from(base_size) * LONG_LINE_CHARS as f64 / longest as f64) as u32;
        return scaled.max(MIN_FONT_SIZE_PX);
    }
    if longest < SHORT_LINE_CHARS {
        let scaled = (f64::from(base_size) * 1.2) as u32;
        return scaled.min(MAX_FONT_SIZE_PX);
    }
    base_size
}

/// Greedily wrap `text` to `max_width_px`, treating every newline as a hard break.
///
/// Blank paragraphs produce an empty string. A word wider than the budget is kept, alone on
/// its own line.
pub fn wrap_text(text: &str, max_width_px: u32, measurer: &mut dyn TextMeasurer) -> Vec<String> {
    let mut wrapped = Vec::new();
    let space_width = measurer.measure(" ").width;

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            wrapped.push(String::new());
            continue;
        }

        let mut current: Vec<&str> = Vec::new();
        let mut current_width = 0u32;
        for word in paragraph.split_whitespace() {
            let word_width = measurer.measure(word).width;
            let needed = if current.is_empty() {
                word_width
            } else {
                word_width + space_width
            };

            if current_width + needed <= max_width_px {
                current.push(word);
                current_width += needed;
            } else {
                if !current.is_empty() {
                    wrapped.push(current.join(" "));
                }
                current = vec![word];
                current_width = word_width;
            }
        }
        if !current.is_empty() {
            wrapped.push(current.join(" "));
        }
    }

    wrapped
}

/// Places wrapped caption lines on a fixed canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionLayoutEngine {
    max_width_px: u32,
    canvas: Canvas,
    anchor: VerticalAnchor,
}

impl CaptionLayoutEngine {
    /// Create an engine for one canvas and styling.
    pub fn new(max_width_px: u32, canvas: Canvas, anchor: VerticalAnchor) -> Self {
        Self {
            max_width_px,
            canvas,
            anchor,
        }
    }

    /// Wrap, measure and position `text` using a measurer resolved at the selected size.
    pub fn layout(&self, text: &str, measurer: &mut dyn TextMeasurer) -> ReelResult<CaptionLayout> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReelError::invalid_input("caption text is empty"));
        }

        let font_size = measurer.size_px();
        let spacing = line_spacing(font_size);

        let mut wrapped = wrap_text(text, self.max_width_px, measurer);
        if wrapped.is_empty() {
            wrapped.push(text.to_string());
        }

        let mut lines = Vec::with_capacity(wrapped.len());
        for line in wrapped {
            let (width, height) = if line.is_empty() {
                (0, measurer.line_height())
            } else {
                let extent = measurer.measure(&line);
                (extent.width, extent.height)
            };
            lines.push(LayoutLine {
                text: line,
                width,
                height,
                x: 0,
                y: 0,
            });
        }

        let sum_heights: u32 = lines.iter().map(|l| l.height).sum();
        let total_height = sum_heights + (lines.len() as u32 - 1) * spacing;

        let canvas_w = self.canvas.width as i32;
        let canvas_h = self.canvas.height as i32;
        let mut y = match self.anchor {
            VerticalAnchor::Center => (canvas_h - total_height as i32).div_euclid(2),
            VerticalAnchor::Bottom => canvas_h - total_height as i32 - EDGE_MARGIN_PX,
            VerticalAnchor::Top => EDGE_MARGIN_PX,
        };
        for line in &mut lines {
            line.x = (canvas_w - line.width as i32).div_euclid(2);
            line.y = y;
            y += line.height as i32 + spacing as i32;
        }

        tracing::debug!(
            font_size,
            lines = lines.len(),
            total_height,
            "caption layout"
        );

        Ok(CaptionLayout {
            font_size,
            lines,
            total_height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/layout.rs"]
mod tests;
