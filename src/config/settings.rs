use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgb8;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Where the caption block sits vertically on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    /// Top edge of the block 100 px below the canvas top.
    Top,
    /// Block centered vertically.
    #[default]
    Center,
    /// Bottom edge of the block 100 px above the canvas bottom.
    Bottom,
}

impl std::str::FromStr for VerticalAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!(
                "unknown caption anchor '{other}' (expected top, center or bottom)"
            )),
        }
    }
}

/// Caption styling consumed by layout and rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    /// Preferred font file. System candidates and the built-in font are tried after it.
    pub font_path: Option<PathBuf>,
    /// Base pixel size before per-stanza scaling.
    pub base_font_size: u32,
    /// Glyph fill color.
    pub fill: Rgb8,
    /// Outline color.
    pub stroke: Rgb8,
    /// Outline radius in pixels; `0` disables the outline.
    pub stroke_width: u32,
    /// Wrapping budget for one caption line.
    pub max_width_px: u32,
    /// Vertical placement of the caption block.
    pub anchor: VerticalAnchor,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_path: None,
            base_font_size: 48,
            fill: Rgb8::WHITE,
            stroke: Rgb8::BLACK,
            stroke_width: 2,
            max_width_px: 900,
            anchor: VerticalAnchor::Center,
        }
    }
}

/// Output resolution, timing and codec choices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output width in pixels (even, for yuv420p).
    pub width: u32,
    /// Output height in pixels (even, for yuv420p).
    pub height: u32,
    /// Frames per second for every clip of the timeline.
    pub fps: u32,
    /// ffmpeg video encoder name.
    pub video_codec: String,
    /// ffmpeg audio encoder name.
    pub audio_codec: String,
    /// Optional encoder preset (`-preset`).
    pub preset: Option<String>,
    /// Color any remaining transparency is flattened onto before encoding.
    pub matte: Rgb8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: Some("medium".to_string()),
            matte: Rgb8::BLACK,
        }
    }
}

/// How stanza clips are built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipThreading {
    /// Build stanza clips on a rayon pool. Output order is unaffected.
    pub parallel: bool,
    /// Worker count for the pool; `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Caption styling.
    pub caption: CaptionStyle,
    /// Output settings.
    pub output: OutputSettings,
    /// Clip build threading.
    pub threading: ClipThreading,
}

impl ReelConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ReelError::invalid_input(format!("config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> ReelResult<()> {
        let c = &self.caption;
        if c.base_font_size == 0 {
            return Err(ReelError::invalid_input("caption.base_font_size must be > 0"));
        }
        if c.max_width_px == 0 {
            return Err(ReelError::invalid_input("caption.max_width_px must be > 0"));
        }

        let o = &self.output;
        if o.width == 0 || o.height == 0 {
            return Err(ReelError::invalid_input("output width/height must be > 0"));
        }
        if !o.width.is_multiple_of(2) || !o.height.is_multiple_of(2) {
            return Err(ReelError::invalid_input(
                "output width/height must be even (required for yuv420p output)",
            ));
        }
        if o.width > u32::from(u16::MAX) || o.height > u32::from(u16::MAX) {
            return Err(ReelError::invalid_input(
                "output width/height must fit in 16 bits",
            ));
        }
        if o.fps == 0 {
            return Err(ReelError::invalid_input("output.fps must be > 0"));
        }
        if o.video_codec.trim().is_empty() || o.audio_codec.trim().is_empty() {
            return Err(ReelError::invalid_input("output codecs must be non-empty"));
        }
        if self.threading.threads == Some(0) {
            return Err(ReelError::invalid_input("threading.threads must be > 0"));
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> ReelResult<Canvas> {
        Canvas::new(self.output.width, self.output.height)
    }

    /// Output frame rate.
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.output.fps, 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
