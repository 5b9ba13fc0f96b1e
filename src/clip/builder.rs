use std::path::Path;
use std::sync::Arc;

use crate::assets::decode::load_background;
use crate::assets::media::decode_audio;
use crate::caption::render::render_caption;
use crate::clip::stanza::{AudioTrack, StanzaClip};
use crate::config::settings::{CaptionStyle, ReelConfig};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Builds [`StanzaClip`]s for one output format and caption style.
#[derive(Clone, Debug)]
pub struct StanzaClipBuilder {
    style: CaptionStyle,
    canvas: Canvas,
    fps: Fps,
}

impl StanzaClipBuilder {
    /// Builder using the caption style, resolution and frame rate of `config`.
    pub fn new(config: &ReelConfig) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            style: config.caption.clone(),
            canvas: config.canvas()?,
            fps: config.fps()?,
        })
    }

    /// Builder with explicit parts.
    pub fn with_parts(style: CaptionStyle, canvas: Canvas, fps: Fps) -> Self {
        Self { style, canvas, fps }
    }

    /// Output size clips are built at.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frame rate clips are built at.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Build the clip for stanza `index` (zero-based).
    ///
    /// Both files must exist; the clip's duration is the decoded audio length.
    #[tracing::instrument(level = "info", skip(self, text), fields(stanza = index + 1))]
    pub fn build(
        &self,
        index: usize,
        text: &str,
        audio_path: &Path,
        background_path: &Path,
    ) -> ReelResult<StanzaClip> {
        let number = index + 1;
        let text = text.trim();
        if text.is_empty() {
            return Err(ReelError::invalid_input("caption text is empty").for_stanza(number));
        }
        if !audio_path.is_file() {
            return Err(ReelError::resource_not_found(
                format!("audio for stanza {number}"),
                audio_path,
            ));
        }
        if !background_path.is_file() {
            return Err(ReelError::resource_not_found(
                format!("background for stanza {number}"),
                background_path,
            ));
        }

        let pcm = decode_audio(audio_path).map_err(|e| e.for_stanza(number))?;
        if pcm.frames() == 0 {
            return Err(ReelError::invalid_input(format!(
                "audio '{}' contains no samples",
                audio_path.display()
            ))
            .for_stanza(number));
        }

        let background =
            load_background(background_path, self.canvas).map_err(|e| e.for_stanza(number))?;
        let overlay =
            render_caption(text, &self.style, self.canvas).map_err(|e| e.for_stanza(number))?;

        let clip = StanzaClip {
            index,
            text: text.to_string(),
            background,
            overlay,
            audio: AudioTrack {
                path: audio_path.to_path_buf(),
                pcm: Arc::new(pcm),
            },
            fps: self.fps,
            canvas: self.canvas,
        };
        tracing::info!(duration_sec = clip.duration_sec(), "stanza clip built");
        Ok(clip)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clip/builder.rs"]
mod tests;
