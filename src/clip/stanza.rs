use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::media::AudioPcm;
use crate::caption::render::CaptionOverlay;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::ReelResult;
use crate::render::composite::over_in_place;
use crate::render::frame::FrameRGBA;

/// Decoded narration for one stanza.
#[derive(Clone, Debug)]
pub struct AudioTrack {
    /// File the PCM was decoded from.
    pub path: PathBuf,
    /// Decoded samples.
    pub pcm: Arc<AudioPcm>,
}

impl AudioTrack {
    /// Playback length in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.pcm.duration_sec()
    }
}

/// One stanza's static picture bound to its narration.
///
/// Background and caption are both still for the whole clip; the clip lasts exactly as long
/// as its audio.
#[derive(Clone, Debug)]
pub struct StanzaClip {
    pub(crate) index: usize,
    pub(crate) text: String,
    pub(crate) background: PreparedImage,
    pub(crate) overlay: CaptionOverlay,
    pub(crate) audio: AudioTrack,
    pub(crate) fps: Fps,
    pub(crate) canvas: Canvas,
}

impl StanzaClip {
    /// Zero-based position in the stanza list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Caption text as rendered.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Narration length in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.audio.duration_sec()
    }

    /// Frame rate the clip was built for.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Output size the clip was built for.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The narration track.
    pub fn audio(&self) -> &AudioTrack {
        &self.audio
    }

    /// Source file of the narration.
    pub fn audio_path(&self) -> &Path {
        &self.audio.path
    }

    /// Rendered caption overlay.
    pub fn overlay(&self) -> &CaptionOverlay {
        &self.overlay
    }

    /// Background with the caption composited on top.
    pub fn composite(&self) -> ReelResult<FrameRGBA> {
        let mut data = self.background.rgba8_premul.as_ref().clone();
        over_in_place(&mut data, &self.overlay.data)?;
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }
}
