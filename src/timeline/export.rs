use std::path::PathBuf;

use crate::audio::manifest::AudioManifest;
use crate::audio::mix::{mix_manifest, write_mix_to_f32le_file};
use crate::config::settings::OutputSettings;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::color::Rgb8;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::assemble::Timeline;

/// Destination and codec choices for [`export`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSettings {
    /// Output video file.
    pub out_path: PathBuf,
    /// Frame rate to encode at; must equal the timeline's.
    pub fps: Fps,
    /// `ffmpeg` video encoder.
    pub video_codec: String,
    /// `ffmpeg` audio encoder.
    pub audio_codec: String,
    /// Optional encoder preset.
    pub preset: Option<String>,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Flattening color for translucent pixels.
    pub matte: Rgb8,
}

impl ExportSettings {
    /// Settings taken from the output section of a configuration.
    pub fn from_output(out_path: impl Into<PathBuf>, output: &OutputSettings) -> ReelResult<Self> {
        Ok(Self {
            out_path: out_path.into(),
            fps: Fps::new(output.fps, 1)?,
            video_codec: output.video_codec.clone(),
            audio_codec: output.audio_codec.clone(),
            preset: output.preset.clone(),
            overwrite: true,
            matte: output.matte,
        })
    }

    pub(crate) fn ffmpeg_sink(&self) -> FfmpegSink {
        FfmpegSink::new(FfmpegSinkOpts {
            out_path: self.out_path.clone(),
            overwrite: self.overwrite,
            matte: self.matte,
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            preset: self.preset.clone(),
            pix_fmt: "yuv420p".to_string(),
        })
    }
}

/// What an export wrote.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Sum of clip durations in seconds.
    pub duration_sec: f64,
    /// Sample frames in the soundtrack, `0` when there was none.
    pub audio_samples: u64,
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn temp_mix_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "versereel_audio_mix_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

/// Encode `timeline` into an MP4 through the system `ffmpeg`.
#[tracing::instrument(level = "info", skip(timeline, settings), fields(out = %settings.out_path.display()))]
pub fn export(timeline: Timeline, settings: &ExportSettings) -> ReelResult<ExportStats> {
    if settings.fps != timeline.fps() {
        return Err(ReelError::invalid_input(format!(
            "export frame rate {}/{} differs from the timeline's {}/{}",
            settings.fps.num,
            settings.fps.den,
            timeline.fps().num,
            timeline.fps().den
        )));
    }

    export_to(timeline, &mut settings.ffmpeg_sink())
}

/// Stream `timeline` into any [`FrameSink`].
///
/// The timeline is consumed; its decoded buffers and the temporary soundtrack are released
/// whether or not the sink succeeds.
pub fn export_to(timeline: Timeline, sink: &mut dyn FrameSink) -> ReelResult<ExportStats> {
    export_with_progress(timeline, sink, &mut |_| {})
}

pub(crate) fn export_with_progress(
    timeline: Timeline,
    sink: &mut dyn FrameSink,
    on_frames: &mut dyn FnMut(u64),
) -> ReelResult<ExportStats> {
    let fps = timeline.fps();
    let canvas = timeline.canvas();
    let total_frames = timeline.total_frames();
    let duration_sec = timeline.duration_sec();
    if total_frames == 0 {
        return Err(ReelError::invalid_input(format!(
            "timeline of {duration_sec:.3}s is shorter than one frame"
        )));
    }

    let spans = timeline.spans().to_vec();
    let manifest = AudioManifest::from_spans(
        spans
            .iter()
            .map(|s| (s.frames, &timeline.clips()[s.index].audio().pcm)),
        total_frames,
        fps,
    );

    let mut audio_tmp = TempFileGuard(None);
    let audio = if manifest.has_audio() {
        let mixed = mix_manifest(&manifest);
        let path = temp_mix_path();
        audio_tmp.0 = Some(path.clone());
        write_mix_to_f32le_file(&mixed, &path)?;
        Some(AudioInputConfig {
            path,
            sample_rate: manifest.sample_rate,
            channels: manifest.channels,
        })
    } else {
        None
    };
    let audio_samples = if audio.is_some() {
        manifest.total_samples
    } else {
        0
    };
    drop(manifest);

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
        total_frames,
        audio,
    })
    .map_err(ReelError::into_encoding)?;

    let mut written = 0u64;
    for (span, clip) in spans.iter().zip(timeline.into_clips()) {
        if span.frames.is_empty() {
            tracing::warn!(
                stanza = clip.index() + 1,
                duration_sec = clip.duration_sec(),
                "clip shorter than half a frame; no frames emitted"
            );
            continue;
        }
        let frame = clip.composite()?;
        drop(clip);
        for f in span.frames.start.0..span.frames.end.0 {
            sink.push_frame(FrameIndex(f), &frame)
                .map_err(ReelError::into_encoding)?;
            written += 1;
        }
        on_frames(written);
        tracing::debug!(stanza = span.index + 1, frames = span.frames.len_frames(), "clip encoded");
    }

    sink.end().map_err(ReelError::into_encoding)?;
    drop(audio_tmp);

    tracing::info!(frames = written, duration_sec, "export finished");
    Ok(ExportStats {
        frames: written,
        duration_sec,
        audio_samples,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/export.rs"]
mod tests;
