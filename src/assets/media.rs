use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate of the concatenated soundtrack handed to the encoder.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Decoded interleaved PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Interleaved samples in `[-1, 1]`.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Playback length in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Sample `frame` of `channel` (mono sources feed every channel).
    pub(crate) fn sample(&self, frame: u64, channel: u16) -> f32 {
        let ch = if self.channels == 1 { 0 } else { channel };
        if ch >= self.channels {
            return 0.0;
        }
        let idx = frame as usize * usize::from(self.channels) + usize::from(ch);
        self.interleaved_f32.get(idx).copied().unwrap_or(0.0)
    }
}

/// Decode an audio file.
///
/// `.wav` files are read natively at their own rate and channel count. Other containers need
/// the `media-ffmpeg` feature and come back as 48 kHz stereo.
pub fn decode_audio(path: &Path) -> ReelResult<AudioPcm> {
    if !path.is_file() {
        return Err(ReelError::resource_not_found("audio file", path));
    }

    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"));

    let pcm = if is_wav {
        decode_wav(path)?
    } else {
        decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)?
    };

    tracing::debug!(
        path = %path.display(),
        sample_rate = pcm.sample_rate,
        channels = pcm.channels,
        duration_sec = pcm.duration_sec(),
        "audio decoded"
    );
    Ok(pcm)
}

fn decode_wav(path: &Path) -> ReelResult<AudioPcm> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("open wav file '{}'", path.display()))?;
    let spec = reader.spec();

    let interleaved_f32: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .with_context(|| format!("read float samples from '{}'", path.display()))?,
        hound::SampleFormat::Int => {
            if !(1..=32).contains(&spec.bits_per_sample) {
                return Err(ReelError::invalid_input(format!(
                    "unsupported wav bit depth {} in '{}'",
                    spec.bits_per_sample,
                    path.display()
                )));
            }
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .with_context(|| format!("read int samples from '{}'", path.display()))?
        }
    };

    Ok(AudioPcm {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        interleaved_f32,
    })
}

#[cfg(feature = "media-ffmpeg")]
fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .with_context(|| format!("run ffmpeg to decode '{}'", path.display()))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        return Err(ReelError::invalid_input(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::invalid_input(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let interleaved_f32 = out
        .stdout
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
fn decode_audio_f32_stereo(path: &Path, _sample_rate: u32) -> ReelResult<AudioPcm> {
    Err(ReelError::invalid_input(format!(
        "'{}' is not a wav file; other audio formats require the 'media-ffmpeg' feature",
        path.display()
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
