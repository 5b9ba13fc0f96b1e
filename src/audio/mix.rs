use std::path::Path;

use anyhow::Context;

use crate::audio::manifest::{AudioManifest, AudioSegment};
use crate::foundation::core::Fps;
use crate::foundation::error::ReelResult;

/// Render all manifest segments into interleaved output PCM.
///
/// Sources are linearly resampled to the manifest rate. Audio past a segment's end is cut,
/// and a source shorter than its segment leaves silence.
pub(crate) fn mix_manifest(manifest: &AudioManifest) -> Vec<f32> {
    let frames = manifest.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(manifest.channels)];

    for seg in &manifest.segments {
        mix_segment(&mut out, manifest, seg);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_segment(out: &mut [f32], manifest: &AudioManifest, seg: &AudioSegment) {
    let src = seg.source.as_ref();
    let src_frames = src.frames();
    if src_frames == 0 || src.sample_rate == 0 {
        return;
    }

    let end = seg.timeline_end_sample.min(manifest.total_samples);
    let step = f64::from(src.sample_rate) / f64::from(manifest.sample_rate);
    let out_channels = usize::from(manifest.channels);

    for dst_sample in seg.timeline_start_sample..end {
        let rel = dst_sample - seg.timeline_start_sample;
        let src_pos = rel as f64 * step;
        let src_frame0 = src_pos.floor() as u64;
        if src_frame0 >= src_frames {
            break;
        }
        let src_frame1 = (src_frame0 + 1).min(src_frames - 1);
        let frac = (src_pos - src_frame0 as f64) as f32;

        let dst_idx = dst_sample as usize * out_channels;
        for ch in 0..manifest.channels {
            let v0 = src.sample(src_frame0, ch);
            let v1 = src.sample(src_frame1, ch);
            out[dst_idx + usize::from(ch)] += v0 + (v1 - v0) * frac;
        }
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub(crate) fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("create audio mix output directory '{}'", parent.display())
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes)
        .with_context(|| format!("write mixed audio file '{}'", out_path.display()))?;
    Ok(())
}

/// Convert a frame count to the nearest sample index at `sample_rate`.
pub(crate) fn frame_to_sample(frame_delta: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frame_delta) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
