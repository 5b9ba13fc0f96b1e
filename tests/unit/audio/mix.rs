use std::sync::Arc;

use super::*;
use crate::assets::media::AudioPcm;
use crate::foundation::core::{FrameIndex, FrameRange};

fn pcm(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Arc<AudioPcm> {
    Arc::new(AudioPcm {
        sample_rate,
        channels,
        interleaved_f32: samples,
    })
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn frame_to_sample_uses_rational_fps() {
    let fps = Fps::new(30000, 1001).unwrap();
    let samples = frame_to_sample(300, fps, 48_000);
    assert!(samples > 470_000 && samples < 490_000);
    assert_eq!(frame_to_sample(30, Fps::new(30, 1).unwrap(), 48_000), 48_000);
}

#[test]
fn segments_are_concatenated_back_to_back() {
    let fps = Fps::new(10, 1).unwrap();
    let a = pcm(48_000, 2, vec![0.25; 4_800 * 2]);
    let b = pcm(48_000, 2, vec![-0.5; 9_600 * 2]);
    let manifest = AudioManifest::from_spans([(range(0, 1), &a), (range(1, 3), &b)], 3, fps);

    assert_eq!(manifest.total_samples, 14_400);
    assert_eq!(manifest.segments[1].timeline_start_sample, 4_800);
    assert!(manifest.has_audio());

    let out = mix_manifest(&manifest);
    assert_eq!(out.len(), 14_400 * 2);
    assert_eq!(out[0], 0.25);
    assert_eq!(out[4_799 * 2 + 1], 0.25);
    assert_eq!(out[4_800 * 2], -0.5);
    assert_eq!(out[out.len() - 1], -0.5);
}

#[test]
fn mono_source_is_upmixed_and_resampled() {
    let fps = Fps::new(1, 1).unwrap();
    // 24 kHz mono ramp, one second long.
    let ramp: Vec<f32> = (0..24_000).map(|i| i as f32 / 24_000.0).collect();
    let src = pcm(24_000, 1, ramp);
    let manifest = AudioManifest::from_spans([(range(0, 1), &src)], 1, fps);

    let out = mix_manifest(&manifest);
    assert_eq!(out.len(), 48_000 * 2);
    // Output sample 3 sits halfway between source samples 1 and 2.
    let expected = 1.5 / 24_000.0;
    assert!((out[6] - expected).abs() < 1e-6);
    assert_eq!(out[6], out[7]);
}

#[test]
fn short_source_leaves_silence_and_long_source_is_cut() {
    let fps = Fps::new(1, 1).unwrap();
    let short = pcm(48_000, 2, vec![0.5; 100 * 2]);
    let long = pcm(48_000, 2, vec![0.5; 96_000 * 2]);
    let manifest = AudioManifest::from_spans([(range(0, 1), &short), (range(1, 2), &long)], 2, fps);

    let out = mix_manifest(&manifest);
    assert_eq!(out.len(), 96_000 * 2);
    assert_eq!(out[99 * 2], 0.5);
    assert_eq!(out[100 * 2], 0.0);
    assert_eq!(out[47_999 * 2], 0.0);
    assert_eq!(out[48_000 * 2], 0.5);
}

#[test]
fn mix_is_clamped() {
    let fps = Fps::new(1, 1).unwrap();
    let loud = pcm(48_000, 1, vec![3.0; 48_000]);
    let manifest = AudioManifest::from_spans([(range(0, 1), &loud)], 1, fps);
    let out = mix_manifest(&manifest);
    assert!(out.iter().all(|s| *s == 1.0));
}

#[test]
fn empty_sources_have_no_audio() {
    let fps = Fps::new(1, 1).unwrap();
    let empty = pcm(48_000, 2, Vec::new());
    let manifest = AudioManifest::from_spans([(range(0, 1), &empty)], 1, fps);
    assert!(!manifest.has_audio());
    assert!(mix_manifest(&manifest).iter().all(|s| *s == 0.0));
}

#[test]
fn f32le_file_round_trips_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mix.f32le");
    write_mix_to_f32le_file(&[0.5, -1.0], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), -1.0);
}
