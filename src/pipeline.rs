//! End-to-end composition: validate, build stanza clips, assemble, export.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::clip::builder::StanzaClipBuilder;
use crate::clip::stanza::StanzaClip;
use crate::config::settings::{ClipThreading, ReelConfig};
use crate::encode::ffmpeg::is_ffmpeg_on_path;
use crate::encode::sink::FrameSink;
use crate::foundation::error::{ReelError, ReelResult};
use crate::job::{JobHandle, JobStage};
use crate::timeline::assemble::VideoAssembler;
use crate::timeline::export::{ExportSettings, ExportStats, export_with_progress};

/// Everything one video is made from, in stanza order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositionInputs {
    /// Caption text per stanza.
    pub stanzas: Vec<String>,
    /// Narration file per stanza.
    pub audio_paths: Vec<PathBuf>,
    /// Background image per stanza; extras past the stanza count are ignored.
    pub background_paths: Vec<PathBuf>,
}

/// Check counts, texts and file existence before any decoding or rendering.
pub fn validate_inputs(inputs: &CompositionInputs) -> ReelResult<()> {
    let n = inputs.stanzas.len();
    if n == 0 {
        return Err(ReelError::invalid_input("no stanzas to compose"));
    }
    if inputs.audio_paths.len() != n {
        return Err(ReelError::invalid_input(format!(
            "mismatch: {} stanzas but {} audio files",
            n,
            inputs.audio_paths.len()
        )));
    }
    if inputs.background_paths.len() < n {
        return Err(ReelError::invalid_input(format!(
            "not enough backgrounds: {} backgrounds for {} stanzas",
            inputs.background_paths.len(),
            n
        )));
    }

    for (i, text) in inputs.stanzas.iter().enumerate() {
        if text.trim().is_empty() {
            return Err(ReelError::invalid_input("caption text is empty").for_stanza(i + 1));
        }
    }
    for (i, path) in inputs.audio_paths.iter().enumerate() {
        if !path.is_file() {
            return Err(ReelError::resource_not_found(
                format!("audio for stanza {}", i + 1),
                path,
            ));
        }
    }
    for (i, path) in inputs.background_paths.iter().take(n).enumerate() {
        if !path.is_file() {
            return Err(ReelError::resource_not_found(
                format!("background for stanza {}", i + 1),
                path,
            ));
        }
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::invalid_input(
            "clip threading 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

/// Build one clip per stanza, in stanza order.
///
/// With `threading.parallel` the stanzas are built on a rayon pool; the returned order is
/// still the input order.
pub fn build_clips(
    inputs: &CompositionInputs,
    builder: &StanzaClipBuilder,
    threading: &ClipThreading,
    job: Option<&JobHandle>,
) -> ReelResult<Vec<StanzaClip>> {
    let n = inputs.stanzas.len();
    let build_one = |i: usize| -> ReelResult<StanzaClip> {
        let clip = builder.build(
            i,
            &inputs.stanzas[i],
            &inputs.audio_paths[i],
            &inputs.background_paths[i],
        )?;
        if let Some(job) = job {
            job.clip_built();
        }
        Ok(clip)
    };

    if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        tracing::info!(stanzas = n, threads = pool.current_num_threads(), "building clips in parallel");
        pool.install(|| (0..n).into_par_iter().map(build_one).collect())
    } else {
        tracing::info!(stanzas = n, "building clips");
        (0..n).map(build_one).collect()
    }
}

/// Compose the video and stream it into `sink`.
#[tracing::instrument(level = "info", skip_all, fields(stanzas = inputs.stanzas.len()))]
pub fn compose_into_sink(
    inputs: &CompositionInputs,
    config: &ReelConfig,
    sink: &mut dyn FrameSink,
    job: Option<&JobHandle>,
) -> ReelResult<ExportStats> {
    let result = compose_inner(inputs, config, sink, job, || Ok(()));
    if let (Some(job), Err(e)) = (job, &result) {
        job.fail(e);
    }
    result
}

/// Compose the video and encode it to `out_path` with the system `ffmpeg`.
///
/// Nothing is written when validation fails.
#[tracing::instrument(level = "info", skip_all, fields(stanzas = inputs.stanzas.len(), out = %out_path.display()))]
pub fn compose_video(
    inputs: &CompositionInputs,
    config: &ReelConfig,
    out_path: &Path,
    job: Option<&JobHandle>,
) -> ReelResult<ExportStats> {
    let result = compose_to_file(inputs, config, out_path, job);
    match (job, &result) {
        (Some(job), Ok(_)) => job.complete(out_path.to_path_buf()),
        (Some(job), Err(e)) => job.fail(e),
        (None, _) => {}
    }
    result
}

fn compose_to_file(
    inputs: &CompositionInputs,
    config: &ReelConfig,
    out_path: &Path,
    job: Option<&JobHandle>,
) -> ReelResult<ExportStats> {
    let settings = ExportSettings::from_output(out_path, &config.output)?;
    let mut sink = settings.ffmpeg_sink();
    compose_inner(inputs, config, &mut sink, job, || {
        if is_ffmpeg_on_path() {
            Ok(())
        } else {
            Err(ReelError::encoding(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ))
        }
    })
}

fn compose_inner(
    inputs: &CompositionInputs,
    config: &ReelConfig,
    sink: &mut dyn FrameSink,
    job: Option<&JobHandle>,
    preflight: impl FnOnce() -> ReelResult<()>,
) -> ReelResult<ExportStats> {
    let stage = |s: JobStage| {
        if let Some(job) = job {
            job.set_stage(s);
        }
    };

    stage(JobStage::Validating);
    config.validate()?;
    validate_inputs(inputs)?;
    preflight()?;

    stage(JobStage::BuildingClips);
    if let Some(job) = job {
        job.set_clips_total(inputs.stanzas.len());
    }
    let builder = StanzaClipBuilder::new(config)?;
    let clips = build_clips(inputs, &builder, &config.threading, job)?;

    stage(JobStage::Assembling);
    let timeline = VideoAssembler::assemble(clips)?;
    if let Some(job) = job {
        job.set_frames_total(timeline.total_frames());
    }

    stage(JobStage::Encoding);
    let stats = export_with_progress(timeline, sink, &mut |written| {
        if let Some(job) = job {
            job.set_frames_written(written);
        }
    })?;

    stage(JobStage::Completed);
    tracing::info!(frames = stats.frames, duration_sec = stats.duration_sec, "composition finished");
    Ok(stats)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
