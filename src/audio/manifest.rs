use std::sync::Arc;

use crate::assets::media::{AudioPcm, MIX_SAMPLE_RATE};
use crate::audio::mix::frame_to_sample;
use crate::foundation::core::{FrameRange, Fps};

/// One clip's audio placed on the output sample timeline.
#[derive(Clone, Debug)]
pub(crate) struct AudioSegment {
    /// First output sample frame covered.
    pub(crate) timeline_start_sample: u64,
    /// One past the last output sample frame covered.
    pub(crate) timeline_end_sample: u64,
    /// Decoded source, at its own rate and channel count.
    pub(crate) source: Arc<AudioPcm>,
}

/// Everything needed to render the concatenated soundtrack.
#[derive(Clone, Debug)]
pub(crate) struct AudioManifest {
    /// Output sample rate.
    pub(crate) sample_rate: u32,
    /// Output channel count.
    pub(crate) channels: u16,
    /// Output length in sample frames.
    pub(crate) total_samples: u64,
    /// Segments in timeline order.
    pub(crate) segments: Vec<AudioSegment>,
}

impl AudioManifest {
    /// Place each source at the start of its frame range, ending where the range ends.
    pub(crate) fn from_spans<'a>(
        spans: impl IntoIterator<Item = (FrameRange, &'a Arc<AudioPcm>)>,
        total_frames: u64,
        fps: Fps,
    ) -> Self {
        let segments = spans
            .into_iter()
            .map(|(range, source)| AudioSegment {
                timeline_start_sample: frame_to_sample(range.start.0, fps, MIX_SAMPLE_RATE),
                timeline_end_sample: frame_to_sample(range.end.0, fps, MIX_SAMPLE_RATE),
                source: Arc::clone(source),
            })
            .collect();

        Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: 2,
            total_samples: frame_to_sample(total_frames, fps, MIX_SAMPLE_RATE),
            segments,
        }
    }

    /// Whether any segment carries at least one source sample.
    pub(crate) fn has_audio(&self) -> bool {
        self.segments.iter().any(|s| s.source.frames() > 0)
    }
}
