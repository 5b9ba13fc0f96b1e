use crate::clip::stanza::StanzaClip;
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};

/// Placement of one clip on the output timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipSpan {
    /// Position of the clip in the timeline.
    pub index: usize,
    /// Output frames showing the clip.
    pub frames: FrameRange,
    /// Exact start time in seconds.
    pub start_sec: f64,
    /// Exact end time in seconds.
    pub end_sec: f64,
}

/// Stanza clips concatenated back to back, in order.
#[derive(Clone, Debug)]
pub struct Timeline {
    clips: Vec<StanzaClip>,
    spans: Vec<ClipSpan>,
    fps: Fps,
    canvas: Canvas,
}

impl Timeline {
    /// Clips in playback order.
    pub fn clips(&self) -> &[StanzaClip] {
        &self.clips
    }

    /// Frame placement of each clip, parallel to [`Timeline::clips`].
    pub fn spans(&self) -> &[ClipSpan] {
        &self.spans
    }

    /// The single frame rate of the timeline.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Output size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Sum of all clip durations in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.clips.iter().map(StanzaClip::duration_sec).sum()
    }

    /// Frames the export writes.
    pub fn total_frames(&self) -> u64 {
        self.spans.last().map(|s| s.frames.end.0).unwrap_or(0)
    }

    /// Clip shown at output frame `f`.
    pub fn clip_at_frame(&self, f: FrameIndex) -> Option<&StanzaClip> {
        let pos = self.spans.partition_point(|s| s.frames.end.0 <= f.0);
        let span = self.spans.get(pos)?;
        span.frames.contains(f).then(|| &self.clips[span.index])
    }

    /// Clip playing at `secs` from the start.
    pub fn clip_at_time(&self, secs: f64) -> Option<&StanzaClip> {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        let pos = self.spans.partition_point(|s| s.end_sec <= secs);
        self.clips.get(pos)
    }

    pub(crate) fn into_clips(self) -> Vec<StanzaClip> {
        self.clips
    }
}

/// Concatenates stanza clips into a [`Timeline`].
#[derive(Clone, Copy, Debug, Default)]
pub struct VideoAssembler;

impl VideoAssembler {
    /// Concatenate `clips` in the given order.
    ///
    /// Every clip must share one frame rate and canvas. Cut points sit at the nearest frame to
    /// each cumulative timestamp, so rounding never accumulates across clips.
    pub fn assemble(clips: Vec<StanzaClip>) -> ReelResult<Timeline> {
        let Some(first) = clips.first() else {
            return Err(ReelError::invalid_input("cannot assemble an empty clip sequence"));
        };
        let (fps, canvas) = (first.fps(), first.canvas());

        let mut spans = Vec::with_capacity(clips.len());
        let mut start_sec = 0.0f64;
        let mut start_frame = 0u64;
        for (index, clip) in clips.iter().enumerate() {
            if clip.fps() != fps {
                return Err(ReelError::invalid_input(format!(
                    "clip {} runs at {}/{} fps, timeline at {}/{}",
                    index + 1,
                    clip.fps().num,
                    clip.fps().den,
                    fps.num,
                    fps.den
                )));
            }
            if clip.canvas() != canvas {
                return Err(ReelError::invalid_input(format!(
                    "clip {} is {}x{}, timeline is {}x{}",
                    index + 1,
                    clip.canvas().width,
                    clip.canvas().height,
                    canvas.width,
                    canvas.height
                )));
            }

            let end_sec = start_sec + clip.duration_sec();
            let end_frame = fps.secs_to_frames_round(end_sec);
            spans.push(ClipSpan {
                index,
                frames: FrameRange::new(FrameIndex(start_frame), FrameIndex(end_frame))?,
                start_sec,
                end_sec,
            });
            start_sec = end_sec;
            start_frame = end_frame;
        }

        tracing::info!(
            clips = clips.len(),
            duration_sec = start_sec,
            frames = start_frame,
            "timeline assembled"
        );
        Ok(Timeline {
            clips,
            spans,
            fps,
            canvas,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
