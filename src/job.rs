//! Progress record for one composition run, shared between the worker and any poller.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::foundation::error::ReelError;

/// Where a composition run currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    /// Created, not started.
    #[default]
    Pending,
    /// Checking counts, texts and file existence.
    Validating,
    /// Rendering captions and decoding media per stanza.
    BuildingClips,
    /// Concatenating clips into a timeline.
    Assembling,
    /// Streaming frames to the encoder.
    Encoding,
    /// Output written.
    Completed,
    /// Stopped on an error.
    Failed,
}

impl JobStage {
    /// Whether the run has stopped.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Snapshot of a run's progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Current stage.
    pub stage: JobStage,
    /// Number of stanzas in the run.
    pub clips_total: u32,
    /// Stanza clips finished so far.
    pub clips_built: u32,
    /// Frames the export will write.
    pub frames_total: u64,
    /// Frames handed to the encoder so far.
    pub frames_written: u64,
    /// Destination of the finished video.
    pub output: Option<PathBuf>,
    /// Failure message once `stage` is `Failed`.
    pub error_message: Option<String>,
}

impl JobStatus {
    /// Rough completion in percent: clip building counts for the first half, encoding for the
    /// second.
    pub fn progress_percent(&self) -> u8 {
        match self.stage {
            JobStage::Completed => return 100,
            JobStage::Pending | JobStage::Validating => return 0,
            _ => {}
        }
        let clips = if self.clips_total == 0 {
            0.0
        } else {
            f64::from(self.clips_built) / f64::from(self.clips_total)
        };
        let frames = if self.frames_total == 0 {
            0.0
        } else {
            self.frames_written as f64 / self.frames_total as f64
        };
        ((clips * 50.0 + frames * 50.0).clamp(0.0, 99.0)) as u8
    }
}

/// Cloneable handle to one run's [`JobStatus`].
#[derive(Debug, Clone, Default)]
pub struct JobHandle(Arc<Mutex<JobStatus>>);

impl JobHandle {
    /// Fresh `Pending` job.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JobStatus> {
        // A panicking updater leaves plain data behind; keep reporting it.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current status.
    pub fn snapshot(&self) -> JobStatus {
        self.lock().clone()
    }

    /// Current stage.
    pub fn stage(&self) -> JobStage {
        self.lock().stage
    }

    pub(crate) fn set_stage(&self, stage: JobStage) {
        let mut s = self.lock();
        if s.stage != stage {
            tracing::debug!(from = ?s.stage, to = ?stage, "job stage");
            s.stage = stage;
        }
    }

    pub(crate) fn set_clips_total(&self, total: usize) {
        self.lock().clips_total = u32::try_from(total).unwrap_or(u32::MAX);
    }

    pub(crate) fn clip_built(&self) {
        let mut s = self.lock();
        s.clips_built = s.clips_built.saturating_add(1);
    }

    pub(crate) fn set_frames_total(&self, total: u64) {
        self.lock().frames_total = total;
    }

    pub(crate) fn set_frames_written(&self, written: u64) {
        self.lock().frames_written = written;
    }

    pub(crate) fn complete(&self, output: PathBuf) {
        let mut s = self.lock();
        s.stage = JobStage::Completed;
        s.output = Some(output);
    }

    pub(crate) fn fail(&self, err: &ReelError) {
        let mut s = self.lock();
        s.stage = JobStage::Failed;
        s.error_message = Some(err.to_string());
    }
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
