use super::*;

#[test]
fn new_job_is_pending_and_empty() {
    let job = JobHandle::new();
    let s = job.snapshot();
    assert_eq!(s.stage, JobStage::Pending);
    assert_eq!(s.progress_percent(), 0);
    assert!(s.output.is_none());
}

#[test]
fn clones_share_state() {
    let job = JobHandle::new();
    let worker = job.clone();
    worker.set_stage(JobStage::BuildingClips);
    worker.set_clips_total(4);
    worker.clip_built();
    worker.clip_built();

    let s = job.snapshot();
    assert_eq!(s.stage, JobStage::BuildingClips);
    assert_eq!(s.clips_built, 2);
    assert_eq!(s.progress_percent(), 25);
}

#[test]
fn encoding_progress_fills_second_half() {
    let job = JobHandle::new();
    job.set_clips_total(2);
    job.clip_built();
    job.clip_built();
    job.set_stage(JobStage::Encoding);
    job.set_frames_total(100);
    job.set_frames_written(50);
    assert_eq!(job.snapshot().progress_percent(), 75);

    job.complete(PathBuf::from("/tmp/out.mp4"));
    let s = job.snapshot();
    assert!(s.stage.is_terminal());
    assert_eq!(s.progress_percent(), 100);
    assert_eq!(s.output.as_deref(), Some(std::path::Path::new("/tmp/out.mp4")));
}

#[test]
fn failure_records_message() {
    let job = JobHandle::new();
    job.fail(&ReelError::invalid_input("3 stanzas but 2 audio files"));
    let s = job.snapshot();
    assert_eq!(s.stage, JobStage::Failed);
    assert!(s.error_message.unwrap().contains("3 stanzas"));
}

#[test]
fn status_serializes_with_snake_case_stage() {
    let job = JobHandle::new();
    job.set_stage(JobStage::BuildingClips);
    let json = serde_json::to_value(job.snapshot()).unwrap();
    assert_eq!(json["stage"], "building_clips");
    let back: JobStatus = serde_json::from_value(json).unwrap();
    assert_eq!(back.stage, JobStage::BuildingClips);
}

#[test]
fn poisoned_lock_still_reports() {
    let job = JobHandle::new();
    let clone = job.clone();
    let _ = std::thread::spawn(move || {
        let _guard = clone.0.lock().unwrap();
        panic!("worker died");
    })
    .join();
    job.set_stage(JobStage::Failed);
    assert_eq!(job.stage(), JobStage::Failed);
}
