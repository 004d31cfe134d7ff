// crates/reelcut-media/src/worker.rs
//
// Job runner (§4.8, §5). Each export job is a single-threaded cooperative
// pipeline internally; `JobPool` runs many of them concurrently, each on its
// own thread, sharing only the VAD cache and the immutable preset/format
// tables (§5 "Shared-resource policy").

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use reelcut_core::caption;
use reelcut_core::error::{ReelcutError, Result};
use reelcut_core::format::FormatSpec;
use reelcut_core::model::{
    CaptionStyle, CropRegion, CropResult, SubjectPosition, SyncMode, TranscriptAnalysis, WordEvent,
};
use reelcut_core::planner::{self, PlanFlags, PlannerInput};
use reelcut_core::preset::PresetConfig;
use reelcut_core::{crop, transcript, video_sync};

use crate::assembler;
use crate::cache::VadCache;
use crate::extract;
use crate::probe;
use crate::render::{self, RenderJob};
use crate::subtitle;
use crate::vad::{FfmpegSilenceDetect, VadBackend};

/// §4.3 step 4's `leadInPaddingMs`, used whenever an opening false start is
/// actually removed (scenario 4). Not platform- or preset-tunable per §6.
const OPENING_FALSE_START_LEAD_IN_MS: u32 = 400;

/// One requested export. Constructed by the driver from its job queue entry.
pub struct JobSpec {
    pub job_id: Uuid,
    pub source: PathBuf,
    pub clip_start: f64,
    pub clip_end: f64,
    pub preset: PresetConfig,
    pub format: FormatSpec,
    /// External transcriber output, if the driver supplied one (§4.8 step 3).
    pub words: Option<Vec<WordEvent>>,
    /// External vision-service result, if the driver supplied one (§4.8 step
    /// 6); `None` triggers the centered-default fallback.
    pub subject: Option<SubjectPosition>,
    /// `None` disables caption burn-in even if `words` is present.
    pub caption_style: Option<CaptionStyle>,
    pub output_path: PathBuf,
    pub keep_temp_files: bool,
}

/// Progress events a job emits as it moves through §4.8's steps. The driver
/// drains these off `JobHandle::progress` to report status; the final event
/// is always `Finished`.
#[derive(Debug, Clone)]
pub enum JobProgress {
    Stage(Uuid, &'static str),
    Finished(Uuid, Box<Result<JobReport>>),
}

/// §7's driver-visible success record.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub original_duration: f64,
    pub edited_duration: f64,
    pub time_saved: f64,
    pub percent_reduction: f64,
    pub file_size: u64,
    pub segment_count: usize,
    pub silences_removed: usize,
    pub subject_position: SubjectPosition,
    pub crop_region: CropRegion,
    pub output_path: PathBuf,
}

pub struct JobHandle {
    pub job_id: Uuid,
    pub cancel: Arc<AtomicBool>,
    pub progress: Receiver<JobProgress>,
}

/// Runs `JobSpec`s concurrently, one OS thread per job. The pool itself
/// holds no queue — it is a thin fan-out over `std::thread::spawn`, matching
/// §5's "external job queue drives parallel worker tasks" scheduling model.
pub struct JobPool {
    cache: Arc<VadCache>,
}

impl JobPool {
    pub fn new() -> Self {
        Self { cache: Arc::new(VadCache::new()) }
    }

    /// Spawn `spec` on its own thread. Returns a handle the caller polls for
    /// progress and uses to request cancellation.
    pub fn spawn(&self, spec: JobSpec) -> JobHandle {
        let job_id = spec.job_id;
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = bounded(16);
        let cache = Arc::clone(&self.cache);
        let cancel_for_thread = Arc::clone(&cancel);

        thread::spawn(move || {
            let result = run_job(&spec, &cache, &cancel_for_thread, &tx);
            let _ = tx.send(JobProgress::Finished(job_id, Box::new(result)));
        });

        JobHandle { job_id, cancel, progress: rx }
    }
}

impl Default for JobPool {
    fn default() -> Self {
        Self::new()
    }
}

fn stage(tx: &Sender<JobProgress>, job_id: Uuid, name: &'static str) {
    let _ = tx.send(JobProgress::Stage(job_id, name));
}

fn check_cancelled(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        Err(ReelcutError::Cancelled)
    } else {
        Ok(())
    }
}

/// Drive one job through §4.8 steps 1-12 sequentially. Temp files live under
/// a job-owned directory that is always removed on the way out, success or
/// failure, unless `keep_temp_files` is set (step 12).
fn run_job(
    spec: &JobSpec,
    cache: &VadCache,
    cancel: &Arc<AtomicBool>,
    tx: &Sender<JobProgress>,
) -> Result<JobReport> {
    let job_id = spec.job_id;

    if spec.clip_end <= spec.clip_start || spec.clip_start < 0.0 {
        return Err(ReelcutError::InputInvalid(format!(
            "invalid range [{}, {})",
            spec.clip_start, spec.clip_end
        )));
    }
    let clip_duration = spec.clip_end - spec.clip_start;

    let temp_dir = tempfile::Builder::new().prefix("reelcut-job-").tempdir().map_err(|e| {
        ReelcutError::MediaToolFailed { command: "mkdtemp".into(), exit_code: None, stderr_tail: e.to_string() }
    })?;
    let guard = TempGuard { path: temp_dir.path().to_path_buf(), keep: spec.keep_temp_files };

    stage(tx, job_id, "probe");
    check_cancelled(cancel)?;
    let source_probe = probe::probe(&spec.source)?;
    if spec.clip_end > source_probe.duration {
        return Err(ReelcutError::InputInvalid(format!(
            "clip end {} exceeds source duration {}",
            spec.clip_end, source_probe.duration
        )));
    }

    stage(tx, job_id, "extract_audio");
    check_cancelled(cancel)?;
    let pcm_path = extract::extract_clip_pcm(&spec.source, spec.clip_start, clip_duration, guard.path())?;
    let samples = extract::read_pcm(&pcm_path)?;

    stage(tx, job_id, "detect_silence");
    check_cancelled(cancel)?;
    let vad = match cache.get(&spec.source, spec.preset.id) {
        Some(cached) => (*cached).clone(),
        None => {
            let detected = FfmpegSilenceDetect.detect(&pcm_path, clip_duration, &spec.preset)?;
            cache.insert(&spec.source, spec.preset.id, Arc::new(detected.clone()));
            detected
        }
    };

    stage(tx, job_id, "analyze_transcript");
    check_cancelled(cancel)?;
    let analysis: Option<TranscriptAnalysis> = spec.words.as_deref().map(transcript::analyze);

    stage(tx, job_id, "plan_edit");
    check_cancelled(cancel)?;
    let plan = planner::plan(PlannerInput {
        vad: &vad,
        transcript: analysis.as_ref(),
        preset: &spec.preset,
        flags: PlanFlags::default(),
        lead_in_padding_ms: OPENING_FALSE_START_LEAD_IN_MS,
    })?;

    stage(tx, job_id, "assemble_audio");
    check_cancelled(cancel)?;
    let assembled = assembler::assemble(&samples, extract::PCM_SAMPLE_RATE, &plan, spec.preset.crossfade_ms)?;
    let edited_pcm_path = guard.path().join("edited.pcm");
    write_pcm(&edited_pcm_path, &assembled)?;

    stage(tx, job_id, "sync_video");
    check_cancelled(cancel)?;
    let fps = spec.format.fps as f64;
    let video_plan = video_sync::sync(&plan, fps, SyncMode::Exact)?;

    stage(tx, job_id, "determine_crop");
    check_cancelled(cancel)?;
    let (video_width, video_height) = source_probe
        .video_size
        .ok_or_else(|| ReelcutError::DecodeError("no video stream".into()))?;
    let subject = spec.subject.unwrap_or_else(SubjectPosition::default_center);
    let crop_result: CropResult = crop::calculate(video_width, video_height, &spec.format, Some(subject));

    stage(tx, job_id, "write_captions");
    check_cancelled(cancel)?;
    let subtitle_path = match (&spec.caption_style, &spec.words) {
        (Some(style), Some(words)) => {
            let script = caption::remap(words, &plan, style.clone());
            let path = guard.path().join("captions.ass");
            subtitle::write(&script, &spec.format, &path)?;
            Some(path)
        }
        _ => None,
    };

    stage(tx, job_id, "render");
    check_cancelled(cancel)?;
    let render_job = RenderJob {
        source: spec.source.clone(),
        clip_start: spec.clip_start,
        video_plan: video_plan.clone(),
        audio_path: edited_pcm_path,
        crop: crop_result.crop,
        format: &spec.format,
        subtitle_path,
        output_path: spec.output_path.clone(),
    };
    let outcome = match render::render(&render_job, Arc::clone(cancel)) {
        Ok(outcome) => outcome,
        Err(e) => {
            if matches!(e, ReelcutError::Cancelled) {
                let _ = std::fs::remove_file(&spec.output_path);
            }
            return Err(e);
        }
    };

    let silences_removed =
        plan.removed_items.iter().filter(|i| matches!(i.kind, "silence" | "filler" | "restart")).count();

    Ok(JobReport {
        original_duration: source_probe.duration,
        edited_duration: plan.edited_duration,
        time_saved: plan.time_saved,
        percent_reduction: plan.reduction_percent,
        file_size: outcome.file_size,
        segment_count: video_plan.segments.len(),
        silences_removed,
        subject_position: subject,
        crop_region: crop_result.crop,
        output_path: outcome.output_path,
    })
}

fn write_pcm(path: &Path, samples: &[f32]) -> Result<()> {
    let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    std::fs::write(path, bytes).map_err(|e| ReelcutError::MediaToolFailed {
        command: "write edited.pcm".into(),
        exit_code: None,
        stderr_tail: e.to_string(),
    })
}

/// Deletes the job's temp directory on drop unless the driver asked to keep
/// it (§4.8 step 12).
struct TempGuard {
    path: PathBuf,
    keep: bool,
}

impl TempGuard {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
