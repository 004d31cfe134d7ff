// crates/reelcut-media/src/render.rs
//
// Render orchestrator (C8, §4.8). Does not re-implement codecs: composes a
// filter graph and drives one `ffmpeg` invocation per output, mapping the
// graph's video output against the separately assembled audio track.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reelcut_core::error::{ReelcutError, Result};
use reelcut_core::format::FormatSpec;
use reelcut_core::model::{CropRegion, VideoEditPlan};

/// How long a cancelled job's subprocess is given to exit before a hard kill
/// (§5 "Cancellation & timeouts": terminate within 5s).
const CANCEL_GRACE: Duration = Duration::from_secs(5);

pub struct RenderJob<'a> {
    /// Source video file (for the trim+concat video graph).
    pub source: PathBuf,
    /// Offset within `source` where the requested clip begins (§4.5 "Addressing").
    pub clip_start: f64,
    pub video_plan: VideoEditPlan,
    /// Path to the already-assembled audio track (C4 output, written to disk).
    pub audio_path: PathBuf,
    pub crop: CropRegion,
    pub format: &'a FormatSpec,
    /// Burned-in subtitle script file (ASS), if captions are enabled.
    pub subtitle_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

pub struct RenderOutcome {
    pub output_path: PathBuf,
    pub file_size: u64,
}

/// Build the filter graph and run ffmpeg to completion, honoring `cancel`.
pub fn render(job: &RenderJob, cancel: Arc<AtomicBool>) -> Result<RenderOutcome> {
    if job.video_plan.segments.is_empty() {
        return Err(ReelcutError::EmptyPlan);
    }

    let graph = build_filter_complex(job);
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-y", "-i"])
        .arg(&job.source)
        .args(["-i"])
        .arg(&job.audio_path)
        .args(["-filter_complex", &graph])
        .args(["-map", "[vfinal]", "-map", "1:a"])
        .args(["-c:v", codec_name(job.format.codec)])
        .args(["-b:v", &format!("{}M", job.format.bitrate_mbps)])
        .args(["-r", &job.format.fps.to_string()])
        .args(["-c:a", "aac", "-b:a", &format!("{}k", job.format.audio_bitrate_kbps)])
        .arg(&job.output_path)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| ReelcutError::MediaToolFailed {
        command: "ffmpeg (render)".into(),
        exit_code: None,
        stderr_tail: e.to_string(),
    })?;

    let status = wait_with_cancellation(&mut child, &cancel)?;
    if !status.success() {
        let stderr_tail = read_stderr_tail(&mut child);
        return Err(ReelcutError::MediaToolFailed {
            command: "ffmpeg (render)".into(),
            exit_code: status.code(),
            stderr_tail,
        });
    }

    let file_size = std::fs::metadata(&job.output_path).map(|m| m.len()).unwrap_or(0);
    Ok(RenderOutcome { output_path: job.output_path.clone(), file_size })
}

/// Poll the child, killing it if `cancel` flips before it exits (within `CANCEL_GRACE`).
fn wait_with_cancellation(child: &mut Child, cancel: &AtomicBool) -> Result<std::process::ExitStatus> {
    let cancelled_at = loop {
        if let Some(status) = child.try_wait().map_err(io_failure)? {
            return Ok(status);
        }
        if cancel.load(Ordering::Relaxed) {
            break Instant::now();
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    loop {
        if let Some(status) = child.try_wait().map_err(io_failure)? {
            return Ok(status);
        }
        if cancelled_at.elapsed() >= CANCEL_GRACE {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReelcutError::Cancelled);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn io_failure(e: std::io::Error) -> ReelcutError {
    ReelcutError::MediaToolFailed { command: "ffmpeg (render)".into(), exit_code: None, stderr_tail: e.to_string() }
}

fn read_stderr_tail(child: &mut Child) -> String {
    use std::io::Read;
    let mut buf = String::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_string(&mut buf);
    }
    buf.chars().rev().take(1024).collect::<String>().chars().rev().collect()
}

fn codec_name(codec: &str) -> &str {
    match codec {
        "h264" => "libx264",
        "h265" | "hevc" => "libx265",
        other => other,
    }
}

/// Build the `-filter_complex` graph: one `trim`+`setpts` branch per video
/// segment, concatenated, then scaled+cropped, then (optionally) burned
/// with subtitles (§4.8 step 8).
fn build_filter_complex(job: &RenderJob) -> String {
    let n = job.video_plan.segments.len();
    let mut graph = String::new();

    for (i, seg) in job.video_plan.segments.iter().enumerate() {
        let start = seg.start + job.clip_start;
        let end = seg.end + job.clip_start;
        graph.push_str(&format!("[0:v]trim=start={start}:end={end},setpts=PTS-STARTPTS[v{i}];"));
    }

    for i in 0..n {
        graph.push_str(&format!("[v{i}]"));
    }
    graph.push_str(&format!("concat=n={n}:v=1:a=0[vcat];"));

    let crop = &job.crop;
    graph.push_str(&format!(
        "[vcat]scale={}:{},crop={}:{}:{}:{}[vcropped]",
        crop.scaled_width, crop.scaled_height, crop.width, crop.height, crop.x, crop.y
    ));

    match &job.subtitle_path {
        Some(path) => {
            graph.push_str(&format!(";[vcropped]subtitles='{}'[vfinal]", escape_filter_path(path)));
        }
        None => graph.push_str(",null[vfinal]"),
    }

    graph
}

/// Escape a path for embedding inside an ffmpeg filter option string.
fn escape_filter_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\").replace(':', "\\:").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_core::format;
    use reelcut_core::model::{EditAction, SyncMode, VideoEditSegment};

    fn seg(start: f64, end: f64) -> VideoEditSegment {
        VideoEditSegment {
            start,
            end,
            start_frame: start * 30.0,
            end_frame: end * 30.0,
            action: EditAction::Keep,
            reason: "x".into(),
        }
    }

    fn job(subtitle_path: Option<PathBuf>) -> RenderJob<'static> {
        RenderJob {
            source: PathBuf::from("/tmp/source.mp4"),
            clip_start: 2.0,
            video_plan: VideoEditPlan { segments: vec![seg(0.0, 1.0), seg(1.5, 3.0)], mode: SyncMode::Exact, fps: 30.0 },
            audio_path: PathBuf::from("/tmp/edited.pcm"),
            crop: CropRegion { x: 10, y: 0, width: 1080, height: 1920, scale: 1.5, scaled_width: 2880, scaled_height: 1920 },
            format: &format::TIKTOK,
            subtitle_path,
            output_path: PathBuf::from("/tmp/out.mp4"),
        }
    }

    #[test]
    fn graph_adds_clip_start_offset_to_every_segment() {
        let j = job(None);
        let graph = build_filter_complex(&j);
        assert!(graph.contains("trim=start=2:end=3"));
        assert!(graph.contains("trim=start=3.5:end=5"));
    }

    #[test]
    fn graph_concats_all_segments() {
        let j = job(None);
        let graph = build_filter_complex(&j);
        assert!(graph.contains("concat=n=2:v=1:a=0[vcat]"));
    }

    #[test]
    fn graph_scales_and_crops_to_format_exactly() {
        let j = job(None);
        let graph = build_filter_complex(&j);
        assert!(graph.contains("scale=2880:1920,crop=1080:1920:10:0"));
    }

    #[test]
    fn graph_appends_subtitles_filter_when_captions_enabled() {
        let j = job(Some(PathBuf::from("/tmp/captions.ass")));
        let graph = build_filter_complex(&j);
        assert!(graph.contains("subtitles='/tmp/captions.ass'[vfinal]"));
    }

    #[test]
    fn filter_path_escapes_colon_for_windows_style_drives() {
        let escaped = escape_filter_path(Path::new("C:/temp/cap.ass"));
        assert_eq!(escaped, "C\\:/temp/cap.ass");
    }

    #[test]
    fn empty_video_plan_is_rejected_before_spawning_ffmpeg() {
        let mut j = job(None);
        j.video_plan.segments.clear();
        let err = render(&j, Arc::new(AtomicBool::new(false))).unwrap_err();
        assert_eq!(err.code(), "EmptyPlan");
    }
}
