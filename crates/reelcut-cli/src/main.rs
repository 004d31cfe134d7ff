// crates/reelcut-cli/src/main.rs
//
// Thin CLI driver: parses one export job off the command line, runs it
// in-process through `reelcut_media::worker`, and prints the §7 structured
// result as JSON. No HTTP surface, storage, or job queue — those are the
// external driver's job (§1 Non-goals).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use uuid::Uuid;

use reelcut_core::format;
use reelcut_core::model::{CaptionStyle, SubjectPosition, WordEvent};
use reelcut_core::preset;
use reelcut_media::worker::{JobPool, JobProgress, JobSpec};

#[derive(Parser)]
#[command(name = "reelcut", about = "Clip production pipeline: VAD, transcript-aware cuts, crop, captions", version)]
struct Cli {
    /// Source media file.
    source: PathBuf,

    /// Clip start, in seconds, within the source.
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Clip end, in seconds, within the source.
    #[arg(long)]
    end: f64,

    /// Editing preset: linkedin | youtube_shorts | tiktok | podcast.
    #[arg(long, default_value = "tiktok")]
    preset: String,

    /// Export format: tiktok | youtube_shorts | instagram_reels | linkedin | twitter | square.
    #[arg(long, default_value = "tiktok")]
    format: String,

    /// Word-level transcript, as a JSON array of `{text,start,end,confidence?}`.
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Burn in karaoke captions (requires --transcript).
    #[arg(long, default_value_t = false)]
    captions: bool,

    /// Normalized subject position `x,y,headY,confidence`; defaults to centered.
    #[arg(long, value_parser = parse_subject)]
    subject: Option<SubjectPosition>,

    /// Output file path.
    #[arg(long)]
    output: PathBuf,

    /// Keep the job's temp directory instead of deleting it on exit.
    #[arg(long, default_value_t = false)]
    keep_temp_files: bool,
}

fn parse_subject(s: &str) -> Result<SubjectPosition, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let [x, y, head_y, confidence] = parts[..] else {
        return Err("expected x,y,headY,confidence".to_string());
    };
    Ok(SubjectPosition {
        x: x.parse().map_err(|_| "bad x")?,
        y: y.parse().map_err(|_| "bad y")?,
        head_y: head_y.parse().map_err(|_| "bad headY")?,
        confidence: confidence.parse().map_err(|_| "bad confidence")?,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let preset_config = preset::get_preset(&cli.preset).context("resolving --preset")?;
    let format_spec = format::get_format(&cli.format).context("resolving --format")?;

    let words: Option<Vec<WordEvent>> = match &cli.transcript {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            Some(serde_json::from_str(&raw).context("parsing --transcript as a word-event array")?)
        }
        None => None,
    };
    if cli.captions && words.is_none() {
        bail!("--captions requires --transcript");
    }

    let job_id = Uuid::new_v4();
    let spec = JobSpec {
        job_id,
        source: cli.source,
        clip_start: cli.start,
        clip_end: cli.end,
        preset: preset_config,
        format: format_spec,
        words,
        subject: cli.subject,
        caption_style: cli.captions.then(CaptionStyle::default),
        output_path: cli.output,
        keep_temp_files: cli.keep_temp_files,
    };

    let pool = JobPool::new();
    let started = Instant::now();
    tracing::info!(%job_id, "job started");
    let handle = pool.spawn(spec);

    let mut outcome = None;
    for event in handle.progress.iter() {
        match event {
            JobProgress::Stage(id, name) => {
                tracing::info!(job_id = %id, stage = name, elapsed_ms = started.elapsed().as_millis(), "stage");
            }
            JobProgress::Finished(id, result) => {
                tracing::info!(job_id = %id, elapsed_ms = started.elapsed().as_millis(), "job finished");
                outcome = Some(*result);
            }
        }
    }

    let record = match outcome {
        Some(Ok(report)) => json!({
            "success": true,
            "originalDuration": report.original_duration,
            "editedDuration": report.edited_duration,
            "timeSaved": report.time_saved,
            "percentReduction": report.percent_reduction,
            "fileSize": report.file_size,
            "segmentCount": report.segment_count,
            "silencesRemoved": report.silences_removed,
            "subjectPosition": {
                "x": report.subject_position.x,
                "y": report.subject_position.y,
                "headY": report.subject_position.head_y,
                "confidence": report.subject_position.confidence,
            },
            "cropRegion": {
                "x": report.crop_region.x,
                "y": report.crop_region.y,
                "width": report.crop_region.width,
                "height": report.crop_region.height,
            },
            "outputPath": report.output_path,
        }),
        Some(Err(e)) => {
            tracing::error!(job_id = %job_id, code = e.code(), "job failed");
            json!({ "success": false, "error": { "code": e.code(), "message": e.to_string() } })
        }
        None => {
            tracing::error!(job_id = %job_id, "job runner exited without a result");
            json!({ "success": false, "error": { "code": "Cancelled", "message": "job runner exited without a result" } })
        }
    };

    println!("{}", serde_json::to_string_pretty(&record)?);
    if record["success"].as_bool() != Some(true) {
        std::process::exit(1);
    }
    Ok(())
}
