// crates/reelcut-core/src/planner.rs
//
// Edit planner (C3, §4.3). Merges VAD output with transcript-derived
// removals and preset config into one validated `EditPlan`.
//
// Internally this works by "painting" an action onto a timeline that starts
// fully `Remove`d, in priority order (silence classification first, then
// speech padding on top, since protecting speech always wins), then
// collapsing the result into run-length decisions. This is interval algebra,
// not per-sample iteration — `paint()` below is the whole mechanism.

use crate::error::ReelcutError;
use crate::model::{
    EditAction, EditDecision, EditPlan, RemovedItem, SilenceSpan, SkippedItem, TranscriptAnalysis,
    VadResult,
};
use crate::preset::PresetConfig;

const MERGE_TOLERANCE_SECS: f64 = 0.001;
const CONTAINMENT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct PlanFlags {
    pub remove_fillers: bool,
    pub remove_restarts: bool,
    pub remove_opening_false_start: bool,
}

impl Default for PlanFlags {
    fn default() -> Self {
        PlanFlags { remove_fillers: true, remove_restarts: true, remove_opening_false_start: true }
    }
}

pub struct PlannerInput<'a> {
    pub vad: &'a VadResult,
    pub transcript: Option<&'a TranscriptAnalysis>,
    pub preset: &'a PresetConfig,
    pub flags: PlanFlags,
    pub lead_in_padding_ms: u32,
}

/// A timeline that starts fully `Remove`d and accepts higher-priority paints
/// on top of lower-priority ones, splitting existing pieces as needed.
struct Paint {
    duration: f64,
    pieces: Vec<(f64, f64, EditAction, &'static str)>,
}

impl Paint {
    fn new(duration: f64) -> Self {
        Paint { duration, pieces: vec![(0.0, duration, EditAction::Remove, "silence")] }
    }

    fn paint(&mut self, start: f64, end: f64, action: EditAction, reason: &'static str) {
        let start = start.clamp(0.0, self.duration);
        let end = end.clamp(0.0, self.duration);
        if end <= start {
            return;
        }
        let mut next = Vec::with_capacity(self.pieces.len() + 2);
        for &(s, e, a, r) in &self.pieces {
            if e <= start || s >= end {
                next.push((s, e, a, r));
                continue;
            }
            if s < start {
                next.push((s, start, a, r));
            }
            if e > end {
                next.push((end, e, a, r));
            }
        }
        next.push((start, end, action, reason));
        next.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        self.pieces = next;
    }

    /// Collapse consecutive pieces sharing the same action into one decision.
    fn into_decisions(mut self) -> Vec<EditDecision> {
        self.pieces.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        let mut out: Vec<EditDecision> = Vec::new();
        for (s, e, a, r) in self.pieces {
            if let Some(last) = out.last_mut() {
                if last.action == a && (s - last.end).abs() <= MERGE_TOLERANCE_SECS {
                    last.end = e;
                    continue;
                }
            }
            out.push(EditDecision { start: s, end: e, action: a, reason: r.to_string() });
        }
        out
    }
}

/// Fraction of `[start, end]` contained within `span`.
fn containment(start: f64, end: f64, span: &SilenceSpan) -> f64 {
    let dur = end - start;
    if dur <= 0.0 {
        return 0.0;
    }
    let overlap_start = start.max(span.start);
    let overlap_end = end.min(span.end);
    (overlap_end - overlap_start).max(0.0) / dur
}

/// Best-matching silence span for an interval, with its containment fraction.
fn best_containing_silence<'a>(
    start: f64,
    end: f64,
    silences: &'a [SilenceSpan],
) -> Option<(&'a SilenceSpan, f64)> {
    silences
        .iter()
        .map(|s| (s, containment(start, end, s)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .filter(|(_, frac)| *frac > 0.0)
}

pub fn plan(input: PlannerInput) -> Result<EditPlan, ReelcutError> {
    let vad = input.vad;
    let duration = vad.duration;
    let preset = input.preset;

    if vad.speech.is_empty() {
        return plan_zero_speech(duration, preset);
    }

    let mut paint = Paint::new(duration);

    // Step 2: classify silences.
    for silence in &vad.silence {
        let dur = silence.duration();
        if dur <= preset.max_kept_silence_secs() {
            paint.paint(silence.start, silence.end, EditAction::Keep, "silence-kept");
        } else {
            let trim_end = silence.start + preset.max_kept_silence_secs();
            paint.paint(silence.start, trim_end, EditAction::Trim, "silence-trim");
            // The remainder is already `Remove` by default — left untouched.
        }
    }

    // Step 1: expand speech (protects speech, painted over silence classification).
    for speech in &vad.speech {
        let start = speech.start - preset.speech_padding_secs();
        let end = speech.end + preset.speech_padding_secs();
        paint.paint(start, end, EditAction::Keep, "speech");
    }

    // Step 3: transcript-backed removals.
    let mut skipped_items = Vec::new();
    let mut removed_items = Vec::new();
    if let Some(t) = input.transcript {
        if input.flags.remove_fillers {
            for f in &t.fillers {
                apply_transcript_removal(
                    &mut paint,
                    &vad.silence,
                    "filler",
                    &f.text,
                    f.start,
                    f.end,
                    &mut skipped_items,
                    &mut removed_items,
                );
            }
        }
        if input.flags.remove_restarts {
            for r in &t.restarts {
                for occ in r.removable() {
                    apply_transcript_removal(
                        &mut paint,
                        &vad.silence,
                        "restart",
                        &r.repeated_text,
                        occ.start,
                        occ.end,
                        &mut skipped_items,
                        &mut removed_items,
                    );
                }
            }
        }
    }

    // Step 4: opening false start.
    let mut lead_in_padding_ms = 0u32;
    if input.flags.remove_opening_false_start {
        if let Some(ofs) = input.transcript.and_then(|t| t.opening_false_start.as_ref()) {
            paint.paint(0.0, ofs.real_start, EditAction::Remove, "opening-false-start");
            lead_in_padding_ms = input.lead_in_padding_ms;
        }
    }

    let full = paint.into_decisions();
    build_plan(full, duration, lead_in_padding_ms, skipped_items, removed_items)
}

#[allow(clippy::too_many_arguments)]
fn apply_transcript_removal(
    paint: &mut Paint,
    silences: &[SilenceSpan],
    kind: &'static str,
    text: &str,
    start: f64,
    end: f64,
    skipped: &mut Vec<SkippedItem>,
    removed: &mut Vec<RemovedItem>,
) {
    match best_containing_silence(start, end, silences) {
        Some((span, frac)) if frac >= CONTAINMENT_THRESHOLD => {
            paint.paint(span.start, span.end, EditAction::Remove, "transcript-removal");
            removed.push(RemovedItem { kind, text: text.to_string(), start: span.start, end: span.end });
        }
        _ => {
            skipped.push(SkippedItem { kind, text: text.to_string(), start, end });
        }
    }
}

fn plan_zero_speech(duration: f64, preset: &PresetConfig) -> Result<EditPlan, ReelcutError> {
    if duration <= preset.min_silence_secs() {
        let decisions = vec![EditDecision {
            start: 0.0,
            end: duration,
            action: EditAction::Keep,
            reason: "zero-speech-short-clip".to_string(),
        }];
        build_plan(decisions, duration, 0, Vec::new(), Vec::new())
    } else {
        Err(ReelcutError::EmptyPlan)
    }
}

/// `full` is the complete internal decision set, Keep/Trim/Remove alike — it
/// is what I1's coverage check validates against. The public `EditPlan`
/// exposes only Keep/Trim (§3): Removed intervals are the implicit gaps
/// between them, not first-class entries a downstream consumer ever sees.
fn build_plan(
    full: Vec<EditDecision>,
    source_duration: f64,
    lead_in_padding_ms: u32,
    skipped_items: Vec<SkippedItem>,
    removed_items: Vec<RemovedItem>,
) -> Result<EditPlan, ReelcutError> {
    validate_coverage(&full, source_duration)?;

    let kept_duration: f64 = full.iter().filter(|d| d.is_kept()).map(|d| d.duration()).sum();
    if kept_duration <= 0.0 {
        return Err(ReelcutError::EmptyPlan);
    }

    let decisions: Vec<EditDecision> = full.into_iter().filter(|d| d.is_kept()).collect();

    let lead_in_secs = lead_in_padding_ms as f64 / 1000.0;
    let edited_duration = kept_duration + lead_in_secs;
    let time_saved = source_duration - kept_duration;
    let reduction_percent = if source_duration > 0.0 { (time_saved / source_duration) * 100.0 } else { 0.0 };

    Ok(EditPlan {
        decisions,
        source_duration,
        edited_duration,
        time_saved,
        reduction_percent,
        lead_in_padding_ms,
        skipped_items,
        removed_items,
    })
}

/// I1: non-overlapping, strictly ascending, covering `[0, duration]`.
fn validate_coverage(decisions: &[EditDecision], duration: f64) -> Result<(), ReelcutError> {
    if decisions.is_empty() {
        return Err(ReelcutError::PlannerInvariant("no decisions produced".to_string()));
    }
    let mut cursor = 0.0;
    for d in decisions {
        if d.end <= d.start {
            return Err(ReelcutError::PlannerInvariant(format!(
                "decision with end <= start: [{}, {})",
                d.start, d.end
            )));
        }
        if (d.start - cursor).abs() > MERGE_TOLERANCE_SECS {
            return Err(ReelcutError::PlannerInvariant(format!(
                "coverage gap or overlap at {cursor} (next decision starts at {})",
                d.start
            )));
        }
        cursor = d.end;
    }
    if (cursor - duration).abs() > MERGE_TOLERANCE_SECS {
        return Err(ReelcutError::PlannerInvariant(format!(
            "decisions cover [0, {cursor}) but clip duration is {duration}"
        )));
    }
    Ok(())
}
