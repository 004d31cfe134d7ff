// crates/reelcut-media/src/assembler.rs
//
// Audio assembler (C4, §4.4). Slices kept/trim decisions out of the source
// samples and butt-joins them with an equal-power fade at each internal
// boundary, keeping the output length deterministic (no overlap-add).

use reelcut_core::error::{ReelcutError, Result};
use reelcut_core::model::EditPlan;

/// Extract and join `samples` (mono, at `sample_rate` Hz) per `plan`'s kept
/// decisions, fading `crossfade_ms` at each internal join, then prepend any
/// lead-in silence recorded on the plan (§4.3 step 4).
pub fn assemble(samples: &[f32], sample_rate: u32, plan: &EditPlan, crossfade_ms: u32) -> Result<Vec<f32>> {
    let kept: Vec<_> = plan.kept_decisions().collect();
    if kept.is_empty() {
        return Err(ReelcutError::EmptyPlan);
    }

    let sr = sample_rate as f64;
    let fade_samples = ((crossfade_ms as f64 / 1000.0) * sr).round() as usize;

    let mut slices: Vec<Vec<f32>> = Vec::with_capacity(kept.len());
    for d in &kept {
        let start = (d.start * sr).round() as usize;
        let end = (d.end * sr).round() as usize;
        if end > samples.len() || start >= end {
            return Err(ReelcutError::SliceOutOfRange {
                start: d.start,
                end: d.end,
                source_duration: samples.len() as f64 / sr,
            });
        }
        slices.push(samples[start..end].to_vec());
    }

    if fade_samples > 0 {
        for i in 0..slices.len().saturating_sub(1) {
            if slices[i].len() >= 2 * fade_samples {
                fade_out_tail(&mut slices[i], fade_samples);
            }
        }
        for i in 1..slices.len() {
            if slices[i].len() >= 2 * fade_samples {
                fade_in_head(&mut slices[i], fade_samples);
            }
        }
    }

    let mut out: Vec<f32> = Vec::with_capacity(slices.iter().map(Vec::len).sum());
    for slice in slices {
        out.extend(slice);
    }

    let lead_in_samples = ((plan.lead_in_padding_ms as f64 / 1000.0) * sr).round() as usize;
    if lead_in_samples > 0 {
        let mut padded = vec![0.0f32; lead_in_samples];
        padded.extend(out);
        out = padded;
    }

    Ok(out)
}

fn fade_out_tail(slice: &mut [f32], fade_samples: usize) {
    let n = slice.len();
    let half_pi = std::f64::consts::FRAC_PI_2;
    for i in 0..fade_samples {
        let t = i as f64 / (fade_samples - 1).max(1) as f64;
        let gain = (t * half_pi).cos() as f32;
        slice[n - fade_samples + i] *= gain;
    }
}

fn fade_in_head(slice: &mut [f32], fade_samples: usize) {
    let half_pi = std::f64::consts::FRAC_PI_2;
    for i in 0..fade_samples {
        let t = i as f64 / (fade_samples - 1).max(1) as f64;
        let gain = (t * half_pi).sin() as f32;
        slice[i] *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_core::model::{EditAction, EditDecision};

    fn plan_with(decisions: Vec<EditDecision>, lead_in_padding_ms: u32) -> EditPlan {
        EditPlan {
            decisions,
            source_duration: 10.0,
            edited_duration: 0.0,
            time_saved: 0.0,
            reduction_percent: 0.0,
            lead_in_padding_ms,
            skipped_items: Vec::new(),
            removed_items: Vec::new(),
        }
    }

    fn d(start: f64, end: f64, action: EditAction) -> EditDecision {
        EditDecision { start, end, action, reason: "x".into() }
    }

    #[test]
    fn output_length_matches_kept_duration_within_a_sample() {
        let samples = vec![1.0f32; 1000]; // 1.0s @ 1000Hz
        let plan = plan_with(vec![d(0.0, 0.3, EditAction::Keep), d(0.5, 0.8, EditAction::Keep)], 0);
        let out = assemble(&samples, 1000, &plan, 0).unwrap();
        assert!((out.len() as i64 - 600).abs() <= 1);
    }

    #[test]
    fn empty_plan_is_error() {
        let samples = vec![0.0f32; 100];
        let plan = plan_with(vec![], 0);
        assert_eq!(assemble(&samples, 1000, &plan, 10).unwrap_err().code(), "EmptyPlan");
    }

    #[test]
    fn out_of_bounds_slice_is_error() {
        let samples = vec![0.0f32; 100];
        let plan = plan_with(vec![d(0.0, 5.0, EditAction::Keep)], 0);
        assert_eq!(assemble(&samples, 1000, &plan, 10).unwrap_err().code(), "SliceOutOfRange");
    }

    #[test]
    fn short_slice_bypasses_fade() {
        // 5ms @ 1000Hz = 5 samples, crossfade 10ms = 10 samples -> below 2x threshold
        let samples = vec![1.0f32; 1000];
        let plan = plan_with(vec![d(0.0, 0.005, EditAction::Keep), d(0.5, 0.505, EditAction::Keep)], 0);
        let out = assemble(&samples, 1000, &plan, 10).unwrap();
        assert!(out.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn internal_boundary_fades_but_edges_stay_full_amplitude() {
        let samples = vec![1.0f32; 1000];
        let plan = plan_with(vec![d(0.0, 0.1, EditAction::Keep), d(0.2, 0.3, EditAction::Keep)], 0);
        let out = assemble(&samples, 1000, &plan, 10).unwrap();
        assert_eq!(out[0], 1.0); // very first sample: no preceding slice to fade from
        assert!(out[99] < 1.0); // tail of first slice faded out
        assert!(out[100] < 1.0); // head of second slice faded in
        assert_eq!(*out.last().unwrap(), 1.0); // very last sample: no following slice
    }

    #[test]
    fn lead_in_padding_prepends_silence() {
        let samples = vec![1.0f32; 1000];
        let plan = plan_with(vec![d(0.0, 0.1, EditAction::Keep)], 200);
        let out = assemble(&samples, 1000, &plan, 0).unwrap();
        assert_eq!(out.len(), 300); // 200ms silence + 100ms kept
        assert!(out[0..200].iter().all(|&s| s == 0.0));
    }
}
