// crates/reelcut-core/src/duration.rs
//
// Duration estimator (C10, §4.9). Reuses cached VAD output and applies the
// §4.3 silence-classification rule symbolically to a subrange, without
// running the planner or touching audio. O(spans in range).

use crate::model::{DurationEstimate, VadResult};
use crate::preset::PresetConfig;

/// Estimate the edited duration of `[start, end)` within `vad` under `preset`,
/// without building an `EditPlan` or rendering anything.
pub fn estimate(vad: &VadResult, start: f64, end: f64, preset: &PresetConfig) -> DurationEstimate {
    let start = start.max(0.0);
    let end = end.min(vad.duration);
    let original_duration = (end - start).max(0.0);

    let speech_time: f64 = vad
        .speech
        .iter()
        .map(|s| overlap(s.start, s.end, start, end))
        .sum();

    let mut kept_silence_time = 0.0;
    let mut silences_in_range = 0u32;
    for silence in &vad.silence {
        let clipped = overlap(silence.start, silence.end, start, end);
        if clipped <= 0.0 {
            continue;
        }
        silences_in_range += 1;
        // §4.3 step 2: short silences are kept whole; long ones are trimmed
        // down to maxKeptSilenceMs with the remainder discarded.
        kept_silence_time += clipped.min(preset.max_kept_silence_secs());
    }

    let estimated_duration = speech_time + kept_silence_time;
    let time_saved = (original_duration - estimated_duration).max(0.0);
    let percent_reduction = if original_duration > 0.0 {
        (time_saved / original_duration) * 100.0
    } else {
        0.0
    };

    DurationEstimate {
        original_duration,
        estimated_duration,
        time_saved,
        percent_reduction,
        speech_time,
        silence_time: kept_silence_time,
        silences_in_range,
    }
}

fn overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> f64 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SilenceSpan, SpeechSpan};

    fn preset() -> PresetConfig {
        crate::preset::TIKTOK
    }

    #[test]
    fn whole_clip_matches_source_when_no_silence_trimmed() {
        let vad = VadResult {
            duration: 10.0,
            speech: vec![SpeechSpan { start: 0.0, end: 10.0 }],
            silence: vec![],
        };
        let est = estimate(&vad, 0.0, 10.0, &preset());
        assert_eq!(est.estimated_duration, 10.0);
        assert_eq!(est.time_saved, 0.0);
        assert_eq!(est.silences_in_range, 0);
    }

    #[test]
    fn long_silence_in_range_is_trimmed_symbolically() {
        let vad = VadResult {
            duration: 10.0,
            speech: vec![SpeechSpan { start: 0.0, end: 2.0 }, SpeechSpan { start: 4.0, end: 10.0 }],
            silence: vec![SilenceSpan { start: 2.0, end: 4.0 }],
        };
        let p = preset(); // tiktok: max_kept_silence_ms = 150
        let est = estimate(&vad, 0.0, 10.0, &p);
        assert_eq!(est.speech_time, 8.0);
        assert!((est.silence_time - p.max_kept_silence_secs()).abs() < 1e-9);
        assert!((est.estimated_duration - (8.0 + p.max_kept_silence_secs())).abs() < 1e-9);
        assert_eq!(est.silences_in_range, 1);
    }

    #[test]
    fn subrange_clips_spans_at_boundaries() {
        let vad = VadResult {
            duration: 10.0,
            speech: vec![SpeechSpan { start: 0.0, end: 10.0 }],
            silence: vec![],
        };
        let est = estimate(&vad, 3.0, 7.0, &preset());
        assert_eq!(est.original_duration, 4.0);
        assert_eq!(est.speech_time, 4.0);
    }

    #[test]
    fn percent_reduction_is_zero_for_empty_range() {
        let vad = VadResult { duration: 10.0, speech: vec![], silence: vec![] };
        let est = estimate(&vad, 5.0, 5.0, &preset());
        assert_eq!(est.percent_reduction, 0.0);
    }
}
