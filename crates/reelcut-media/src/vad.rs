// crates/reelcut-media/src/vad.rs
//
// Voice-activity detection (C1, §4.1). A pluggable backend trait with one
// concrete implementation: ffmpeg's `silencedetect` filter, parsed from
// stderr — the fallback path §4.1 describes, and the only backend the
// system this pipeline was distilled from ever shipped.

use std::path::Path;
use std::process::Command;

use reelcut_core::error::{ReelcutError, Result};
use reelcut_core::model::{SilenceSpan, SpeechSpan, VadResult};
use reelcut_core::preset::PresetConfig;

pub trait VadBackend {
    fn detect(&self, audio_path: &Path, duration: f64, preset: &PresetConfig) -> Result<VadResult>;
}

/// Sample rate of the headerless PCM this backend is always fed (§4.8 step 2
/// extracts to 16 kHz mono before analysis — see `crate::extract`).
const PCM_SAMPLE_RATE: u32 = crate::extract::PCM_SAMPLE_RATE;

/// Fixed noise floor for the silencedetect filter. Independent of
/// `PresetConfig::vad_threshold`, which tunes a probabilistic detector this
/// backend doesn't have.
const NOISE_THRESHOLD_DB: &str = "-30dB";

pub struct FfmpegSilenceDetect;

impl VadBackend for FfmpegSilenceDetect {
    fn detect(&self, audio_path: &Path, duration: f64, preset: &PresetConfig) -> Result<VadResult> {
        let filter = format!("silencedetect=noise={NOISE_THRESHOLD_DB}:d={}", preset.min_silence_secs());
        let output = Command::new("ffmpeg")
            .args([
                "-f", "f32le", "-ar", &PCM_SAMPLE_RATE.to_string(), "-ac", "1",
                "-i", &audio_path.to_string_lossy(),
                "-af", &filter,
                "-f", "null", "-",
            ])
            .output()
            .map_err(|e| ReelcutError::DetectorUnavailable(e.to_string()))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() && stderr.contains("No such file or directory") {
            return Err(ReelcutError::DecodeError(
                stderr.lines().last().unwrap_or("unknown decode failure").to_string(),
            ));
        }

        let silence = clip_spans(parse_silences(&stderr), duration);
        let speech = complement(&silence, duration);
        Ok(VadResult { duration, speech, silence })
    }
}

/// Parse `silence_start: N` / `silence_end: N | silence_duration: N` pairs
/// out of ffmpeg's stderr log.
fn parse_silences(stderr: &str) -> Vec<SilenceSpan> {
    const START_TAG: &str = "silence_start:";
    const END_TAG: &str = "silence_end:";

    let mut out = Vec::new();
    let mut current_start: Option<f64> = None;

    for line in stderr.lines() {
        if let Some(idx) = line.find(START_TAG) {
            let rest = &line[idx + START_TAG.len()..];
            current_start = rest.split_whitespace().next().and_then(|v| v.parse().ok());
        } else if let Some(idx) = line.find(END_TAG) {
            let Some(start) = current_start.take() else { continue };
            let rest = &line[idx + END_TAG.len()..];
            if let Some(end) = rest.split_whitespace().next().and_then(|v| v.parse::<f64>().ok()) {
                if end > start {
                    out.push(SilenceSpan { start, end });
                }
            }
        }
    }
    out
}

fn clip_spans(spans: Vec<SilenceSpan>, duration: f64) -> Vec<SilenceSpan> {
    spans
        .into_iter()
        .map(|s| SilenceSpan { start: s.start.clamp(0.0, duration), end: s.end.clamp(0.0, duration) })
        .filter(|s| s.end > s.start)
        .collect()
}

/// Fill the gaps left by `silence` with speech spans so the two lists
/// jointly cover `[0, duration]` (§4.1's output contract).
fn complement(silence: &[SilenceSpan], duration: f64) -> Vec<SpeechSpan> {
    let mut speech = Vec::new();
    let mut cursor = 0.0;
    for s in silence {
        if s.start > cursor {
            speech.push(SpeechSpan { start: cursor, end: s.start });
        }
        cursor = s.end;
    }
    if duration > cursor {
        speech.push(SpeechSpan { start: cursor, end: duration });
    }
    speech
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_silencedetect_output() {
        let stderr = "\
[silencedetect @ 0x1] silence_start: 1.5
[silencedetect @ 0x1] silence_end: 3.2 | silence_duration: 1.7
[silencedetect @ 0x1] silence_start: 8.0
[silencedetect @ 0x1] silence_end: 9.0 | silence_duration: 1.0
";
        let spans = parse_silences(stderr);
        assert_eq!(spans, vec![SilenceSpan { start: 1.5, end: 3.2 }, SilenceSpan { start: 8.0, end: 9.0 }]);
    }

    #[test]
    fn complement_covers_full_range_around_silences() {
        let silence = vec![SilenceSpan { start: 2.0, end: 4.0 }];
        let speech = complement(&silence, 10.0);
        assert_eq!(speech, vec![SpeechSpan { start: 0.0, end: 2.0 }, SpeechSpan { start: 4.0, end: 10.0 }]);
    }

    #[test]
    fn complement_with_no_silence_is_one_speech_span() {
        let speech = complement(&[], 5.0);
        assert_eq!(speech, vec![SpeechSpan { start: 0.0, end: 5.0 }]);
    }

    #[test]
    fn unterminated_silence_start_is_discarded() {
        let stderr = "[silencedetect @ 0x1] silence_start: 1.5\n";
        assert!(parse_silences(stderr).is_empty());
    }
}
