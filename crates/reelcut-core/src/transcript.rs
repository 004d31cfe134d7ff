// crates/reelcut-core/src/transcript.rs
//
// Transcript analyzer (C2, §4.2). Pure function of a word stream — no I/O,
// deterministic given identical inputs.

use crate::model::{Filler, Occurrence, OpeningFalseStart, RestartSpan, TranscriptAnalysis, WordEvent};

/// Sounds that are always safe to remove on their own (no surrounding
/// context needed to judge them disposable).
const PURE_FILLERS: &[&str] = &["um", "uh", "er", "ah", "eh", "hmm", "hm", "mm", "mmm"];

/// Fillers whose removal depends on surrounding context; still flagged so
/// the planner can weigh them, but never silently assumed disposable.
const CONTEXT_FILLERS: &[&[&str]] = &[
    &["like"],
    &["so"],
    &["well"],
    &["actually"],
    &["basically"],
    &["literally"],
    &["you", "know"],
    &["i", "mean"],
];

const OPENING_WINDOW_SECS: f64 = 15.0;
const OPENING_GAP_THRESHOLD_SECS: f64 = 0.5;
const RESTART_MIN_GAP_MS: f64 = 0.0;
const RESTART_MAX_GAP_MS: f64 = 500.0;

/// Run the full transcript analysis: fillers, restarts, opening false start.
pub fn analyze(words: &[WordEvent]) -> TranscriptAnalysis {
    TranscriptAnalysis {
        fillers: detect_fillers(words),
        restarts: detect_restarts(words),
        opening_false_start: detect_opening_false_start(words),
    }
}

/// Match both pure and context-dependent filler vocabularies against the
/// word stream, including multi-token phrases like "you know".
pub fn detect_fillers(words: &[WordEvent]) -> Vec<Filler> {
    let normalized: Vec<String> = words.iter().map(WordEvent::normalized).collect();
    let mut out = Vec::new();
    let mut i = 0;
    'outer: while i < words.len() {
        for phrase in CONTEXT_FILLERS {
            if matches_phrase(&normalized, i, phrase) {
                let last = i + phrase.len() - 1;
                out.push(Filler {
                    text: words[i..=last].iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" "),
                    start: words[i].start,
                    end: words[last].end,
                    pure_filler: false,
                });
                i = last + 1;
                continue 'outer;
            }
        }
        if PURE_FILLERS.contains(&normalized[i].as_str()) {
            out.push(Filler {
                text: words[i].text.clone(),
                start: words[i].start,
                end: words[i].end,
                pure_filler: true,
            });
        }
        i += 1;
    }
    out
}

fn matches_phrase(normalized: &[String], at: usize, phrase: &[&str]) -> bool {
    if at + phrase.len() > normalized.len() {
        return false;
    }
    normalized[at..at + phrase.len()]
        .iter()
        .zip(phrase.iter())
        .all(|(w, p)| w == p)
}

/// Scan for repeated words with a short inter-word gap, accumulating runs of
/// ≥2 occurrences (§4.2's restart detection). The scan cursor resumes after
/// the entire matched run, so overlapping runs are never double-counted.
pub fn detect_restarts(words: &[WordEvent]) -> Vec<RestartSpan> {
    let normalized: Vec<String> = words.iter().map(WordEvent::normalized).collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < words.len() {
        let mut run = vec![i];
        let mut j = i + 1;
        while j < words.len() && normalized[j] == normalized[i] {
            let gap_ms = (words[j].start - words[j - 1].end) * 1000.0;
            if gap_ms < RESTART_MIN_GAP_MS || gap_ms > RESTART_MAX_GAP_MS {
                break;
            }
            run.push(j);
            j += 1;
        }
        if run.len() >= 2 {
            out.push(RestartSpan {
                repeated_text: words[run[0]].text.clone(),
                occurrences: run
                    .iter()
                    .map(|&k| Occurrence { start: words[k].start, end: words[k].end })
                    .collect(),
                first_start: words[run[0]].start,
                last_end: words[*run.last().unwrap()].end,
            });
            i = j;
        } else {
            i += 1;
        }
    }
    out
}

/// Detect a false start in the first 15s: the earliest gap ≥0.5s whose
/// surrounding words share a common prefix (§4.2).
pub fn detect_opening_false_start(words: &[WordEvent]) -> Option<OpeningFalseStart> {
    for i in 1..words.len() {
        if words[i].start > OPENING_WINDOW_SECS {
            break;
        }
        let gap = words[i].start - words[i - 1].end;
        if gap < OPENING_GAP_THRESHOLD_SECS {
            continue;
        }
        let prev = words[i - 1].normalized();
        let cur = words[i].normalized();
        let is_restart = prev == cur
            || (prev.len() >= 2 && cur.len() >= 2 && prev.as_bytes()[..2] == cur.as_bytes()[..2]);
        if is_restart {
            return Some(OpeningFalseStart {
                false_end: words[i - 1].end,
                real_start: words[i].start,
                words_cut: words[..i].iter().map(|w| w.text.clone()).collect(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(text: &str, start: f64, end: f64) -> WordEvent {
        WordEvent { text: text.to_string(), start, end, confidence: None }
    }

    #[test]
    fn pure_filler_detected_standalone() {
        let words = vec![w("I", 0.0, 0.2), w("um", 4.80, 4.95), w("think", 5.1, 5.3)];
        let fillers = detect_fillers(&words);
        assert_eq!(fillers.len(), 1);
        assert!(fillers[0].pure_filler);
        assert_eq!(fillers[0].start, 4.80);
    }

    #[test]
    fn multi_token_context_filler_detected() {
        let words = vec![w("you", 1.0, 1.1), w("know", 1.1, 1.3), w("it's", 1.4, 1.5)];
        let fillers = detect_fillers(&words);
        assert_eq!(fillers.len(), 1);
        assert!(!fillers[0].pure_filler);
        assert_eq!(fillers[0].text, "you know");
    }

    #[test]
    fn restart_run_keeps_all_but_last_removable() {
        let words = vec![
            w("I", 0.0, 0.1),
            w("think", 0.1, 0.3),
            w("think", 0.35, 0.55),
            w("think", 0.6, 0.8),
            w("so", 0.85, 1.0),
        ];
        let restarts = detect_restarts(&words);
        assert_eq!(restarts.len(), 1);
        assert_eq!(restarts[0].occurrences.len(), 3);
        assert_eq!(restarts[0].removable().len(), 2);
    }

    #[test]
    fn restart_gap_too_large_is_not_a_run() {
        let words = vec![w("think", 0.0, 0.2), w("think", 2.0, 2.2)];
        assert!(detect_restarts(&words).is_empty());
    }

    #[test]
    fn opening_false_start_on_exact_repeat() {
        let words = vec![w("so", 0.0, 0.3), w("this", 0.3, 1.1), w("so", 1.8, 2.0)];
        let ofs = detect_opening_false_start(&words).unwrap();
        assert_eq!(ofs.false_end, 1.1);
        assert_eq!(ofs.real_start, 1.8);
        assert_eq!(ofs.words_cut, vec!["so".to_string(), "this".to_string()]);
    }

    #[test]
    fn opening_false_start_on_two_char_prefix() {
        let words = vec![w("Thi", 0.0, 0.3), w("This", 0.9, 1.2)];
        assert!(detect_opening_false_start(&words).is_some());
    }

    #[test]
    fn no_opening_false_start_without_gap() {
        let words = vec![w("hello", 0.0, 0.3), w("world", 0.32, 0.6)];
        assert!(detect_opening_false_start(&words).is_none());
    }

    #[test]
    fn opening_false_start_outside_window_ignored() {
        let words = vec![w("so", 0.0, 0.2), w("x", 20.0, 20.5), w("so", 21.0, 21.2)];
        // first word after the 15s window has start > 15 -> loop breaks before considering it
        assert!(detect_opening_false_start(&words).is_none());
    }
}
