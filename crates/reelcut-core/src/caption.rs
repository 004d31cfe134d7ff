// crates/reelcut-core/src/caption.rs
//
// Caption remapper (C7, §4.7). Walks kept decisions in order, re-timing
// each word into output time, then groups words into karaoke chunks.

use crate::model::{CaptionChunk, CaptionScript, CaptionStyle, CaptionWord, EditPlan, WordEvent};

const MAX_CHUNK_DURATION_SECS: f64 = 3.0;
const MAX_GAP_SECS: f64 = 0.3;

/// Remap `words` (already clipped to the clip range) into output time
/// following `plan`'s kept decisions, then chunk them per `style`.
pub fn remap(words: &[WordEvent], plan: &EditPlan, style: CaptionStyle) -> CaptionScript {
    let mut output_time = plan.lead_in_padding_ms as f64 / 1000.0;
    let mut out_words = Vec::new();

    for segment in plan.kept_decisions() {
        let duration = segment.duration();
        for word in words {
            if word.end <= segment.start || word.start >= segment.end {
                continue;
            }
            let output_start = output_time + (word.start - segment.start).max(0.0);
            let output_end = output_time + (word.end - segment.start).min(duration);
            out_words.push(CaptionWord { text: word.text.clone(), output_start, output_end });
        }
        output_time += duration;
    }

    let chunks = chunk_words(out_words, &style);
    CaptionScript { chunks, style }
}

fn chunk_words(words: Vec<CaptionWord>, style: &CaptionStyle) -> Vec<CaptionChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<CaptionWord> = Vec::new();

    for word in words {
        let should_break = match current.first() {
            Some(first) => {
                let last = current.last().unwrap();
                let gap = word.output_start - last.output_end;
                let prospective_duration = word.output_end - first.output_start;
                current.len() >= style.words_per_line
                    || prospective_duration > MAX_CHUNK_DURATION_SECS
                    || gap > MAX_GAP_SECS
            }
            None => false,
        };
        if should_break {
            chunks.push(CaptionChunk { words: std::mem::take(&mut current) });
        }
        current.push(word);
    }
    if !current.is_empty() {
        chunks.push(CaptionChunk { words: current });
    }
    chunks
}
