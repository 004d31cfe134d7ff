// crates/reelcut-media/src/subtitle.rs
//
// Writes a `CaptionScript` (C7 output) to an advanced-subtitle script file
// on disk: a header (script info, play resolution, one style) followed by
// dialogue events carrying per-word karaoke-duration markers (§4.7, §6).

use std::path::Path;

use reelcut_core::error::{ReelcutError, Result};
use reelcut_core::format::{CaptionPosition, FormatSpec};
use reelcut_core::format_ass_timestamp;
use reelcut_core::model::{CaptionChunk, CaptionScript, CaptionStyle, HighlightMode};

pub fn write(script: &CaptionScript, format: &FormatSpec, path: &Path) -> Result<()> {
    let style = placed_style(&script.style, format);
    let mut out = String::new();
    write_header(&mut out, format, &style);
    for chunk in &script.chunks {
        write_dialogue_line(&mut out, chunk, &style);
    }
    std::fs::write(path, out).map_err(|e| ReelcutError::MediaToolFailed {
        command: "write captions.ass".into(),
        exit_code: None,
        stderr_tail: e.to_string(),
    })
}

/// Overrides `style`'s placement fields with the per-platform values §6 fixes
/// as `FormatSpec.caption_position`/`caption_margin_bottom`/`caption_margin_sides`.
/// Alignment uses the numeric pad convention: 5 for a centered style (Middle),
/// 2 (bottom-center) for LowerThird and Bottom, which differ only in margin.
fn placed_style(style: &CaptionStyle, format: &FormatSpec) -> CaptionStyle {
    let mut style = style.clone();
    style.alignment = match format.caption_position {
        CaptionPosition::Middle => 5,
        CaptionPosition::LowerThird | CaptionPosition::Bottom => 2,
    };
    style.margin_v = format.caption_margin_bottom;
    style.margin_l = format.caption_margin_sides;
    style.margin_r = format.caption_margin_sides;
    style
}

fn write_header(out: &mut String, format: &FormatSpec, style: &CaptionStyle) {
    out.push_str("[Script Info]\n");
    out.push_str("ScriptType: v4.00+\n");
    out.push_str(&format!("PlayResX: {}\n", format.width));
    out.push_str(&format!("PlayResY: {}\n", format.height));
    out.push_str("WrapStyle: 0\n\n");

    out.push_str("[V4+ Styles]\n");
    out.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, \
         Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, \
         Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    out.push_str(&format!(
        "Style: Default,{},{},{},&H00000000,&H00000000,&H00000000,{},0,0,0,100,100,0,0,1,{},{},{},{},{},{},1\n\n",
        style.font_family,
        style.font_size,
        style.primary_color,
        if style.bold { -1 } else { 0 },
        style.outline_size,
        style.shadow_size,
        style.alignment,
        style.margin_l,
        style.margin_r,
        style.margin_v,
    ));

    out.push_str("[Events]\n");
    out.push_str("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
}

fn write_dialogue_line(out: &mut String, chunk: &CaptionChunk, style: &CaptionStyle) {
    let start = format_ass_timestamp(chunk.start());
    let end = format_ass_timestamp(chunk.end());
    let text = karaoke_text(chunk, &style.highlight_mode, style.fade_in_ms, style.fade_out_ms);
    out.push_str(&format!("Dialogue: 0,{start},{end},Default,,0,0,0,,{text}\n"));
}

/// Per-word `\k` karaoke tags carrying each word's duration in centiseconds,
/// preceded by a fade override when the style requests one.
fn karaoke_text(chunk: &CaptionChunk, mode: &HighlightMode, fade_in_ms: u32, fade_out_ms: u32) -> String {
    let mut text = String::new();
    if fade_in_ms > 0 || fade_out_ms > 0 {
        text.push_str(&format!("{{\\fad({fade_in_ms},{fade_out_ms})}}"));
    }
    for word in &chunk.words {
        let centis = (word.duration() * 100.0).round().max(0.0) as u64;
        let tag = match mode {
            HighlightMode::None => String::new(),
            _ => format!("\\k{centis}"),
        };
        text.push_str(&format!("{{{tag}}}{} ", escape_text(&word.text)));
    }
    text.trim_end().to_string()
}

fn escape_text(s: &str) -> String {
    s.replace('{', "(").replace('}', ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_core::model::CaptionWord;

    fn script() -> CaptionScript {
        CaptionScript {
            chunks: vec![CaptionChunk {
                words: vec![
                    CaptionWord { text: "hello".into(), output_start: 0.0, output_end: 0.4 },
                    CaptionWord { text: "world".into(), output_start: 0.4, output_end: 0.9 },
                ],
            }],
            style: reelcut_core::model::CaptionStyle::default(),
        }
    }

    #[test]
    fn header_carries_format_resolution() {
        let mut out = String::new();
        let style = placed_style(&script().style, &reelcut_core::format::TIKTOK);
        write_header(&mut out, &reelcut_core::format::TIKTOK, &style);
        assert!(out.contains("PlayResX: 1080"));
        assert!(out.contains("PlayResY: 1920"));
    }

    #[test]
    fn placement_follows_format_caption_position() {
        let middle = placed_style(&CaptionStyle::default(), &reelcut_core::format::TIKTOK);
        assert_eq!(middle.alignment, 5);
        assert_eq!(middle.margin_v, reelcut_core::format::TIKTOK.caption_margin_bottom);

        let lower_third = placed_style(&CaptionStyle::default(), &reelcut_core::format::LINKEDIN);
        assert_eq!(lower_third.alignment, 2);
        assert_eq!(lower_third.margin_v, reelcut_core::format::LINKEDIN.caption_margin_bottom);
        assert_eq!(lower_third.margin_l, reelcut_core::format::LINKEDIN.caption_margin_sides);
    }

    #[test]
    fn karaoke_tags_carry_word_duration_in_centiseconds() {
        let text = karaoke_text(&script().chunks[0], &HighlightMode::Color, 0, 0);
        assert!(text.contains("\\k40"));
        assert!(text.contains("\\k50"));
    }

    #[test]
    fn highlight_mode_none_emits_no_karaoke_tags() {
        let text = karaoke_text(&script().chunks[0], &HighlightMode::None, 0, 0);
        assert!(!text.contains("\\k"));
    }

    #[test]
    fn fade_style_prepends_fad_override() {
        let text = karaoke_text(&script().chunks[0], &HighlightMode::Color, 80, 120);
        assert!(text.starts_with("{\\fad(80,120)}"));
    }

    #[test]
    fn curly_braces_in_words_are_escaped() {
        assert_eq!(escape_text("a{b}c"), "a(b)c");
    }
}
