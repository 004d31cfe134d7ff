// crates/reelcut-core/src/model.rs
//
// Core data model (§3). Times are seconds, f64, relative to the clip's
// requested start unless documented otherwise. Pixel dimensions are
// non-negative integers; normalized positions are in [0,1].

use serde::{Deserialize, Serialize};

/// A detected span of speech. `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechSpan {
    pub start: f64,
    pub end: f64,
}

impl SpeechSpan {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A detected span of silence. Disjoint from every other silence span;
/// together with speech spans covers exactly `[0, clipDuration]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceSpan {
    pub start: f64,
    pub end: f64,
}

impl SilenceSpan {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Output of the voice-activity analyzer (C1): speech and silence spans that
/// jointly cover `[0, duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VadResult {
    pub duration: f64,
    pub speech: Vec<SpeechSpan>,
    pub silence: Vec<SilenceSpan>,
}

/// Result of the duration estimator (C10, §4.9): what an edit would produce,
/// computed symbolically from cached VAD spans without rendering anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationEstimate {
    pub original_duration: f64,
    pub estimated_duration: f64,
    pub time_saved: f64,
    pub percent_reduction: f64,
    pub speech_time: f64,
    pub silence_time: f64,
    pub silences_in_range: u32,
}

/// A word with its timing, as returned by the external transcriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEvent {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub confidence: Option<f32>,
}

impl WordEvent {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Lowercased, trailing-punctuation-stripped form used for filler and
    /// restart matching.
    pub fn normalized(&self) -> String {
        self.text
            .trim_end_matches(|c: char| c.is_ascii_punctuation())
            .to_lowercase()
    }
}

/// A detected filler word or phrase (§4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filler {
    pub text: String,
    pub start: f64,
    pub end: f64,
    /// True for universally-removable sounds (um, uh, ...); false for
    /// context-dependent fillers (like, so, well, ...).
    pub pure_filler: bool,
}

/// A single occurrence within a detected restart run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub start: f64,
    pub end: f64,
}

/// A run of a repeated word or phrase; all but the last occurrence is the
/// removable region (§4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartSpan {
    pub repeated_text: String,
    pub occurrences: Vec<Occurrence>,
    pub first_start: f64,
    pub last_end: f64,
}

impl RestartSpan {
    /// All occurrences except the last — the region a planner may remove.
    pub fn removable(&self) -> &[Occurrence] {
        &self.occurrences[..self.occurrences.len().saturating_sub(1)]
    }
}

/// A detected false start at the very beginning of a clip (§4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningFalseStart {
    pub false_end: f64,
    pub real_start: f64,
    pub words_cut: Vec<String>,
}

/// Combined output of the transcript analyzer (C2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptAnalysis {
    pub fillers: Vec<Filler>,
    pub restarts: Vec<RestartSpan>,
    pub opening_false_start: Option<OpeningFalseStart>,
}

/// What an edit decision does with its source interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditAction {
    Keep,
    Trim,
    Remove,
}

/// One ordered record in an edit plan (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditDecision {
    pub start: f64,
    pub end: f64,
    pub action: EditAction,
    pub reason: String,
}

impl EditDecision {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_kept(&self) -> bool {
        matches!(self.action, EditAction::Keep | EditAction::Trim)
    }
}

/// A transcript item the planner declined to remove because it wasn't
/// sufficiently backed by a detected silence (§4.3 step 3, P9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub kind: &'static str,
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// A transcript item the planner did remove, for the driver-visible summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedItem {
    pub kind: &'static str,
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// The full output of the edit planner (C3): an ordered, validated list of
/// decisions plus summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    pub decisions: Vec<EditDecision>,
    pub source_duration: f64,
    pub edited_duration: f64,
    pub time_saved: f64,
    pub reduction_percent: f64,
    /// Milliseconds of fabricated silence prepended ahead of the first kept
    /// decision (opening-false-start lead-in, §4.3 step 4). Zero if none.
    pub lead_in_padding_ms: u32,
    pub skipped_items: Vec<SkippedItem>,
    pub removed_items: Vec<RemovedItem>,
}

impl EditPlan {
    pub fn kept_decisions(&self) -> impl Iterator<Item = &EditDecision> {
        self.decisions.iter().filter(|d| d.is_kept())
    }
}

/// A video-timeline counterpart to an `EditDecision`, carrying frame numbers
/// once frame-snapping has been applied (C5, §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEditSegment {
    pub start: f64,
    pub end: f64,
    pub start_frame: f64,
    pub end_frame: f64,
    pub action: EditAction,
    pub reason: String,
}

impl VideoEditSegment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Frame-snapping policy for the video synchronizer (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// `startFrame=start*fps`, `endFrame=end*fps` as unrounded float seconds.
    /// Used when audio is pre-rendered and re-muxed (default, satisfies I3).
    Exact,
    /// `startFrame=floor(start*fps)`, `endFrame=ceil(end*fps)`, with
    /// neighbours merged when the gap is ≤2 frames. Used when the video
    /// keeps its native audio track.
    Snap,
}

/// An ordered list of `VideoEditSegment`s suitable for a trim+concat filter
/// graph (C5 output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEditPlan {
    pub segments: Vec<VideoEditSegment>,
    pub mode: SyncMode,
    pub fps: f64,
}

/// Normalized subject position, as returned by the external vision service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectPosition {
    pub x: f32,
    pub y: f32,
    pub head_y: f32,
    pub confidence: f32,
}

impl SubjectPosition {
    /// Centered default used when no subject is supplied (§4.6).
    pub fn default_center() -> Self {
        SubjectPosition { x: 0.5, y: 0.45, head_y: 0.30, confidence: 0.5 }
    }
}

/// Pixel-space crop rectangle plus the scale applied to reach it (C6 output).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
}

/// Severity of a crop validation issue (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropIssue {
    pub code: &'static str,
    pub severity: IssueSeverity,
}

/// Confidence band derived from `CropResult::confidence_score` (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
    Failed,
}

/// Full output of the crop calculator (C6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropResult {
    pub crop: CropRegion,
    pub band: ConfidenceBand,
    pub confidence_score: f32,
    pub issues: Vec<CropIssue>,
    pub auto_approve: bool,
}

/// How a karaoke word highlights as it's spoken (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightMode {
    Color,
    Background,
    Scale,
    Glow,
    None,
}

/// Platform-tunable caption appearance (§4.7). Not enumerated by the spec;
/// fields reflect the advanced-subtitle style block this feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionStyle {
    pub font_family: String,
    pub font_size: u32,
    pub bold: bool,
    pub primary_color: String,
    pub highlight_color: String,
    pub outline_size: u32,
    pub shadow_size: u32,
    /// Numeric pad convention, 1-9 (bottom-left=1 ... top-right=9).
    pub alignment: u8,
    pub margin_l: u32,
    pub margin_r: u32,
    pub margin_v: u32,
    pub highlight_mode: HighlightMode,
    pub fade_in_ms: u32,
    pub fade_out_ms: u32,
    pub words_per_line: usize,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        CaptionStyle {
            font_family: "Arial".to_string(),
            font_size: 72,
            bold: true,
            primary_color: "&H00FFFFFF".to_string(),
            highlight_color: "&H0000D7FF".to_string(),
            outline_size: 4,
            shadow_size: 0,
            alignment: 5,
            margin_l: 40,
            margin_r: 40,
            margin_v: 100,
            highlight_mode: HighlightMode::Color,
            fade_in_ms: 80,
            fade_out_ms: 80,
            words_per_line: 4,
        }
    }
}

/// One word positioned in output time, ready for karaoke chunking (C7).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionWord {
    pub text: String,
    pub output_start: f64,
    pub output_end: f64,
}

impl CaptionWord {
    pub fn duration(&self) -> f64 {
        self.output_end - self.output_start
    }
}

/// One karaoke subtitle event: a group of words sharing one dialogue line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionChunk {
    pub words: Vec<CaptionWord>,
}

impl CaptionChunk {
    pub fn start(&self) -> f64 {
        self.words.first().map(|w| w.output_start).unwrap_or(0.0)
    }

    pub fn end(&self) -> f64 {
        self.words.last().map(|w| w.output_end).unwrap_or(0.0)
    }
}

/// Full caption timeline produced by C7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionScript {
    pub chunks: Vec<CaptionChunk>,
    pub style: CaptionStyle,
}
