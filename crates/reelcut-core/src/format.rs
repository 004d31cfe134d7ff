// crates/reelcut-core/src/format.rs
//
// Platform export format table (C9). Immutable after startup — see
// `crate::preset` for the companion editing-preset table.

use crate::error::ReelcutError;
use serde::{Deserialize, Serialize};

/// Where burned-in captions sit vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionPosition {
    Middle,
    LowerThird,
    Bottom,
}

/// One platform's complete export specification: resolution, safe zones,
/// caption placement, and encode parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormatSpec {
    pub id: &'static str,
    pub width: u32,
    pub height: u32,
    pub max_duration_seconds: u32,
    pub caption_margin_bottom: u32,
    pub caption_margin_sides: u32,
    pub caption_position: CaptionPosition,
    /// Target vertical position for the subject's head, 0.0 (top) to 1.0 (bottom).
    pub subject_head_position: f32,
    pub safe_zone_top: u32,
    pub safe_zone_bottom: u32,
    pub bitrate_mbps: f32,
    pub fps: u32,
    pub codec: &'static str,
    pub audio_bitrate_kbps: u32,
}

impl FormatSpec {
    /// Target width/height ratio.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub const TIKTOK: FormatSpec = FormatSpec {
    id: "tiktok",
    width: 1080,
    height: 1920,
    max_duration_seconds: 180,
    caption_margin_bottom: 367,
    caption_margin_sides: 80,
    caption_position: CaptionPosition::Middle,
    subject_head_position: 0.35,
    safe_zone_top: 100,
    safe_zone_bottom: 400,
    bitrate_mbps: 8.0,
    fps: 30,
    codec: "h264",
    audio_bitrate_kbps: 128,
};

pub const YOUTUBE_SHORTS: FormatSpec = FormatSpec {
    id: "youtube_shorts",
    width: 1080,
    height: 1920,
    max_duration_seconds: 60,
    caption_margin_bottom: 367,
    caption_margin_sides: 80,
    caption_position: CaptionPosition::Middle,
    subject_head_position: 0.35,
    safe_zone_top: 100,
    safe_zone_bottom: 400,
    bitrate_mbps: 8.0,
    fps: 30,
    codec: "h264",
    audio_bitrate_kbps: 128,
};

pub const INSTAGRAM_REELS: FormatSpec = FormatSpec {
    id: "instagram_reels",
    width: 1080,
    height: 1920,
    max_duration_seconds: 90,
    caption_margin_bottom: 350,
    caption_margin_sides: 80,
    caption_position: CaptionPosition::Middle,
    subject_head_position: 0.35,
    safe_zone_top: 100,
    safe_zone_bottom: 380,
    bitrate_mbps: 8.0,
    fps: 30,
    codec: "h264",
    audio_bitrate_kbps: 128,
};

pub const LINKEDIN: FormatSpec = FormatSpec {
    id: "linkedin",
    width: 1080,
    height: 1350,
    max_duration_seconds: 600,
    caption_margin_bottom: 100,
    caption_margin_sides: 60,
    caption_position: CaptionPosition::LowerThird,
    subject_head_position: 0.30,
    safe_zone_top: 60,
    safe_zone_bottom: 120,
    bitrate_mbps: 6.0,
    fps: 30,
    codec: "h264",
    audio_bitrate_kbps: 128,
};

pub const TWITTER: FormatSpec = FormatSpec {
    id: "twitter",
    width: 1920,
    height: 1080,
    max_duration_seconds: 140,
    caption_margin_bottom: 80,
    caption_margin_sides: 100,
    caption_position: CaptionPosition::Bottom,
    subject_head_position: 0.40,
    safe_zone_top: 60,
    safe_zone_bottom: 100,
    bitrate_mbps: 6.0,
    fps: 30,
    codec: "h264",
    audio_bitrate_kbps: 128,
};

pub const SQUARE: FormatSpec = FormatSpec {
    id: "square",
    width: 1080,
    height: 1080,
    max_duration_seconds: 600,
    caption_margin_bottom: 100,
    caption_margin_sides: 60,
    caption_position: CaptionPosition::LowerThird,
    subject_head_position: 0.40,
    safe_zone_top: 60,
    safe_zone_bottom: 120,
    bitrate_mbps: 6.0,
    fps: 30,
    codec: "h264",
    audio_bitrate_kbps: 128,
};

const ALL: &[FormatSpec] = &[TIKTOK, YOUTUBE_SHORTS, INSTAGRAM_REELS, LINKEDIN, TWITTER, SQUARE];

/// Look up a format by its lowercase string identifier.
///
/// Unknown identifiers are a configuration error (`InputInvalid`), not a
/// silent default — per design note in §9.
pub fn get_format(id: &str) -> Result<FormatSpec, ReelcutError> {
    ALL.iter()
        .find(|f| f.id == id)
        .copied()
        .ok_or_else(|| ReelcutError::InputInvalid(format!("unknown format '{id}'")))
}

pub fn all_formats() -> &'static [FormatSpec] {
    ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_resolve() {
        for id in ["tiktok", "youtube_shorts", "instagram_reels", "linkedin", "twitter", "square"] {
            assert!(get_format(id).is_ok(), "expected {id} to resolve");
        }
    }

    #[test]
    fn unknown_format_is_input_invalid() {
        let err = get_format("snapchat").unwrap_err();
        assert_eq!(err.code(), "InputInvalid");
    }

    #[test]
    fn tiktok_matches_spec_table() {
        let f = get_format("tiktok").unwrap();
        assert_eq!(f.resolution(), (1080, 1920));
    }
}
