// crates/reelcut-core/src/preset.rs
//
// Editing-preset table (C9 companion to `crate::format`). Tunes the VAD
// threshold and silence-handling behaviour of the edit planner per platform
// convention (a podcast tolerates longer pauses than a TikTok cut-down).

use crate::error::ReelcutError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresetConfig {
    pub id: &'static str,
    pub vad_threshold: f32,
    pub min_silence_ms: u32,
    pub max_kept_silence_ms: u32,
    pub speech_padding_ms: u32,
    pub crossfade_ms: u32,
}

impl PresetConfig {
    pub fn min_silence_secs(&self) -> f64 {
        self.min_silence_ms as f64 / 1000.0
    }

    pub fn max_kept_silence_secs(&self) -> f64 {
        self.max_kept_silence_ms as f64 / 1000.0
    }

    pub fn speech_padding_secs(&self) -> f64 {
        self.speech_padding_ms as f64 / 1000.0
    }

    pub fn crossfade_secs(&self) -> f64 {
        self.crossfade_ms as f64 / 1000.0
    }
}

pub const LINKEDIN: PresetConfig = PresetConfig {
    id: "linkedin",
    vad_threshold: 0.5,
    min_silence_ms: 500,
    max_kept_silence_ms: 700,
    speech_padding_ms: 150,
    crossfade_ms: 10,
};

pub const YOUTUBE_SHORTS: PresetConfig = PresetConfig {
    id: "youtube_shorts",
    vad_threshold: 0.5,
    min_silence_ms: 300,
    max_kept_silence_ms: 200,
    speech_padding_ms: 100,
    crossfade_ms: 10,
};

pub const TIKTOK: PresetConfig = PresetConfig {
    id: "tiktok",
    vad_threshold: 0.5,
    min_silence_ms: 200,
    max_kept_silence_ms: 150,
    speech_padding_ms: 80,
    crossfade_ms: 10,
};

pub const PODCAST: PresetConfig = PresetConfig {
    id: "podcast",
    vad_threshold: 0.5,
    min_silence_ms: 800,
    max_kept_silence_ms: 1000,
    speech_padding_ms: 200,
    crossfade_ms: 10,
};

const ALL: &[PresetConfig] = &[LINKEDIN, YOUTUBE_SHORTS, TIKTOK, PODCAST];

/// Look up a preset by its lowercase string identifier.
///
/// Unlike `format::get_format`, an unknown preset is also `InputInvalid` —
/// the two tables share the same "unknown key is a config error" policy.
pub fn get_preset(id: &str) -> Result<PresetConfig, ReelcutError> {
    ALL.iter()
        .find(|p| p.id == id)
        .copied()
        .ok_or_else(|| ReelcutError::InputInvalid(format!("unknown preset '{id}'")))
}

pub fn all_presets() -> &'static [PresetConfig] {
    ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_presets_resolve() {
        for id in ["linkedin", "youtube_shorts", "tiktok", "podcast"] {
            assert!(get_preset(id).is_ok());
        }
    }

    #[test]
    fn unknown_preset_is_input_invalid() {
        assert_eq!(get_preset("bluesky").unwrap_err().code(), "InputInvalid");
    }

    #[test]
    fn podcast_tolerates_longer_silence_than_tiktok() {
        assert!(PODCAST.max_kept_silence_ms > TIKTOK.max_kept_silence_ms);
    }
}
