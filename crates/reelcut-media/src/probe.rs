// crates/reelcut-media/src/probe.rs
//
// In-process FFmpeg probing: duration and video dimensions. No thumbnail
// extraction and no channel messaging — this crate's jobs are driven
// synchronously per-job (§5), so probing returns a plain `Result`.

use std::path::Path;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

use reelcut_core::error::{ReelcutError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeInfo {
    pub duration: f64,
    /// `None` for audio-only sources.
    pub video_size: Option<(u32, u32)>,
}

pub fn probe(path: &Path) -> Result<ProbeInfo> {
    let ctx = input(path).map_err(|e| ReelcutError::DecodeError(e.to_string()))?;

    let duration = {
        let d = ctx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
        if d > 0.0 {
            d
        } else if let Some(stream) = ctx.streams().best(Type::Video).or_else(|| ctx.streams().best(Type::Audio)) {
            let tb = stream.time_base();
            stream.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64
        } else {
            0.0
        }
    };
    if duration <= 0.0 {
        return Err(ReelcutError::DecodeError("duration unknown".into()));
    }

    let video_size = ctx.streams().best(Type::Video).and_then(|stream| {
        let (w, h) = unsafe {
            let p = stream.parameters().as_ptr();
            ((*p).width as u32, (*p).height as u32)
        };
        (w > 0 && h > 0).then_some((w, h))
    });

    Ok(ProbeInfo { duration, video_size })
}
