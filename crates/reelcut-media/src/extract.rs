// crates/reelcut-media/src/extract.rs
//
// PCM extraction (§4.8 step 2). Pipes 16 kHz mono float32 samples out of the
// external media tool into a temp file the job owns — grounded on the same
// ffmpeg-CLI-pipe pattern as the legacy waveform extractor, but writing to
// disk (not stdout) so the job's temp directory, not a channel, owns the
// result.

use std::path::{Path, PathBuf};
use std::process::Command;

use reelcut_core::error::{ReelcutError, Result};

pub const PCM_SAMPLE_RATE: u32 = 16_000;

/// Extract `[start, start+duration)` of `source`'s audio to `dir/clip.pcm`
/// as headerless 16 kHz mono float32 samples, returning the written path.
pub fn extract_clip_pcm(source: &Path, start: f64, duration: f64, dir: &Path) -> Result<PathBuf> {
    let dest = dir.join("clip.pcm");
    let output = Command::new("ffmpeg")
        .args([
            "-y",
            "-ss", &start.to_string(),
            "-i", &source.to_string_lossy(),
            "-t", &duration.to_string(),
            "-vn",
            "-acodec", "pcm_f32le",
            "-ar", &PCM_SAMPLE_RATE.to_string(),
            "-ac", "1",
            "-f", "f32le",
            &dest.to_string_lossy(),
        ])
        .output()
        .map_err(|e| ReelcutError::MediaToolFailed { command: "ffmpeg (extract pcm)".into(), exit_code: None, stderr_tail: e.to_string() })?;

    if !output.status.success() {
        return Err(media_tool_failed("ffmpeg (extract pcm)", &output));
    }
    Ok(dest)
}

/// Read a headerless f32le PCM file back into samples.
pub fn read_pcm(path: &Path) -> Result<Vec<f32>> {
    let bytes = std::fs::read(path).map_err(|e| ReelcutError::DecodeError(e.to_string()))?;
    Ok(bytes.chunks_exact(4).map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])).collect())
}

fn media_tool_failed(command: &str, output: &std::process::Output) -> ReelcutError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let tail: String = stderr.chars().rev().take(1024).collect::<String>().chars().rev().collect();
    ReelcutError::MediaToolFailed {
        command: command.to_string(),
        exit_code: output.status.code(),
        stderr_tail: tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_pcm_parses_f32le_samples() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let samples: [f32; 3] = [0.0, 0.5, -0.25];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        std::fs::write(f.path(), &bytes).unwrap();
        let read_back = read_pcm(f.path()).unwrap();
        assert_eq!(read_back, samples);
    }
}
