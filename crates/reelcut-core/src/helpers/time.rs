// crates/reelcut-core/src/helpers/time.rs
//
// Shared time-formatting utilities.

/// Format a duration in seconds as a compact human-readable string.
///
/// Used in CLI summaries and log lines where frame-level precision is
/// unnecessary.
///
/// | Range         | Format       | Example   |
/// |---------------|--------------|-----------|
/// | ≥ 3600 s      | `H:MM:SS`    | `1:04:35` |
/// | ≥ 60 s        | `M:SS`       | `3:07`    |
/// | < 60 s        | `S.Xs`       | `4.2s`    |
///
/// ```
/// use reelcut_core::format_duration;
/// assert_eq!(format_duration(4.2),    "4.2s");
/// assert_eq!(format_duration(187.0),  "3:07");
/// assert_eq!(format_duration(3875.0), "1:04:35");
/// ```
pub fn format_duration(secs: f64) -> String {
    if secs >= 3600.0 {
        format!(
            "{}:{:02}:{:02}",
            secs as u64 / 3600,
            (secs as u64 % 3600) / 60,
            secs as u64 % 60,
        )
    } else if secs >= 60.0 {
        format!("{}:{:02}", secs as u64 / 60, secs as u64 % 60)
    } else {
        format!("{secs:.1}s")
    }
}

/// Format a timestamp in seconds as `H:MM:SS.cc` (centiseconds) — the
/// timestamp format advanced subtitle scripts use for dialogue events.
///
/// ```
/// use reelcut_core::format_ass_timestamp;
/// assert_eq!(format_ass_timestamp(0.0),    "0:00:00.00");
/// assert_eq!(format_ass_timestamp(65.125), "0:01:05.12");
/// ```
pub fn format_ass_timestamp(secs: f64) -> String {
    let secs = secs.max(0.0);
    let total_cs = (secs * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_s = total_cs / 100;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;
    format!("{h}:{m:02}:{s:02}.{cs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_tiers() {
        assert_eq!(format_duration(0.0), "0.0s");
        assert_eq!(format_duration(59.9), "59.9s");
        assert_eq!(format_duration(60.0), "1:00");
        assert_eq!(format_duration(3600.0), "1:00:00");
    }

    #[test]
    fn format_ass_timestamp_rounds_centiseconds() {
        assert_eq!(format_ass_timestamp(1.004), "0:00:01.00");
        assert_eq!(format_ass_timestamp(3661.999), "1:01:02.00");
    }
}
