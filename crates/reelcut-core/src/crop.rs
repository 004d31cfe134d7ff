// crates/reelcut-core/src/crop.rs
//
// Crop calculator (C6, §4.6). Pure geometry: source dimensions + target
// format + subject position -> pixel crop region with a confidence score.

use crate::format::FormatSpec;
use crate::model::{ConfidenceBand, CropIssue, CropRegion, CropResult, IssueSeverity, SubjectPosition};

const TOP_MARGIN_WARNING: f32 = 0.05;
const SIDE_MARGIN_WARNING: f32 = 0.10;
const SUBJECT_TOO_LOW_MARGIN_PX: f64 = 50.0;
const CENTERED_X_LO: f32 = 0.35;
const CENTERED_X_HI: f32 = 0.65;
const HEAD_IN_FRAME_MIN: f32 = 0.1;
const DETECTION_FAILED_THRESHOLD: f32 = 0.3;

pub fn calculate(
    source_width: u32,
    source_height: u32,
    format: &FormatSpec,
    subject: Option<SubjectPosition>,
) -> CropResult {
    let no_subject_supplied = subject.is_none();
    let subject = subject.unwrap_or_else(SubjectPosition::default_center);
    let source_aspect = source_width as f64 / source_height as f64;
    let target_aspect = format.aspect();

    let (crop, subject_px_x, subject_px_y) = if source_aspect > target_aspect {
        height_scaled_crop(source_width, source_height, format, &subject)
    } else {
        width_scaled_crop(source_width, source_height, format, &subject)
    };

    let issues = validate(&crop, format, subject_px_x, subject_px_y);

    // No subject supplied is a fixed fallback, not a scored detection (§4.6).
    let (band, confidence_score) = if no_subject_supplied {
        (ConfidenceBand::Medium, subject.confidence)
    } else {
        score(subject.confidence, &issues, subject.x, subject.head_y)
    };
    let auto_approve = band == ConfidenceBand::High && !issues.iter().any(|i| i.severity == IssueSeverity::Error);

    CropResult { crop, band, confidence_score, issues, auto_approve }
}

/// Source is wider than target: scale by height, crop the sides, center on
/// the subject's horizontal pixel position.
fn height_scaled_crop(
    source_width: u32,
    source_height: u32,
    format: &FormatSpec,
    subject: &SubjectPosition,
) -> (CropRegion, f64, f64) {
    let scale = format.height as f64 / source_height as f64;
    let scaled_width = (source_width as f64 * scale) as u32;
    let scaled_height = format.height;

    let subject_px_x = subject.x as f64 * scaled_width as f64;
    let crop_x_f = subject_px_x - format.width as f64 / 2.0;
    let crop_x = crop_x_f.clamp(0.0, (scaled_width.saturating_sub(format.width)) as f64) as u32;

    let crop = CropRegion {
        x: crop_x,
        y: 0,
        width: format.width,
        height: format.height,
        scale,
        scaled_width,
        scaled_height,
    };
    (crop, subject_px_x, subject.y as f64 * scaled_height as f64)
}

/// Source is taller than (or equal to) target: scale by width, crop
/// top/bottom, position vertically so the subject's head lands on
/// `format.subject_head_position`.
fn width_scaled_crop(
    source_width: u32,
    source_height: u32,
    format: &FormatSpec,
    subject: &SubjectPosition,
) -> (CropRegion, f64, f64) {
    let scale = format.width as f64 / source_width as f64;
    let scaled_width = format.width;
    let scaled_height = (source_height as f64 * scale) as u32;

    let target_head_y = format.subject_head_position as f64 * format.height as f64;
    let subject_px_y = subject.head_y as f64 * scaled_height as f64;
    let crop_y_f = subject_px_y - target_head_y;
    let crop_y = crop_y_f.clamp(0.0, (scaled_height.saturating_sub(format.height)) as f64) as u32;

    let crop = CropRegion {
        x: 0,
        y: crop_y,
        width: format.width,
        height: format.height,
        scale,
        scaled_width,
        scaled_height,
    };
    (crop, subject.x as f64 * scaled_width as f64, subject_px_y)
}

fn validate(crop: &CropRegion, format: &FormatSpec, subject_px_x: f64, subject_px_y: f64) -> Vec<CropIssue> {
    let mut issues = Vec::new();
    let local_x = subject_px_x - crop.x as f64;
    let local_y = subject_px_y - crop.y as f64;

    if local_x < 0.0 || local_x > crop.width as f64 {
        issues.push(CropIssue { code: "subject_outside_crop_x", severity: IssueSeverity::Error });
    }
    if local_y < 0.0 || local_y > crop.height as f64 {
        issues.push(CropIssue { code: "subject_outside_crop_y", severity: IssueSeverity::Error });
    }

    let top_margin_frac = local_y / crop.height as f64;
    if top_margin_frac >= 0.0 && top_margin_frac < TOP_MARGIN_WARNING as f64 {
        issues.push(CropIssue { code: "head_too_high", severity: IssueSeverity::Warning });
    }

    let too_low_y = crop.height as f64 - format.caption_margin_bottom as f64 - SUBJECT_TOO_LOW_MARGIN_PX;
    if local_y > too_low_y {
        issues.push(CropIssue { code: "subject_too_low", severity: IssueSeverity::Warning });
    }

    let left_margin_frac = local_x / crop.width as f64;
    let right_margin_frac = 1.0 - left_margin_frac;
    if left_margin_frac >= 0.0 && left_margin_frac < SIDE_MARGIN_WARNING as f64 {
        issues.push(CropIssue { code: "subject_near_left", severity: IssueSeverity::Warning });
    }
    if right_margin_frac >= 0.0 && right_margin_frac < SIDE_MARGIN_WARNING as f64 {
        issues.push(CropIssue { code: "subject_near_right", severity: IssueSeverity::Warning });
    }

    issues
}

fn score(
    base_confidence: f32,
    issues: &[CropIssue],
    subject_x: f32,
    head_y: f32,
) -> (ConfidenceBand, f32) {
    if base_confidence < DETECTION_FAILED_THRESHOLD {
        return (ConfidenceBand::Failed, 0.0);
    }

    let mut score = base_confidence;
    for issue in issues {
        score *= match issue.severity {
            IssueSeverity::Error => 0.5,
            IssueSeverity::Warning => 0.9,
        };
    }
    if subject_x >= CENTERED_X_LO && subject_x <= CENTERED_X_HI {
        score *= 1.05;
    }
    if head_y >= HEAD_IN_FRAME_MIN {
        score *= 1.03;
    }
    score = score.clamp(0.0, 1.0);

    let band = if score >= 0.85 {
        ConfidenceBand::High
    } else if score >= 0.70 {
        ConfidenceBand::Medium
    } else {
        ConfidenceBand::Low
    };
    (band, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;

    #[test]
    fn vertical_crop_centered_subject_auto_approves() {
        let subject = SubjectPosition { x: 0.50, y: 0.45, head_y: 0.30, confidence: 1.0 };
        let result = calculate(1920, 1080, &format::TIKTOK, Some(subject));
        assert_eq!(result.crop.width, 1080);
        assert_eq!(result.crop.height, 1920);
        assert!((result.crop.scale - 1.778).abs() < 0.01);
        assert!(result.auto_approve);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn subject_off_frame_flags_near_right() {
        // headY omitted in the scenario this mirrors -> below the in-frame
        // bonus threshold, so confidence is exactly detectionConfidence*0.9.
        let subject = SubjectPosition { x: 0.98, y: 0.45, head_y: 0.0, confidence: 1.0 };
        let result = calculate(1920, 1080, &format::LINKEDIN, Some(subject));
        assert!(result.issues.iter().any(|i| i.code == "subject_near_right"));
        assert_eq!(result.band, ConfidenceBand::Medium);
        assert!(!result.auto_approve);
        assert!((result.confidence_score - 0.9).abs() < 1e-4);
    }

    #[test]
    fn crop_size_always_matches_format_exactly() {
        for f in format::all_formats() {
            let result = calculate(1920, 1080, f, None);
            assert_eq!(result.crop.width, f.width);
            assert_eq!(result.crop.height, f.height);
        }
    }

    #[test]
    fn no_subject_defaults_to_medium_band() {
        let result = calculate(1920, 1080, &format::TIKTOK, None);
        assert_eq!(result.band, ConfidenceBand::Medium);
    }

    #[test]
    fn low_detection_confidence_is_failed_band() {
        let subject = SubjectPosition { x: 0.5, y: 0.5, head_y: 0.3, confidence: 0.1 };
        let result = calculate(1920, 1080, &format::TIKTOK, Some(subject));
        assert_eq!(result.band, ConfidenceBand::Failed);
    }
}
