// crates/reelcut-core/src/video_sync.rs
//
// Video synchronizer (C5, §4.5). Turns an `EditPlan`'s kept decisions into
// frame-aligned `VideoEditSegment`s for a trim+concat filter graph.

use crate::error::{ReelcutError, Result};
use crate::model::{EditPlan, SyncMode, VideoEditPlan, VideoEditSegment};

/// Merge neighbouring snapped segments whose gap is at most this many frames.
const SNAP_MERGE_GAP_FRAMES: f64 = 2.0;

/// Build a `VideoEditPlan` from `plan`'s kept decisions.
///
/// `fps` must be the source clip's frame rate; segment boundaries are
/// relative to the clip, not the source file (the orchestrator adds
/// `clipStart` before emission, §4.5 "Addressing").
pub fn sync(plan: &EditPlan, fps: f64, mode: SyncMode) -> Result<VideoEditPlan> {
    let mut segments: Vec<VideoEditSegment> = plan
        .kept_decisions()
        .map(|d| match mode {
            SyncMode::Exact => VideoEditSegment {
                start: d.start,
                end: d.end,
                start_frame: d.start * fps,
                end_frame: d.end * fps,
                action: d.action,
                reason: d.reason.clone(),
            },
            SyncMode::Snap => VideoEditSegment {
                start: d.start,
                end: d.end,
                start_frame: (d.start * fps).floor(),
                end_frame: (d.end * fps).ceil(),
                action: d.action,
                reason: d.reason.clone(),
            },
        })
        .filter(|s| s.end_frame > s.start_frame)
        .collect();

    if mode == SyncMode::Snap {
        segments = merge_snapped(segments, fps);
    }

    if segments.is_empty() {
        return Err(ReelcutError::EmptyPlan);
    }

    Ok(VideoEditPlan { segments, mode, fps })
}

/// Merge neighbours whose frame gap is ≤2 frames, re-deriving `start`/`end`
/// seconds from the merged frame range.
fn merge_snapped(segments: Vec<VideoEditSegment>, fps: f64) -> Vec<VideoEditSegment> {
    let mut out: Vec<VideoEditSegment> = Vec::with_capacity(segments.len());
    for seg in segments {
        if let Some(prev) = out.last_mut() {
            if seg.start_frame - prev.end_frame <= SNAP_MERGE_GAP_FRAMES {
                prev.end_frame = seg.end_frame;
                prev.end = seg.end_frame / fps;
                continue;
            }
        }
        out.push(seg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EditAction, EditDecision};

    fn plan_with(decisions: Vec<EditDecision>) -> EditPlan {
        EditPlan {
            decisions,
            source_duration: 10.0,
            edited_duration: 0.0,
            time_saved: 0.0,
            reduction_percent: 0.0,
            lead_in_padding_ms: 0,
            skipped_items: Vec::new(),
            removed_items: Vec::new(),
        }
    }

    fn d(start: f64, end: f64, action: EditAction) -> EditDecision {
        EditDecision { start, end, action, reason: "x".into() }
    }

    /// Scenario 1: decisions [keep 0.0-2.5, trim 2.5-3.0, keep 3.0-5.5,
    /// (implicit remove 5.5-7.0), keep 7.0-10.0] at 30fps exact mode.
    #[test]
    fn scenario_one_exact_mode_three_kept_intervals() {
        let plan = plan_with(vec![
            d(0.0, 2.5, EditAction::Keep),
            d(2.5, 3.0, EditAction::Trim),
            d(3.0, 5.5, EditAction::Keep),
            d(7.0, 10.0, EditAction::Keep),
        ]);
        let result = sync(&plan, 30.0, SyncMode::Exact).unwrap();
        assert_eq!(result.segments.len(), 3);
        assert_eq!(result.segments[0].start_frame, 0.0);
        assert_eq!(result.segments[0].end_frame, 75.0);
        assert_eq!(result.segments[2].start_frame, 210.0);
        assert_eq!(result.segments[2].end_frame, 300.0);
        let total: f64 = result.segments.iter().map(|s| s.duration()).sum();
        assert!((total - 8.0).abs() < 1e-9);
    }

    #[test]
    fn empty_plan_after_filtering_is_error() {
        let plan = plan_with(vec![d(1.0, 1.0, EditAction::Keep)]);
        let err = sync(&plan, 30.0, SyncMode::Exact).unwrap_err();
        assert_eq!(err.code(), "EmptyPlan");
    }

    #[test]
    fn snap_mode_merges_close_neighbours() {
        // 30fps: gap of 1 frame (1/30s) after snapping should merge.
        let plan = plan_with(vec![
            d(0.0, 1.0, EditAction::Keep),
            d(1.0333, 2.0, EditAction::Keep),
        ]);
        let result = sync(&plan, 30.0, SyncMode::Snap).unwrap();
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].start_frame, 0.0);
    }

    #[test]
    fn snap_mode_keeps_distant_neighbours_separate() {
        let plan = plan_with(vec![
            d(0.0, 1.0, EditAction::Keep),
            d(2.0, 3.0, EditAction::Keep),
        ]);
        let result = sync(&plan, 30.0, SyncMode::Snap).unwrap();
        assert_eq!(result.segments.len(), 2);
    }

    #[test]
    fn no_segment_ever_has_end_le_start() {
        let plan = plan_with(vec![d(0.0, 5.0, EditAction::Keep)]);
        let result = sync(&plan, 30.0, SyncMode::Exact).unwrap();
        for seg in &result.segments {
            assert!(seg.end_frame > seg.start_frame);
        }
    }
}
