//! Gesture classification from hand landmark distances.
//!
//! Three independent booleans per frame: pinch (thumb tip to index tip),
//! grab (mean wrist-to-fingertip distance), open hand (same mean, far side,
//! gated on not-grab and not-pinch so the flags stay mutually exclusive).

use super::landmarks::{landmark_distance, HandFrame, FINGERTIPS, INDEX_TIP, THUMB_TIP, WRIST};
use crate::config::GestureThresholds;

/// Discrete gesture flags for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureState {
    pub pinched: bool,
    pub grabbing: bool,
    pub open_hand: bool,
}

impl GestureState {
    pub const NONE: GestureState = GestureState {
        pinched: false,
        grabbing: false,
        open_hand: false,
    };
}

/// Classify one frame. No hand means no gestures.
pub fn classify(frame: &HandFrame, thresholds: &GestureThresholds) -> GestureState {
    if !frame.hand_detected {
        return GestureState::NONE;
    }

    let pinch_dist = landmark_distance(frame.landmark(THUMB_TIP), frame.landmark(INDEX_TIP));
    let pinched = pinch_dist < thresholds.pinch;

    let wrist = frame.landmark(WRIST);
    let mean_tip_dist = FINGERTIPS
        .iter()
        .map(|&tip| landmark_distance(wrist, frame.landmark(tip)))
        .sum::<f64>()
        / FINGERTIPS.len() as f64;

    let grabbing = mean_tip_dist < thresholds.grab;
    // Grab and pinch take priority; a hand cannot read as open while either
    // of the closed poses matches.
    let open_hand = mean_tip_dist > thresholds.open_palm && !grabbing && !pinched;

    GestureState {
        pinched,
        grabbing,
        open_hand,
    }
}
