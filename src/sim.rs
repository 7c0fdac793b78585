//! Synthetic hand frames: posed landmark sets for tests and the scripted
//! demo source used when no real detector is attached.

use crate::hand::landmarks::{
    HandFrame, Landmark, FINGERTIPS, INDEX_BASE, INDEX_TIP, LANDMARK_COUNT, THUMB_TIP,
};

/// Canonical hand poses the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// Fingers spread wide: reads as open hand.
    Open,
    /// Relaxed hand: no gesture flags.
    Neutral,
    /// Thumb tip on index tip: reads as pinch.
    Pinch,
    /// Fist: reads as grab.
    Grab,
}

/// Build a frame posed at the given index-base position (normalized image
/// coordinates). The fingertip geometry is chosen to sit firmly on the
/// intended side of each classifier threshold.
pub fn posed_frame(pose: Pose, base_x: f64, base_y: f64) -> HandFrame {
    let wrist = Landmark::new(base_x, base_y + 0.12, 0.0);
    let mut landmarks = [wrist; LANDMARK_COUNT];
    landmarks[INDEX_BASE] = Landmark::new(base_x, base_y, 0.0);

    match pose {
        Pose::Open => {
            spread_fingertips(&mut landmarks, wrist, 0.35);
            landmarks[THUMB_TIP] = Landmark::new(wrist.x - 0.3, wrist.y, 0.0);
        }
        Pose::Neutral => {
            spread_fingertips(&mut landmarks, wrist, 0.2);
            landmarks[THUMB_TIP] = Landmark::new(wrist.x - 0.18, wrist.y, 0.0);
        }
        Pose::Pinch => {
            spread_fingertips(&mut landmarks, wrist, 0.2);
            // Thumb meets the index tip; the tip rides above the base so
            // drags track the hand.
            let tip = Landmark::new(base_x, base_y - 0.06, 0.0);
            landmarks[INDEX_TIP] = tip;
            landmarks[THUMB_TIP] = tip;
        }
        Pose::Grab => {
            spread_fingertips(&mut landmarks, wrist, 0.05);
            landmarks[THUMB_TIP] = Landmark::new(wrist.x - 0.1, wrist.y, 0.0);
        }
    }

    HandFrame::detected(landmarks)
}

fn spread_fingertips(landmarks: &mut [Landmark; LANDMARK_COUNT], wrist: Landmark, reach: f64) {
    // Fan the four fingertips upward from the wrist at the given reach.
    let directions: [(f64, f64); 4] = [(-0.3, -1.0), (-0.1, -1.0), (0.1, -1.0), (0.3, -1.0)];
    for (&tip, (dx, dy)) in FINGERTIPS.iter().zip(directions) {
        let norm = (dx * dx + dy * dy).sqrt();
        landmarks[tip] = Landmark::new(
            wrist.x + dx / norm * reach,
            wrist.y + dy / norm * reach,
            0.0,
        );
    }
}

/// Scripted demo input: unlock, dwell out the first segment, scrub the
/// slider, idle back to a relock. Loops forever.
pub struct ScriptedHand {
    cycle_ms: f64,
}

impl ScriptedHand {
    pub fn new() -> Self {
        Self { cycle_ms: 24_000.0 }
    }

    pub fn frame(&self, now_ms: f64) -> HandFrame {
        let t = now_ms % self.cycle_ms;

        // Cursor parked mid-segment-0 of the default layout (45°, inside
        // the main radius on a 1280x720 canvas).
        let seg0 = (1.0 - 710.0 / 1280.0, 430.0 / 720.0);

        if t < 1_000.0 {
            HandFrame::empty()
        } else if t < 4_600.0 {
            posed_frame(Pose::Open, 0.5, 0.5)
        } else if t < 8_600.0 {
            posed_frame(Pose::Neutral, seg0.0, seg0.1)
        } else if t < 12_600.0 {
            // Slow upward pinch drag.
            let progress = (t - 8_600.0) / 4_000.0;
            posed_frame(Pose::Pinch, seg0.0, seg0.1 - 0.1 * progress)
        } else if t < 13_600.0 {
            posed_frame(Pose::Neutral, 0.5, 0.5)
        } else {
            HandFrame::empty()
        }
    }
}

impl Default for ScriptedHand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::{landmark_distance, WRIST};

    #[test]
    fn test_posed_frames_sit_on_the_right_side_of_thresholds() {
        let open = posed_frame(Pose::Open, 0.5, 0.5);
        let wrist = open.landmark(WRIST);
        let mean = FINGERTIPS
            .iter()
            .map(|&t| landmark_distance(wrist, open.landmark(t)))
            .sum::<f64>()
            / 4.0;
        assert!(mean > 0.3, "open reach {} must exceed the palm threshold", mean);

        let grab = posed_frame(Pose::Grab, 0.5, 0.5);
        let wrist = grab.landmark(WRIST);
        let mean = FINGERTIPS
            .iter()
            .map(|&t| landmark_distance(wrist, grab.landmark(t)))
            .sum::<f64>()
            / 4.0;
        assert!(mean < 0.13, "grab reach {} must sit under the grab threshold", mean);

        let pinch = posed_frame(Pose::Pinch, 0.5, 0.5);
        assert!(
            landmark_distance(pinch.landmark(THUMB_TIP), pinch.landmark(INDEX_TIP)) < 0.05
        );
    }

    #[test]
    fn test_scripted_cycle_phases() {
        let script = ScriptedHand::new();
        assert!(!script.frame(500.0).hand_detected);
        assert!(script.frame(2_000.0).hand_detected);
        assert!(script.frame(10_000.0).hand_detected);
        assert!(!script.frame(20_000.0).hand_detected);
        // The cycle wraps.
        assert!(!script.frame(24_500.0).hand_detected);
        assert!(script.frame(26_000.0).hand_detected);
    }
}
