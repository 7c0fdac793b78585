//! Landmark-to-canvas cursor mapping.
//!
//! The cursor follows the index-finger base (landmark 9), mirrored
//! horizontally so on-screen movement matches the user's physical hand.

use super::landmarks::{HandFrame, INDEX_BASE};
use crate::config::CanvasSize;
use crate::geometry::Point;

/// Canvas-space cursor position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    pub position: Point,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the current frame's steering landmark into canvas space.
    /// Only called while a hand is detected; the position keeps its last
    /// value otherwise.
    pub fn update(&mut self, frame: &HandFrame, canvas: CanvasSize) {
        let steer = frame.landmark(INDEX_BASE);
        self.position = Point::new((1.0 - steer.x) * canvas.width, steer.y * canvas.height);
    }
}
