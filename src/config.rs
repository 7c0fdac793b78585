//! Runtime configuration: canvas, menu geometry, gesture thresholds,
//! dwell timings, slider feel.
//!
//! The adjuster methods exist for the debug shortcuts only; nothing in the
//! interaction core mutates config at runtime.

use crate::geometry::Point;

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Placement and sizing of the marking menu circle.
#[derive(Debug, Clone)]
pub struct MenuGeometry {
    pub center: Point,
    /// Radius of the inner disc (level 0).
    pub main_radius: f64,
    /// Width of each concentric submenu ring.
    pub ring_width: f64,
    pub radius_step: f64,
    pub min_radius: f64,
    pub max_radius: f64,
}

impl Default for MenuGeometry {
    fn default() -> Self {
        Self {
            center: Point::new(640.0, 360.0),
            main_radius: 200.0,
            ring_width: 80.0,
            radius_step: 20.0,
            min_radius: 120.0,
            max_radius: 500.0,
        }
    }
}

impl MenuGeometry {
    /// Grow or shrink the main radius by whole steps, clamped to the
    /// legal range. Debug affordance; thresholds and the center are plain
    /// fields and mutate directly.
    pub fn resize(&mut self, steps: f64) {
        let next = self.main_radius + steps * self.radius_step;
        if next >= self.min_radius && next <= self.max_radius {
            self.main_radius = next;
        }
    }
}

/// Gesture classifier thresholds in normalized landmark units.
#[derive(Debug, Clone)]
pub struct GestureThresholds {
    pub pinch: f64,
    pub grab: f64,
    pub open_palm: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            pinch: 0.05,
            grab: 0.13,
            open_palm: 0.3,
        }
    }
}

/// Dwell and idle durations, milliseconds.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Per-level hover fill.
    pub hover_fill_ms: f64,
    /// Relock ring once the idle stage has elapsed.
    pub dwell_ms: f64,
    /// No-hand tolerance before the relock ring starts.
    pub idle_before_dwell_ms: f64,
    /// Sustained open-hand hold that unlocks the menu.
    pub unlock_hold_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            hover_fill_ms: 3000.0,
            dwell_ms: 3000.0,
            idle_before_dwell_ms: 5000.0,
            unlock_hold_ms: 3000.0,
        }
    }
}

/// Top-level configuration for one overlay instance.
#[derive(Debug, Clone, Default)]
pub struct UiConfig {
    pub canvas: CanvasSize,
    pub geometry: MenuGeometry,
    pub thresholds: GestureThresholds,
    pub timing: TimingConfig,
    pub slider: SliderFeel,
}

/// Slider scrub feel.
#[derive(Debug, Clone)]
pub struct SliderFeel {
    /// Multiplier from normalized fingertip delta to value delta.
    pub sensitivity: f64,
}

impl Default for SliderFeel {
    fn default() -> Self {
        Self { sensitivity: 2.0 }
    }
}

impl UiConfig {
    /// Recompute the canvas and recentre the menu, as on a window resize.
    pub fn resize_canvas(&mut self, width: f64, height: f64) {
        self.canvas = CanvasSize { width, height };
        self.geometry.center = Point::new(width / 2.0, height / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = UiConfig::default();
        assert_eq!(cfg.geometry.main_radius, 200.0);
        assert_eq!(cfg.geometry.ring_width, 80.0);
        assert_eq!(cfg.thresholds.pinch, 0.05);
        assert_eq!(cfg.thresholds.grab, 0.13);
        assert_eq!(cfg.thresholds.open_palm, 0.3);
        assert_eq!(cfg.timing.hover_fill_ms, 3000.0);
        assert_eq!(cfg.slider.sensitivity, 2.0);
    }

    #[test]
    fn test_resize_clamps_to_range() {
        let mut geom = MenuGeometry::default();
        geom.resize(-4.0);
        assert_eq!(geom.main_radius, 120.0);
        // One step below the minimum is refused.
        geom.resize(-1.0);
        assert_eq!(geom.main_radius, 120.0);

        geom.resize(19.0);
        assert_eq!(geom.main_radius, 500.0);
        geom.resize(1.0);
        assert_eq!(geom.main_radius, 500.0);
    }

    #[test]
    fn test_resize_canvas_recentres_menu() {
        let mut cfg = UiConfig::default();
        cfg.resize_canvas(1920.0, 1080.0);
        assert_eq!(cfg.geometry.center, Point::new(960.0, 540.0));
    }
}
