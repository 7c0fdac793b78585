//! Scene builder: a stateless translation from a `FrameSnapshot` to flat
//! draw commands.
//!
//! The drawing sink (canvas, GPU overlay, test harness) replays the
//! command list in order; nothing here reads or mutates interaction
//! state. Icons resolve through a cache that remembers failures and falls
//! back to the text label.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::frame::{FrameSnapshot, SliderReadout};
use crate::slider::Orientation;

/// RGBA color, straight out of the original palette.
pub type Color = [f32; 4];

const SEGMENT_DEFAULT: Color = [0.0, 0.0, 0.0, 0.05];
const SEGMENT_HOVERED: Color = [1.0, 0.0, 1.0, 0.3];
const SEGMENT_SELECTED: Color = [1.0, 0.0, 1.0, 0.5];
const DWELL_FILL: Color = [0.0, 0.0, 0.0, 0.25];
const CURSOR_COLOR: Color = [0.5, 0.0, 0.5, 1.0];
const RING_COLOR: Color = [0.0, 0.59, 1.0, 0.9];
const SLIDER_TRACK: Color = [1.0, 0.71, 0.47, 0.25];
const SLIDER_FILL: Color = [1.0, 0.39, 0.0, 0.8];

/// One primitive for the drawing sink.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Pie segment of the inner disc.
    DiscSegment {
        start_angle: f64,
        end_angle: f64,
        radius: f64,
        color: Color,
        alpha: f64,
    },
    /// Annular segment of a submenu ring.
    RingSegment {
        start_angle: f64,
        end_angle: f64,
        inner_radius: f64,
        outer_radius: f64,
        color: Color,
        alpha: f64,
    },
    /// Item caption, either an icon or its text fallback.
    Label {
        text: String,
        icon: Option<PathBuf>,
        x: f64,
        y: f64,
        alpha: f64,
    },
    /// Cursor disc.
    Cursor { x: f64, y: f64, alpha: f64 },
    /// Corner progress ring for the activation dwell.
    ProgressRing { progress: f64 },
    /// Slider track rectangle.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        alpha: f64,
    },
    /// Free-standing text (titles, readouts).
    Text {
        text: String,
        x: f64,
        y: f64,
        alpha: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IconStatus {
    Found,
    Failed,
}

/// Label → icon file resolution, with failures cached so a missing asset
/// is probed once and rendered as text forever after.
pub struct IconCache {
    directory: PathBuf,
    entries: HashMap<String, IconStatus>,
}

impl IconCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: HashMap::new(),
        }
    }

    /// Path for a label's icon, or `None` once the asset is known missing.
    pub fn resolve(&mut self, label: &str) -> Option<PathBuf> {
        let path = self.directory.join(format!("{label}.png"));
        let status = *self.entries.entry(label.to_string()).or_insert_with(|| {
            if Path::new(&path).is_file() {
                IconStatus::Found
            } else {
                IconStatus::Failed
            }
        });
        (status == IconStatus::Found).then_some(path)
    }
}

/// Flatten one snapshot into draw commands.
pub fn build_scene(snapshot: &FrameSnapshot, icons: &mut IconCache, center: (f64, f64)) -> Vec<DrawCmd> {
    let mut commands = Vec::new();
    let (cx, cy) = center;
    let alpha = snapshot.menu_alpha;

    let levels = if snapshot.menu_visible {
        snapshot.levels.as_slice()
    } else {
        &[]
    };
    for level in levels {
        for segment in &level.segments {
            let color = if segment.selected {
                SEGMENT_SELECTED
            } else if segment.hovered {
                SEGMENT_HOVERED
            } else {
                SEGMENT_DEFAULT
            };

            if level.level == 0 {
                commands.push(DrawCmd::DiscSegment {
                    start_angle: segment.start_angle,
                    end_angle: segment.end_angle,
                    radius: level.outer_radius,
                    color,
                    alpha,
                });
            } else {
                commands.push(DrawCmd::RingSegment {
                    start_angle: segment.start_angle,
                    end_angle: segment.end_angle,
                    inner_radius: level.inner_radius,
                    outer_radius: level.outer_radius,
                    color,
                    alpha,
                });
            }

            // Dwell fill sweeps the segment's angular span.
            if segment.fill > 0.0 && !segment.selected {
                let fill_end = segment.start_angle
                    + (segment.end_angle - segment.start_angle) * segment.fill;
                if level.level == 0 {
                    commands.push(DrawCmd::DiscSegment {
                        start_angle: segment.start_angle,
                        end_angle: fill_end,
                        radius: level.outer_radius,
                        color: DWELL_FILL,
                        alpha,
                    });
                } else {
                    commands.push(DrawCmd::RingSegment {
                        start_angle: segment.start_angle,
                        end_angle: fill_end,
                        inner_radius: level.inner_radius,
                        outer_radius: level.outer_radius,
                        color: DWELL_FILL,
                        alpha,
                    });
                }
            }

            // Caption at the segment's mid-angle.
            let mid = (segment.start_angle + segment.end_angle) / 2.0;
            let label_radius = if level.level == 0 {
                level.outer_radius * 0.6
            } else {
                (level.inner_radius + level.outer_radius) / 2.0
            };
            commands.push(DrawCmd::Label {
                icon: icons.resolve(&segment.label),
                text: segment.label.clone(),
                x: cx + mid.cos() * label_radius,
                y: cy + mid.sin() * label_radius,
                alpha,
            });
        }
    }

    if let Some(slider) = &snapshot.slider {
        let slider_alpha = if slider.preview { 0.5 } else { 1.0 };
        commands.push(DrawCmd::Rect {
            x: slider.x,
            y: slider.y,
            width: slider.width,
            height: slider.height,
            color: SLIDER_TRACK,
            alpha: slider_alpha,
        });

        // Filled portion grows upward for vertical sliders, rightward for
        // horizontal ones.
        match slider.orientation {
            Orientation::Vertical => {
                let filled = slider.height * slider.value;
                commands.push(DrawCmd::Rect {
                    x: slider.x,
                    y: slider.y + slider.height - filled,
                    width: slider.width,
                    height: filled,
                    color: SLIDER_FILL,
                    alpha: slider_alpha,
                });
            }
            Orientation::Horizontal => {
                commands.push(DrawCmd::Rect {
                    x: slider.x,
                    y: slider.y,
                    width: slider.width * slider.value,
                    height: slider.height,
                    color: SLIDER_FILL,
                    alpha: slider_alpha,
                });
            }
        }

        commands.push(DrawCmd::Text {
            text: slider.title.clone(),
            x: slider.x + slider.width / 2.0,
            y: slider.y - 30.0,
            alpha: slider_alpha,
        });
        match &slider.readout {
            SliderReadout::Percent(percent) => {
                commands.push(DrawCmd::Text {
                    text: format!("{percent}%"),
                    x: slider.x + slider.width / 2.0,
                    y: slider.y + slider.height + 30.0,
                    alpha: slider_alpha,
                });
            }
            SliderReadout::Time {
                current,
                total,
                playing,
            } => {
                commands.push(DrawCmd::Text {
                    text: current.clone(),
                    x: slider.x + slider.width * slider.value,
                    y: slider.y + slider.height + 20.0,
                    alpha: slider_alpha,
                });
                commands.push(DrawCmd::Text {
                    text: total.clone(),
                    x: slider.x + slider.width,
                    y: slider.y + slider.height + 20.0,
                    alpha: slider_alpha,
                });
                commands.push(DrawCmd::Text {
                    text: if *playing { "pause" } else { "play" }.to_string(),
                    x: slider.x - 40.0,
                    y: slider.y + slider.height / 2.0,
                    alpha: slider_alpha,
                });
            }
        }
    }

    if snapshot.grab_hint {
        commands.push(DrawCmd::Text {
            text: "Make a fist to select instantly".to_string(),
            x: cx,
            y: 200.0,
            alpha,
        });
    }

    if let Some(cursor) = &snapshot.cursor {
        commands.push(DrawCmd::Cursor {
            x: cursor.x,
            y: cursor.y,
            alpha: if cursor.faded { 0.5 } else { 1.0 },
        });
    }

    if let Some(progress) = snapshot.activation_ring {
        commands.push(DrawCmd::ProgressRing { progress });
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::frame::FrameContext;
    use crate::hand::landmarks::HandFrame;
    use crate::link::channel::ControllerLink;
    use crate::menu::model::MenuDef;
    use crate::sim::{posed_frame, Pose};

    fn icons() -> IconCache {
        // Point at a directory that does not exist: every icon resolves to
        // the text fallback.
        IconCache::new("/nonexistent/icons")
    }

    fn unlocked_context() -> FrameContext {
        let mut ctx = FrameContext::new(
            UiConfig::default(),
            MenuDef::builtin(),
            ControllerLink::offline(),
        );
        ctx.process_frame(&HandFrame::empty(), 0.0);
        let open = posed_frame(Pose::Open, 0.5, 0.5);
        ctx.process_frame(&open, 100.0);
        ctx.process_frame(&open, 200.0);
        ctx.process_frame(&open, 3200.0);
        ctx
    }

    #[test]
    fn test_locked_snapshot_draws_nothing_but_the_ring() {
        let mut ctx = FrameContext::new(
            UiConfig::default(),
            MenuDef::builtin(),
            ControllerLink::offline(),
        );
        let snapshot = ctx.process_frame(&HandFrame::empty(), 0.0);
        let commands = build_scene(&snapshot, &mut icons(), (640.0, 360.0));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_unlocked_menu_produces_segments_and_labels() {
        let mut ctx = unlocked_context();
        let snapshot = ctx.process_frame(&posed_frame(Pose::Neutral, 0.5, 0.5), 3300.0);
        let commands = build_scene(&snapshot, &mut icons(), (640.0, 360.0));

        let discs = commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::DiscSegment { .. }))
            .count();
        assert!(discs >= 5, "five main segments expected, got {discs}");

        let labels: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Label { text, icon, .. } => Some((text.clone(), icon.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 5);
        // No icon directory: every label falls back to text.
        assert!(labels.iter().all(|(_, icon)| icon.is_none()));
        assert!(labels.iter().any(|(text, _)| text == "Volume"));

        assert!(commands
            .iter()
            .any(|c| matches!(c, DrawCmd::Cursor { .. })));
    }

    #[test]
    fn test_icon_cache_remembers_failures() {
        let mut cache = IconCache::new("/nonexistent/icons");
        assert!(cache.resolve("Volume").is_none());
        // Second probe hits the cache (same result, no panic on repeats).
        assert!(cache.resolve("Volume").is_none());
        assert_eq!(cache.entries.len(), 1);
    }

    #[test]
    fn test_icon_cache_finds_real_files() {
        let dir = std::env::temp_dir().join("wavedeck-icon-test");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("Volume.png");
        std::fs::write(&path, b"png").expect("icon file");

        let mut cache = IconCache::new(&dir);
        assert_eq!(cache.resolve("Volume"), Some(path.clone()));
        assert!(cache.resolve("Missing").is_none());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_grab_hint_renders_in_menu_mode() {
        let mut ctx = unlocked_context();
        let snapshot = ctx.process_frame(&posed_frame(Pose::Neutral, 0.5, 0.5), 3300.0);
        assert!(snapshot.grab_hint);
        let commands = build_scene(&snapshot, &mut icons(), (640.0, 360.0));
        assert!(commands.iter().any(
            |c| matches!(c, DrawCmd::Text { text, .. } if text.contains("fist"))
        ));
    }
}
