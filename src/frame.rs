//! The per-frame orchestrator.
//!
//! Owns every piece of interaction state in one explicit context and runs
//! the whole pipeline for each detector frame: gestures → buffered
//! controller messages → activation → cursor/menu or slider routing →
//! snapshot. Rendering consumes the returned snapshot and never touches
//! the live state.

use tracing::debug;

use crate::activation::{ActivationEvent, ActivationState};
use crate::config::UiConfig;
use crate::geometry;
use crate::hand::cursor::Cursor;
use crate::hand::gesture::{classify, GestureState};
use crate::hand::landmarks::HandFrame;
use crate::link::channel::ControllerLink;
use crate::link::protocol::SliderTarget;
use crate::menu::interaction::{FrameInput, InteractionState, SelectionOutcome};
use crate::menu::model::MenuDef;
use crate::menu::walker;
use crate::slider::{format_minutes, Orientation, Placement, SliderController, UiMode};

/// Notable transitions surfaced to the embedding shell for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    Unlocked,
    Locked,
    SelectionConfirmed { level: usize, label: String },
    ActionDispatched { name: String },
    SliderOpened { target: SliderTarget },
}

/// One menu segment as the drawing sink should show it.
#[derive(Debug, Clone)]
pub struct SegmentView {
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    pub hovered: bool,
    pub selected: bool,
    /// Dwell fill fraction, 0 when this segment is not filling.
    pub fill: f64,
}

/// One open level (disc or ring) of the menu.
#[derive(Debug, Clone)]
pub struct LevelView {
    pub level: usize,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub segments: Vec<SegmentView>,
}

/// Value readout under a slider.
#[derive(Debug, Clone, PartialEq)]
pub enum SliderReadout {
    Percent(u8),
    Time {
        current: String,
        total: String,
        playing: bool,
    },
}

/// Slider as the drawing sink should show it.
#[derive(Debug, Clone)]
pub struct SliderView {
    pub target: SliderTarget,
    pub title: String,
    pub placement: Placement,
    pub orientation: Orientation,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
    pub preview: bool,
    pub readout: SliderReadout,
}

#[derive(Debug, Clone)]
pub struct CursorView {
    pub x: f64,
    pub y: f64,
    pub faded: bool,
}

/// Complete pure description of one frame, handed to the scene builder.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub unlocked: bool,
    pub menu_visible: bool,
    pub menu_alpha: f64,
    /// Progress of the unlock or relock ring while one is filling.
    pub activation_ring: Option<f64>,
    pub levels: Vec<LevelView>,
    pub cursor: Option<CursorView>,
    pub grab_hint: bool,
    pub slider: Option<SliderView>,
    pub events: Vec<FrameEvent>,
}

/// The explicit per-process context: every state singleton of the overlay
/// lives here and is mutated only inside `process_frame`.
pub struct FrameContext {
    pub config: UiConfig,
    pub menu: MenuDef,
    pub cursor: Cursor,
    pub gestures: GestureState,
    pub activation: ActivationState,
    pub interaction: InteractionState,
    pub slider: SliderController,
    pub link: ControllerLink,
}

impl FrameContext {
    pub fn new(config: UiConfig, menu: MenuDef, link: ControllerLink) -> Self {
        let interaction = InteractionState::new(menu.depth());
        Self {
            config,
            menu,
            cursor: Cursor::new(),
            gestures: GestureState::NONE,
            activation: ActivationState::new(),
            interaction,
            slider: SliderController::new(),
            link,
        }
    }

    /// Run one full state update and return the frame's scene snapshot.
    pub fn process_frame(&mut self, frame: &HandFrame, now_ms: f64) -> FrameSnapshot {
        let mut events = Vec::new();

        // Step 1: gestures for this frame.
        self.gestures = classify(frame, &self.config.thresholds);

        // Step 2: apply controller messages buffered since the last frame.
        for message in self.link.drain() {
            self.slider.apply_inbound(&message);
        }

        // Step 3: activation cycle. While locked only the unlock dwell
        // runs; a relock collapses everything.
        match self.activation.update(
            frame.hand_detected,
            self.gestures.open_hand,
            now_ms,
            &self.config.timing,
        ) {
            Some(ActivationEvent::Unlocked) => events.push(FrameEvent::Unlocked),
            Some(ActivationEvent::Locked) => {
                self.interaction.collapse();
                self.slider.exit();
                events.push(FrameEvent::Locked);
            }
            None => {}
        }
        if !self.activation.menu_unlocked {
            return self.snapshot(frame, events);
        }

        // Step 4: route input.
        if !frame.hand_detected {
            // Everything collapses gracefully; the idle cycle above takes
            // it from here.
            self.interaction.collapse();
            self.slider.exit();
        } else if self.slider.mode == UiMode::Slider {
            if let Some(message) =
                self.slider
                    .scrub(frame, self.gestures.pinched, &self.config.slider)
            {
                self.link.send(&message);
            }
        } else {
            self.update_menu(frame, now_ms, &mut events);
        }

        self.snapshot(frame, events)
    }

    fn update_menu(&mut self, frame: &HandFrame, now_ms: f64, events: &mut Vec<FrameEvent>) {
        self.cursor.update(frame, self.config.canvas);
        let center = self.config.geometry.center;
        let distance = geometry::distance(self.cursor.position, center);
        let angle = geometry::angle(self.cursor.position, center);

        let selections = self.interaction.selection_options();
        let level0_hover = walker::hovered_segment(
            &self.menu,
            &selections,
            0,
            distance,
            angle,
            &self.config.geometry,
        );

        let fired = self.interaction.update(&FrameInput {
            menu: &self.menu,
            geometry: &self.config.geometry,
            now_ms,
            hover_fill_ms: self.config.timing.hover_fill_ms,
            hand_detected: true,
            grabbing: self.gestures.grabbing,
            cursor_distance: distance,
            cursor_angle: angle,
            level0_hover,
            slider_visible: self.slider.visible,
        });

        if let Some(fired) = fired {
            events.push(FrameEvent::SelectionConfirmed {
                level: fired.level,
                label: fired.label,
            });
            match fired.outcome {
                SelectionOutcome::Submenu => {
                    // A menu pick clears any transient slider display.
                    self.slider.hide();
                }
                SelectionOutcome::OpenSlider { target } => {
                    let selected_main = self.interaction.level(0).selected;
                    self.slider.open_confirmed(
                        target,
                        &self.menu,
                        &self.config.geometry,
                        selected_main,
                    );
                    events.push(FrameEvent::SliderOpened { target });
                }
                SelectionOutcome::Action { name } => {
                    self.slider.hide();
                    if name == "play_pause" {
                        let command = self.slider.toggle_playback();
                        self.link.send(&command);
                    } else {
                        debug!(action = %name, "action dispatched out of band");
                    }
                    events.push(FrameEvent::ActionDispatched { name });
                }
            }
        }

        // Step 5: preview protocol, only while the menu still owns input.
        if self.slider.mode == UiMode::Menu {
            let request = self.interaction.preview_request(&self.menu);
            self.slider.reconcile_preview(
                request,
                &self.interaction,
                &self.menu,
                &self.config.geometry,
            );
        }
    }

    fn snapshot(&self, frame: &HandFrame, events: Vec<FrameEvent>) -> FrameSnapshot {
        let unlocked = self.activation.menu_unlocked;
        let menu_visible = unlocked;
        let slider_mode = self.slider.mode == UiMode::Slider;
        let relock_filling = self.activation.relock.progress > 0.0;
        let menu_alpha = if slider_mode || relock_filling { 0.25 } else { 1.0 };

        let levels = if menu_visible {
            self.level_views()
        } else {
            Vec::new()
        };
        let cursor = (menu_visible && frame.hand_detected && !slider_mode).then(|| CursorView {
            x: self.cursor.position.x,
            y: self.cursor.position.y,
            faded: self.slider.visible,
        });

        FrameSnapshot {
            unlocked,
            menu_visible,
            menu_alpha,
            activation_ring: self.activation.ring_progress(),
            levels,
            cursor: cursor.clone(),
            grab_hint: cursor.is_some(),
            slider: self.slider_view(),
            events,
        }
    }

    fn level_views(&self) -> Vec<LevelView> {
        let mut views = Vec::new();
        let selections = self.interaction.selection_options();
        let cursor_distance =
            geometry::distance(self.cursor.position, self.config.geometry.center);
        let in_ring = walker::in_submenu_ring(
            &self.config.geometry,
            cursor_distance,
            self.interaction.open_ring_count(),
        );

        for level in 0..self.interaction.depth() {
            if level > 0 {
                // A ring shows only while its parent selection is being
                // browsed, a slider owns the screen, or the cursor sits in
                // the ring span.
                let parent = self.interaction.level(level - 1);
                let browsing = parent.selected.is_some()
                    && (parent.selected == parent.hover
                        || self.slider.selected_target.is_some()
                        || in_ring);
                if !browsing {
                    continue;
                }
            }

            let Some(range) =
                walker::angle_range_for_level(&self.menu, &selections, level)
            else {
                continue;
            };
            let state = self.interaction.level(level);
            let (inner_radius, outer_radius) = walker::radial_band(&self.config.geometry, level);
            let step = range.step();

            let segments = range
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let start_angle = range.start + i as f64 * step;
                    let hovered = state.hover == Some(i)
                        || (level == 0
                            && in_ring
                            && state.selected == Some(i)
                            && item.children().is_some());
                    let fill = if state.hover == Some(i) && !state.dwell_triggered {
                        state.dwell.progress
                    } else {
                        0.0
                    };
                    SegmentView {
                        label: item.label.clone(),
                        start_angle,
                        end_angle: start_angle + step,
                        hovered,
                        selected: state.selected == Some(i),
                        fill,
                    }
                })
                .collect();

            views.push(LevelView {
                level,
                inner_radius,
                outer_radius,
                segments,
            });
        }
        views
    }

    fn slider_view(&self) -> Option<SliderView> {
        if !self.slider.visible {
            return None;
        }
        let layout = self.slider.layout.as_ref()?;
        let target = layout.target;
        let value = self.slider.values.value_of(target);
        let readout = match target {
            SliderTarget::Presentation => {
                let playback = &self.slider.values.playback;
                SliderReadout::Time {
                    current: format_minutes(value * playback.total_minutes()),
                    total: format_minutes(playback.total_minutes()),
                    playing: playback.playing,
                }
            }
            _ => SliderReadout::Percent((value * 100.0).round() as u8),
        };
        Some(SliderView {
            target,
            title: target.title().to_string(),
            placement: layout.placement,
            orientation: layout.orientation,
            x: layout.x,
            y: layout.y,
            width: layout.width,
            height: layout.height,
            value,
            preview: self.slider.preview,
            readout,
        })
    }
}
