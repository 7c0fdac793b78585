//! The slider sub-mode: preview and confirmed scrubbing of
//! controller-backed values.
//!
//! While confirmed, the controller owns the per-frame input — pinch engages
//! a drag anchor, fingertip deltas accumulate into the value, and every
//! local change is pushed to the presentation controller. Inbound updates
//! flow the other way unless the user is mid-drag on the same target.

use tracing::debug;

use crate::config::{MenuGeometry, SliderFeel};
use crate::geometry::TAU;
use crate::hand::landmarks::{HandFrame, INDEX_TIP};
use crate::link::protocol::{Inbound, Outbound, PresentationAction, SliderTarget};
use crate::menu::interaction::{InteractionState, PreviewOwner, PreviewRequest};
use crate::menu::model::MenuDef;

/// What the per-frame input currently drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Menu,
    Slider,
}

/// Side of the menu circle a slider docks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Computed slider rectangle and orientation.
#[derive(Debug, Clone)]
pub struct SliderLayout {
    pub target: SliderTarget,
    pub placement: Placement,
    pub orientation: Orientation,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Controller-side playback state for the presentation target.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    /// Total length in seconds.
    pub duration_s: f64,
    /// Current position in seconds.
    pub current_s: f64,
    pub playing: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            duration_s: 0.0,
            current_s: 0.0,
            playing: false,
        }
    }
}

impl PlaybackState {
    pub fn total_minutes(&self) -> f64 {
        self.duration_s / 60.0
    }

    /// Normalized [0,1] position.
    pub fn fraction(&self) -> f64 {
        if self.duration_s <= 0.0 {
            0.0
        } else {
            (self.current_s / self.duration_s).clamp(0.0, 1.0)
        }
    }
}

/// Store of all controller-backed values.
#[derive(Debug, Clone, Default)]
pub struct SliderValues {
    pub volume: f64,
    pub brightness: f64,
    pub vibration: f64,
    pub playback: PlaybackState,
}

impl SliderValues {
    pub fn value_of(&self, target: SliderTarget) -> f64 {
        match target {
            SliderTarget::Volume => self.volume,
            SliderTarget::Brightness => self.brightness,
            SliderTarget::Vibration => self.vibration,
            SliderTarget::Presentation => self.playback.fraction(),
        }
    }

    pub fn set_value(&mut self, target: SliderTarget, value: f64) {
        let value = value.clamp(0.0, 1.0);
        match target {
            SliderTarget::Volume => self.volume = value,
            SliderTarget::Brightness => self.brightness = value,
            SliderTarget::Vibration => self.vibration = value,
            SliderTarget::Presentation => {
                self.playback.current_s = value * self.playback.duration_s;
            }
        }
    }
}

/// The slider sub-mode controller: inactive → preview → confirmed.
#[derive(Debug, Clone)]
pub struct SliderController {
    pub mode: UiMode,
    pub visible: bool,
    pub preview: bool,
    pub preview_owner: Option<PreviewOwner>,
    /// The slider opened by a confirmed selection.
    pub selected_target: Option<SliderTarget>,
    pub layout: Option<SliderLayout>,
    pub values: SliderValues,
    /// Last pinched fingertip position; `Some` while a drag is engaged.
    anchor: Option<(f64, f64)>,
}

impl SliderController {
    pub fn new() -> Self {
        Self {
            mode: UiMode::Menu,
            visible: false,
            preview: false,
            preview_owner: None,
            selected_target: None,
            layout: None,
            values: SliderValues::default(),
            anchor: None,
        }
    }

    /// Whether the user is actively dragging `target` right now.
    fn dragging(&self, target: SliderTarget) -> bool {
        self.mode == UiMode::Slider
            && self.selected_target == Some(target)
            && self.anchor.is_some()
    }

    /// Confirmed entry: a slider-kind selection hands control over.
    pub fn open_confirmed(
        &mut self,
        target: SliderTarget,
        menu: &MenuDef,
        geometry: &MenuGeometry,
        selected_main: Option<usize>,
    ) {
        self.mode = UiMode::Slider;
        self.preview = false;
        self.preview_owner = None;
        self.selected_target = Some(target);
        self.visible = true;
        self.layout = Some(compute_layout(target, menu, geometry, selected_main));
        debug!(target = target.as_str(), "slider opened");
    }

    /// Reconcile the preview protocol against the live interaction state:
    /// tear down a preview whose owner no longer matches, then honor a new
    /// request if no preview is showing.
    pub fn reconcile_preview(
        &mut self,
        request: Option<PreviewRequest>,
        interaction: &InteractionState,
        menu: &MenuDef,
        geometry: &MenuGeometry,
    ) {
        if self.preview {
            let still_owned = self
                .preview_owner
                .as_ref()
                .is_some_and(|owner| interaction.owner_still_hovered(owner));
            if !still_owned {
                self.hide();
            }
        }

        if let Some(request) = request {
            if !self.preview && !self.visible {
                let selected_main = interaction.level(0).selected;
                self.layout = Some(compute_layout(
                    request.target,
                    menu,
                    geometry,
                    selected_main,
                ));
                self.visible = true;
                self.preview = true;
                self.preview_owner = Some(request.owner);
                debug!(target = request.target.as_str(), "slider preview shown");
            }
        }
    }

    /// Hide the slider and drop all transient state. Leaves `mode` to the
    /// caller: hand loss resets it, a confirmed open overwrites it.
    pub fn hide(&mut self) {
        self.preview = false;
        self.preview_owner = None;
        self.visible = false;
        self.selected_target = None;
        self.layout = None;
        self.anchor = None;
    }

    /// Full exit back to menu mode (hand lost or menu re-locked).
    pub fn exit(&mut self) {
        self.hide();
        self.mode = UiMode::Menu;
    }

    /// One frame of confirmed-mode scrubbing. Returns the message to send
    /// when the value moved.
    pub fn scrub(
        &mut self,
        frame: &HandFrame,
        pinched: bool,
        feel: &SliderFeel,
    ) -> Option<Outbound> {
        let target = self.selected_target?;
        let layout = self.layout.as_ref()?;

        if !frame.hand_detected || !pinched {
            // Releasing the pinch drops the anchor so a re-pinch does not
            // jump the value.
            self.anchor = None;
            return None;
        }

        let tip = frame.landmark(INDEX_TIP);
        let (last_x, last_y) = match self.anchor {
            Some(anchor) => anchor,
            None => {
                self.anchor = Some((tip.x, tip.y));
                return None;
            }
        };

        let dx = last_x - tip.x;
        let dy = last_y - tip.y;
        self.anchor = Some((tip.x, tip.y));

        let delta = match layout.orientation {
            Orientation::Vertical => dy,
            Orientation::Horizontal => dx,
        } * feel.sensitivity;

        if delta == 0.0 {
            return None;
        }

        let before = self.values.value_of(target);
        self.values.set_value(target, before + delta);
        let after = self.values.value_of(target);
        if after == before {
            return None;
        }

        Some(Outbound::SliderUpdate {
            target,
            value: after,
        })
    }

    /// Apply a buffered inbound message. A live drag on the same target
    /// keeps ownership of the value.
    pub fn apply_inbound(&mut self, message: &Inbound) {
        match message {
            Inbound::SliderUpdate { target, value } => {
                if self.dragging(*target) {
                    debug!(
                        target = target.as_str(),
                        "inbound value ignored during active drag"
                    );
                    return;
                }
                self.values.set_value(*target, *value);
            }
            Inbound::PresentationState {
                duration,
                current_time,
                playing,
            } => {
                self.values.playback.duration_s = *duration;
                self.values.playback.playing = *playing;
                if !self.dragging(SliderTarget::Presentation) {
                    self.values.playback.current_s = *current_time;
                }
            }
        }
    }

    /// Flip local play/pause and return the transport command.
    pub fn toggle_playback(&mut self) -> Outbound {
        let action = if self.values.playback.playing {
            PresentationAction::Pause
        } else {
            PresentationAction::Play
        };
        self.values.playback.playing = action == PresentationAction::Play;
        Outbound::PresentationCommand { action }
    }
}

impl Default for SliderController {
    fn default() -> Self {
        Self::new()
    }
}

/// Placement from the mid-angle of the root item that owns this slider:
/// the dominant axis of (cos θ, sin θ) picks the side, the sign picks
/// which one.
fn compute_layout(
    target: SliderTarget,
    menu: &MenuDef,
    geometry: &MenuGeometry,
    selected_main: Option<usize>,
) -> SliderLayout {
    let count = menu.items.len().max(1);
    let index = menu
        .main_index_for_target(target)
        .or(selected_main)
        .unwrap_or(0);

    let step = TAU / count as f64;
    let mid = (index as f64 + 0.5) * step;
    let (x, y) = (mid.cos(), mid.sin());

    let placement = if x.abs() > y.abs() {
        if x > 0.0 {
            Placement::Right
        } else {
            Placement::Left
        }
    } else if y > 0.0 {
        Placement::Bottom
    } else {
        Placement::Top
    };

    let orientation = match placement {
        Placement::Left | Placement::Right => Orientation::Vertical,
        Placement::Top | Placement::Bottom => Orientation::Horizontal,
    };

    let (width, height) = match orientation {
        Orientation::Vertical => (20.0, 250.0),
        Orientation::Horizontal => (250.0, 20.0),
    };

    let center = geometry.center;
    let radius = geometry.main_radius;
    let (sx, sy) = match placement {
        Placement::Right => (center.x + radius + 160.0, center.y - height / 2.0),
        Placement::Left => (center.x - radius - width - 160.0, center.y - height / 2.0),
        Placement::Bottom => (center.x - width / 2.0, center.y + radius + 130.0),
        Placement::Top => (center.x - width / 2.0, center.y - radius - height - 240.0),
    };

    SliderLayout {
        target,
        placement,
        orientation,
        x: sx,
        y: sy,
        width,
        height,
    }
}

/// Render a minutes value as `m:ss`.
pub fn format_minutes(minutes: f64) -> String {
    let whole = minutes.floor();
    let seconds = ((minutes - whole) * 60.0).round() as u32;
    format!("{}:{:02}", whole as u64, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::Landmark;
    use crate::menu::model::{ItemKind, MenuItem};

    fn feel() -> SliderFeel {
        SliderFeel::default()
    }

    fn geometry() -> MenuGeometry {
        MenuGeometry::default()
    }

    fn pinched_frame_at(x: f64, y: f64) -> HandFrame {
        let mut frame = HandFrame::empty();
        frame.hand_detected = true;
        frame.landmarks[INDEX_TIP] = Landmark::new(x, y, 0.0);
        frame
    }

    /// Eight 45° segments so every mid-angle has one clearly dominant
    /// axis; the volume slider sits at index 0 (mid 22.5°, docked right).
    fn eight_way_menu() -> MenuDef {
        let mut items = vec![MenuItem {
            label: "Volume".to_string(),
            kind: ItemKind::Slider {
                target: SliderTarget::Volume,
            },
        }];
        for i in 1..8 {
            items.push(MenuItem {
                label: format!("Item {}", i),
                kind: ItemKind::Action {
                    action: "noop".to_string(),
                },
            });
        }
        MenuDef { items }
    }

    fn confirmed_vertical_controller() -> SliderController {
        let menu = eight_way_menu();
        let mut slider = SliderController::new();
        slider.open_confirmed(SliderTarget::Volume, &menu, &geometry(), Some(0));
        slider
    }

    #[test]
    fn test_confirmed_open_sets_mode_and_layout() {
        let slider = confirmed_vertical_controller();
        assert_eq!(slider.mode, UiMode::Slider);
        assert!(slider.visible);
        assert!(!slider.preview);
        let layout = slider.layout.as_ref().unwrap();
        assert_eq!(layout.placement, Placement::Right);
        assert_eq!(layout.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_placement_by_quadrant() {
        let menu = eight_way_menu();
        let geom = geometry();
        // Brightness has no root owner, so placement follows the selected
        // main index: mids 112.5°, 202.5°, 292.5°.
        let layout = compute_layout(SliderTarget::Brightness, &menu, &geom, Some(2));
        assert_eq!(layout.placement, Placement::Bottom);
        assert_eq!(layout.orientation, Orientation::Horizontal);

        let layout = compute_layout(SliderTarget::Brightness, &menu, &geom, Some(4));
        assert_eq!(layout.placement, Placement::Left);
        assert_eq!(layout.orientation, Orientation::Vertical);

        let layout = compute_layout(SliderTarget::Brightness, &menu, &geom, Some(6));
        assert_eq!(layout.placement, Placement::Top);
    }

    #[test]
    fn test_vertical_drag_up_increases_value() {
        let mut slider = confirmed_vertical_controller();
        slider.values.set_value(SliderTarget::Volume, 0.5);

        // First pinched frame only sets the anchor.
        assert!(slider.scrub(&pinched_frame_at(0.5, 0.6), true, &feel()).is_none());

        // Moving up by 0.1 at sensitivity 2.0 adds 0.2.
        let out = slider.scrub(&pinched_frame_at(0.5, 0.5), true, &feel());
        assert_eq!(
            out,
            Some(Outbound::SliderUpdate {
                target: SliderTarget::Volume,
                value: 0.7,
            })
        );
        assert!((slider.values.volume - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_value_clamps_to_unit_range() {
        let mut slider = confirmed_vertical_controller();
        slider.values.set_value(SliderTarget::Volume, 0.9);
        slider.scrub(&pinched_frame_at(0.5, 0.6), true, &feel());
        slider.scrub(&pinched_frame_at(0.5, 0.2), true, &feel());
        assert_eq!(slider.values.volume, 1.0);

        slider.scrub(&pinched_frame_at(0.5, 0.9), true, &feel());
        assert!(slider.values.volume < 1.0);
    }

    #[test]
    fn test_pinch_release_resets_anchor() {
        let mut slider = confirmed_vertical_controller();
        slider.values.set_value(SliderTarget::Volume, 0.5);
        slider.scrub(&pinched_frame_at(0.5, 0.6), true, &feel());
        slider.scrub(&pinched_frame_at(0.5, 0.55), true, &feel());
        let held = slider.values.volume;

        // Release, move far away, re-pinch: no jump from the stale anchor.
        slider.scrub(&pinched_frame_at(0.5, 0.55), false, &feel());
        assert!(slider
            .scrub(&pinched_frame_at(0.9, 0.1), true, &feel())
            .is_none());
        assert!((slider.values.volume - held).abs() < 1e-9);
    }

    #[test]
    fn test_inbound_update_applies_unless_dragging() {
        let mut slider = confirmed_vertical_controller();
        slider.values.set_value(SliderTarget::Volume, 0.5);

        // Not dragging: inbound wins.
        slider.apply_inbound(&Inbound::SliderUpdate {
            target: SliderTarget::Volume,
            value: 0.9,
        });
        assert_eq!(slider.values.volume, 0.9);

        // Engage a drag, then race an inbound update: the gesture wins.
        slider.scrub(&pinched_frame_at(0.5, 0.6), true, &feel());
        slider.apply_inbound(&Inbound::SliderUpdate {
            target: SliderTarget::Volume,
            value: 0.1,
        });
        assert_eq!(slider.values.volume, 0.9);

        // A different target is still accepted mid-drag.
        slider.apply_inbound(&Inbound::SliderUpdate {
            target: SliderTarget::Brightness,
            value: 0.4,
        });
        assert_eq!(slider.values.brightness, 0.4);
    }

    #[test]
    fn test_presentation_state_respects_live_drag() {
        let mut slider = SliderController::new();
        let menu = MenuDef::builtin();
        slider.open_confirmed(SliderTarget::Presentation, &menu, &geometry(), Some(2));

        slider.apply_inbound(&Inbound::PresentationState {
            duration: 750.0,
            current_time: 100.0,
            playing: true,
        });
        assert_eq!(slider.values.playback.current_s, 100.0);
        assert!(slider.values.playback.playing);

        // Mid-drag the position stays under the gesture's control, but
        // duration/playing still update.
        slider.scrub(&pinched_frame_at(0.5, 0.5), true, &feel());
        slider.apply_inbound(&Inbound::PresentationState {
            duration: 750.0,
            current_time: 300.0,
            playing: false,
        });
        assert_eq!(slider.values.playback.current_s, 100.0);
        assert!(!slider.values.playback.playing);
    }

    #[test]
    fn test_presentation_readout() {
        // 0.4 of a 12.5-minute presentation reads 5:00.
        let mut playback = PlaybackState::default();
        playback.duration_s = 12.5 * 60.0;
        playback.current_s = 0.4 * playback.duration_s;
        assert_eq!(format_minutes(playback.fraction() * playback.total_minutes()), "5:00");
        assert_eq!(format_minutes(playback.total_minutes()), "12:30");
        assert_eq!(format_minutes(0.0), "0:00");
        assert_eq!(format_minutes(1.99), "1:59");
    }

    #[test]
    fn test_hide_clears_everything() {
        let mut slider = confirmed_vertical_controller();
        slider.scrub(&pinched_frame_at(0.5, 0.6), true, &feel());
        slider.exit();
        assert!(!slider.visible);
        assert!(!slider.preview);
        assert!(slider.preview_owner.is_none());
        assert!(slider.selected_target.is_none());
        assert!(slider.layout.is_none());
        assert!(slider.anchor.is_none());
        assert_eq!(slider.mode, UiMode::Menu);
    }

    #[test]
    fn test_toggle_playback_round_trip() {
        let mut slider = SliderController::new();
        assert_eq!(
            slider.toggle_playback(),
            Outbound::PresentationCommand {
                action: PresentationAction::Play
            }
        );
        assert!(slider.values.playback.playing);
        assert_eq!(
            slider.toggle_playback(),
            Outbound::PresentationCommand {
                action: PresentationAction::Pause
            }
        );
        assert!(!slider.values.playback.playing);
    }
}
