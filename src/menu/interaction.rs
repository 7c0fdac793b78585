//! The layered hover/dwell/selection state machine.
//!
//! One `LevelState` per menu depth, processed outer to inner each frame:
//! idle (no hover) → hovering (dwell filling) → confirmed (selected). A
//! level falls back to idle when its hovered index changes or an ancestor
//! loses its selection; a grab gesture short-circuits any running fill.

use tracing::debug;

use crate::dwell::DwellTimer;
use crate::config::MenuGeometry;
use crate::link::protocol::SliderTarget;
use crate::menu::model::{ItemKind, MenuDef};
use crate::menu::walker;

/// Per-level interaction state.
#[derive(Debug, Clone, Default)]
pub struct LevelState {
    pub hover: Option<usize>,
    pub selected: Option<usize>,
    pub dwell: DwellTimer,
    pub dwell_triggered: bool,
    pub previous_hover: Option<usize>,
}

impl LevelState {
    fn clear_hover(&mut self) {
        self.hover = None;
        self.dwell.reset();
        self.dwell_triggered = false;
    }

    fn clear(&mut self) {
        self.clear_hover();
        self.selected = None;
        self.previous_hover = None;
    }
}

/// Everything a single interaction update needs from the outside.
pub struct FrameInput<'a> {
    pub menu: &'a MenuDef,
    pub geometry: &'a MenuGeometry,
    pub now_ms: f64,
    pub hover_fill_ms: f64,
    pub hand_detected: bool,
    pub grabbing: bool,
    pub cursor_distance: f64,
    pub cursor_angle: f64,
    /// Level-0 hover as computed by the walker against the absolute cursor.
    pub level0_hover: Option<usize>,
    /// Whether a slider (preview or confirmed) is currently showing; a
    /// visible slider pins the main selection in place.
    pub slider_visible: bool,
}

/// What a confirmed selection resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// A menu item: the next ring opens, nothing external happens.
    Submenu,
    /// Hand off to the slider sub-mode.
    OpenSlider { target: SliderTarget },
    /// Terminal action, dispatched out of band by name.
    Action { name: String },
}

/// A dwell (or grab-confirmed) selection that fired this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired {
    pub level: usize,
    pub index: usize,
    pub label: String,
    pub outcome: SelectionOutcome,
}

/// Identifies which hover a slider preview belongs to, so the preview can
/// be torn down the moment that hover no longer matches.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOwner {
    pub level: usize,
    /// Confirmed ancestor indices plus the hovered index at `level`.
    pub path: Vec<usize>,
}

/// A request to show (or keep showing) a slider preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRequest {
    pub target: SliderTarget,
    pub owner: PreviewOwner,
}

/// The whole layered machine.
#[derive(Debug, Clone)]
pub struct InteractionState {
    levels: Vec<LevelState>,
}

impl InteractionState {
    pub fn new(depth: usize) -> Self {
        Self {
            levels: (0..depth.max(1)).map(|_| LevelState::default()).collect(),
        }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, level: usize) -> &LevelState {
        &self.levels[level]
    }

    /// Per-level `selected` values, the shape the walker consumes.
    pub fn selection_options(&self) -> Vec<Option<usize>> {
        self.levels.iter().map(|l| l.selected).collect()
    }

    /// Deepest level holding a confirmed selection.
    pub fn deepest_selected_level(&self) -> Option<usize> {
        (0..self.levels.len())
            .rev()
            .find(|&l| self.levels[l].selected.is_some())
    }

    /// How many concentric rings are currently open.
    pub fn open_ring_count(&self) -> usize {
        self.deepest_selected_level().map_or(0, |l| l + 1)
    }

    /// Confirmed selection chain through `level` inclusive; `None` if any
    /// link is missing.
    fn confirmed_path(&self, level: usize) -> Option<Vec<usize>> {
        (0..=level).map(|d| self.levels[d].selected).collect()
    }

    /// Confirmed chain strictly above `level`.
    fn confirmed_prefix(&self, level: usize) -> Option<Vec<usize>> {
        (0..level).map(|d| self.levels[d].selected).collect()
    }

    /// Drop every hover, selection, and timer — the no-hand collapse.
    pub fn collapse(&mut self) {
        for level in &mut self.levels {
            level.clear();
        }
    }

    /// One frame of the interaction contract. Returns the selection that
    /// fired, if any.
    pub fn update(&mut self, input: &FrameInput) -> Option<Fired> {
        let depth = self.levels.len();

        // Fresh hovers. Level 0 is supplied by the caller; deeper levels
        // need a confirmed parent and a detected hand, and a cleared level
        // blocks everything beneath it for the rest of the frame.
        self.levels[0].hover = input.level0_hover;
        let mut blocked = false;
        for level in 1..depth {
            let parent_selected = self.levels[level - 1].selected.is_some();
            if blocked || !input.hand_detected || !parent_selected {
                blocked = true;
                self.levels[level].clear_hover();
                continue;
            }
            let selections = self.selection_options();
            self.levels[level].hover = walker::hovered_segment(
                input.menu,
                &selections,
                level,
                input.cursor_distance,
                input.cursor_angle,
                input.geometry,
            );
        }

        // Slide-off: a confirmed main pick is dropped when the cursor moved
        // to a different main segment and is not browsing the open ring.
        if self.levels[0].selected.is_some()
            && !input.slider_visible
            && self.levels[0].hover != self.levels[0].previous_hover
            && !walker::in_submenu_ring(
                input.geometry,
                input.cursor_distance,
                self.open_ring_count(),
            )
        {
            debug!("main selection dropped: cursor moved off the segment");
            self.levels[0].selected = None;
        }

        // Dwell evaluation, outer to inner.
        let mut fired = None;
        for level in 0..depth {
            // While a deeper segment is hovered, this level's fill is
            // frozen rather than restarted.
            if self.levels[level + 1..].iter().any(|l| l.hover.is_some()) {
                continue;
            }

            let parent_unselected = level > 0 && self.levels[level - 1].selected.is_none();
            let state = &self.levels[level];
            let needs_reset = parent_unselected
                || state.hover.is_none()
                || state.hover != state.previous_hover;
            let bypass = input.grabbing || state.dwell_triggered;

            let state = &mut self.levels[level];
            if needs_reset {
                state.dwell_triggered = false;
            }
            let complete =
                state
                    .dwell
                    .evaluate(!needs_reset, bypass, input.now_ms, input.hover_fill_ms);
            if !complete || state.dwell_triggered {
                continue;
            }

            state.dwell_triggered = true;
            state.selected = state.hover;
            let Some(index) = state.hover else { continue };

            let Some(path) = self.confirmed_path(level) else { continue };
            match input.menu.item_at(&path) {
                Some(item) => {
                    let outcome = match &item.kind {
                        ItemKind::Menu { .. } => SelectionOutcome::Submenu,
                        ItemKind::Slider { target } => SelectionOutcome::OpenSlider {
                            target: *target,
                        },
                        ItemKind::Action { action } => SelectionOutcome::Action {
                            name: action.clone(),
                        },
                    };
                    debug!(level, index, label = %item.label, "selection confirmed");
                    fired = Some(Fired {
                        level,
                        index,
                        label: item.label.clone(),
                        outcome,
                    });
                }
                None => {
                    debug!(level, index, "confirmed selection resolves to no item; ignored");
                }
            }
        }

        // End-of-frame bookkeeping: next frame compares against this one.
        for state in &mut self.levels {
            state.previous_hover = state.hover;
        }

        fired
    }

    /// The slider preview the current hovers call for, if any: a dwell
    /// strictly in progress over a slider-kind item.
    pub fn preview_request(&self, menu: &MenuDef) -> Option<PreviewRequest> {
        for (level, state) in self.levels.iter().enumerate() {
            if !state.dwell.in_progress() {
                continue;
            }
            let Some(hover) = state.hover else { continue };
            let Some(mut path) = self.confirmed_prefix(level) else { continue };
            path.push(hover);
            let Some(item) = menu.item_at(&path) else { continue };
            if let Some(target) = item.slider_target() {
                return Some(PreviewRequest {
                    target,
                    owner: PreviewOwner { level, path },
                });
            }
        }
        None
    }

    /// Whether a preview owner still matches the live hover/selection
    /// chain.
    pub fn owner_still_hovered(&self, owner: &PreviewOwner) -> bool {
        if owner.path.len() != owner.level + 1 {
            return false;
        }
        let Some(state) = self.levels.get(owner.level) else {
            return false;
        };
        if state.hover != owner.path.last().copied() {
            return false;
        }
        (0..owner.level).all(|d| self.levels[d].selected == Some(owner.path[d]))
    }
}
