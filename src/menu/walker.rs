//! Hierarchy walker: from cursor polar coordinates to a hovered segment.
//!
//! A pure function of the tree, the confirmed selection chain, and the
//! cursor; levels whose ancestors are unselected (or point at leaves) are
//! simply inactive rather than an error.

use crate::config::MenuGeometry;
use crate::geometry::TAU;
use crate::menu::model::{MenuDef, MenuItem};

/// The angular slice and item set owned by one active level.
#[derive(Debug)]
pub struct AngleRange<'a> {
    pub start: f64,
    pub end: f64,
    pub items: &'a [MenuItem],
}

impl AngleRange<'_> {
    pub fn step(&self) -> f64 {
        (self.end - self.start) / self.items.len() as f64
    }
}

/// Walk the confirmed selections down to `level` and return its angular
/// range, or `None` while the level is inactive (an ancestor unselected or
/// without children).
pub fn angle_range_for_level<'a>(
    menu: &'a MenuDef,
    selections: &[Option<usize>],
    level: usize,
) -> Option<AngleRange<'a>> {
    let mut start = 0.0;
    let mut end = TAU;
    let mut items = menu.items.as_slice();

    for depth in 0..level {
        let selected = selections.get(depth).copied().flatten()?;
        let item = items.get(selected)?;
        let step = (end - start) / items.len() as f64;
        start += selected as f64 * step;
        end = start + step;
        items = item.children()?;
    }

    if items.is_empty() {
        return None;
    }
    Some(AngleRange { start, end, items })
}

/// Radial band `[inner, outer]` a level occupies: the inner disc for level
/// 0, one ring width per deeper level.
pub fn radial_band(geometry: &MenuGeometry, level: usize) -> (f64, f64) {
    if level == 0 {
        (0.0, geometry.main_radius)
    } else {
        let inner = geometry.main_radius + (level - 1) as f64 * geometry.ring_width;
        (inner, inner + geometry.ring_width)
    }
}

/// Segment index under the cursor at a level, or `None` when the cursor is
/// outside the level's radial band or angular range (or the level is
/// inactive).
pub fn hovered_segment(
    menu: &MenuDef,
    selections: &[Option<usize>],
    level: usize,
    cursor_distance: f64,
    cursor_angle: f64,
    geometry: &MenuGeometry,
) -> Option<usize> {
    let range = angle_range_for_level(menu, selections, level)?;

    let (inner, outer) = radial_band(geometry, level);
    if cursor_distance < inner || cursor_distance > outer {
        return None;
    }

    // cursor_angle is normalized to [0, 2π); the root range covers the full
    // circle, nested ranges never wrap.
    if cursor_angle < range.start || cursor_angle >= range.end {
        return None;
    }

    let index = ((cursor_angle - range.start) / range.step()) as usize;
    Some(index.min(range.items.len() - 1))
}

/// Whether the cursor sits inside the currently open ring span:
/// `[main_radius, main_radius + open_rings · ring_width]`.
pub fn in_submenu_ring(geometry: &MenuGeometry, cursor_distance: f64, open_rings: usize) -> bool {
    if open_rings == 0 {
        return false;
    }
    let inner = geometry.main_radius;
    let outer = geometry.main_radius + open_rings as f64 * geometry.ring_width;
    cursor_distance >= inner && cursor_distance <= outer
}
