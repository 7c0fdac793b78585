//! The static menu tree.
//!
//! Loaded once at startup from a JSON definition (or the built-in default)
//! and immutable afterwards. Tree depth decides how many interaction levels
//! exist at runtime.

use serde::Deserialize;

use crate::link::protocol::SliderTarget;

/// One node of the menu tree.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItem {
    pub label: String,
    #[serde(flatten)]
    pub kind: ItemKind,
}

/// What selecting an item does.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    /// Opens a deeper ring of children.
    Menu { children: Vec<MenuItem> },
    /// Hands off to the slider sub-mode for a controller-backed value.
    Slider { target: SliderTarget },
    /// Terminal action, dispatched out of band by name.
    Action { action: String },
}

impl MenuItem {
    pub fn children(&self) -> Option<&[MenuItem]> {
        match &self.kind {
            ItemKind::Menu { children } if !children.is_empty() => Some(children),
            _ => None,
        }
    }

    pub fn slider_target(&self) -> Option<SliderTarget> {
        match &self.kind {
            ItemKind::Slider { target } => Some(*target),
            _ => None,
        }
    }
}

/// The whole menu definition.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuDef {
    pub items: Vec<MenuItem>,
}

impl MenuDef {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of interaction levels the tree can open.
    pub fn depth(&self) -> usize {
        fn depth_of(items: &[MenuItem]) -> usize {
            1 + items
                .iter()
                .filter_map(MenuItem::children)
                .map(depth_of)
                .max()
                .unwrap_or(0)
        }
        depth_of(&self.items)
    }

    /// Resolve an index path from the root. `None` if any index is out of
    /// range or descends through a non-menu item.
    pub fn item_at(&self, path: &[usize]) -> Option<&MenuItem> {
        let mut items = self.items.as_slice();
        let mut found = None;
        for &index in path {
            let item = items.get(index)?;
            items = item.children().unwrap_or(&[]);
            found = Some(item);
        }
        found
    }

    /// Index of the root item that directly owns a slider target, used for
    /// slider placement.
    pub fn main_index_for_target(&self, target: SliderTarget) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.slider_target() == Some(target))
    }

    /// The built-in menu used when no definition file is supplied.
    pub fn builtin() -> Self {
        fn menu(label: &str, children: Vec<MenuItem>) -> MenuItem {
            MenuItem {
                label: label.to_string(),
                kind: ItemKind::Menu { children },
            }
        }
        fn slider(label: &str, target: SliderTarget) -> MenuItem {
            MenuItem {
                label: label.to_string(),
                kind: ItemKind::Slider { target },
            }
        }
        fn action(label: &str, name: &str) -> MenuItem {
            MenuItem {
                label: label.to_string(),
                kind: ItemKind::Action {
                    action: name.to_string(),
                },
            }
        }

        Self {
            items: vec![
                slider("Volume", SliderTarget::Volume),
                menu(
                    "Display",
                    vec![
                        slider("Brightness", SliderTarget::Brightness),
                        slider("Vibration", SliderTarget::Vibration),
                    ],
                ),
                menu(
                    "Playback",
                    vec![
                        slider("Seek", SliderTarget::Presentation),
                        action("Play/Pause", "play_pause"),
                    ],
                ),
                action("Mute", "mute"),
                action("Blackout", "blackout"),
            ],
        }
    }
}
