use bevy::prelude::*;

use crate::engine::assets::catalog::AssetCatalog;

// Resources
#[derive(Resource, Debug, Default)]
pub struct MenuState {
    pub expanded: bool,
    pub selected_entry: Option<String>,
}

impl MenuState {
    /// Open or close the menu body, returning the new expanded state.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn collapse(&mut self) {
        if self.expanded {
            self.expanded = false;
        }
    }

    /// Record a menu entry selection. Returns whether the side buttons
    /// should be shown, which is only the case for the anchor entry.
    pub fn select(&mut self, name: &str, catalog: &AssetCatalog) -> bool {
        self.selected_entry = Some(name.to_string());
        catalog.is_anchor(name)
    }
}

#[derive(Resource, Debug, Default)]
pub struct SideButtonState {
    pub visible: bool,
}

/// Whether the cursor is over any viewer UI that should swallow mouse input.
#[derive(Resource, Debug, Default, PartialEq, Eq)]
pub struct PointerOverUi(pub bool);

// Components
#[derive(Component)]
pub struct MenuRoot;
#[derive(Component)]
pub struct MenuTitle;
#[derive(Component)]
pub struct MenuTitleLabel;
#[derive(Component)]
pub struct MenuBody;
#[derive(Component)]
pub struct MenuEntry(pub String);
#[derive(Component)]
pub struct AnchorEntry;
#[derive(Component)]
pub struct SideButton {
    pub index: usize,
    pub asset: String,
}

/// UI region counted as "inside the menu" for outside-click collapse.
#[derive(Component)]
pub struct MenuRegion;

/// UI region under which orbit drags and wheel dolly are ignored.
#[derive(Component)]
pub struct BlocksOrbit;
