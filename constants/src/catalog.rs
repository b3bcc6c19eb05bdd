/// Manifest loaded at startup, relative to the asset root.
pub const MANIFEST_PATH: &str = "viewer_manifest.json";

/// Folder holding the model files, relative to the asset root.
pub const DEFAULT_BASE_FOLDER: &str = "models";

/// Model file extension. Models are shipped as binary glTF.
pub const DEFAULT_EXTENSION: &str = "glb";

/// Asset displayed at startup.
pub const INITIAL_ASSET: &str = "Samba Dancing";

/// Menu entry that reveals the side buttons when selected.
pub const ANCHOR_ASSET: &str = "Samba Dancing";

/// Entries of the right-side menu, in display order.
pub const MENU_ASSETS: &[&str] = &[
    "Samba Dancing",
    "morph_test",
    "monkey",
    "monkey_embedded_texture",
    "vCube",
];

/// Assets reachable from the side buttons, top to bottom.
pub const SIDE_BUTTON_ASSETS: &[&str] = &[
    "X Bot",
    "Punching",
    "Bboy Uprock Start",
    "Silly Dancing",
    "Jumping Down",
    "Taunt",
];
