use std::collections::HashSet;

use bevy::prelude::*;
use constants::catalog::{
    ANCHOR_ASSET, DEFAULT_BASE_FOLDER, DEFAULT_EXTENSION, INITIAL_ASSET, MENU_ASSETS,
    SIDE_BUTTON_ASSETS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Viewer manifest as a Bevy asset. Mirrors the JSON structure exactly.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct ViewerManifest {
    pub base_folder: String,
    pub extension: String,
    pub initial_asset: String,
    pub anchor_asset: String,
    pub menu_assets: Vec<String>,
    #[serde(default)]
    pub side_button_assets: Vec<String>,
}

/// Reasons a viewer manifest is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("menu asset list is empty")]
    EmptyMenu,
    #[error("asset `{0}` is listed more than once")]
    DuplicateAsset(String),
    #[error("initial asset `{0}` is not a menu entry")]
    UnknownInitialAsset(String),
    #[error("anchor asset `{0}` is not a menu entry")]
    UnknownAnchor(String),
    #[error("model base folder and extension must not be empty")]
    EmptyPath,
}

/// Fixed list of selectable assets and the rule mapping names to files.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    base_folder: String,
    extension: String,
    initial_asset: String,
    anchor_asset: String,
    menu_assets: Vec<String>,
    side_button_assets: Vec<String>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self {
            base_folder: DEFAULT_BASE_FOLDER.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            initial_asset: INITIAL_ASSET.to_string(),
            anchor_asset: ANCHOR_ASSET.to_string(),
            menu_assets: MENU_ASSETS.iter().map(|name| name.to_string()).collect(),
            side_button_assets: SIDE_BUTTON_ASSETS.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl AssetCatalog {
    /// Validate a manifest and turn it into a catalog.
    pub fn from_manifest(manifest: &ViewerManifest) -> Result<Self, CatalogError> {
        if manifest.menu_assets.is_empty() {
            return Err(CatalogError::EmptyMenu);
        }
        if manifest.base_folder.trim().is_empty() || manifest.extension.trim().is_empty() {
            return Err(CatalogError::EmptyPath);
        }

        let mut seen = HashSet::new();
        for name in manifest
            .menu_assets
            .iter()
            .chain(manifest.side_button_assets.iter())
        {
            if !seen.insert(name.as_str()) {
                return Err(CatalogError::DuplicateAsset(name.clone()));
            }
        }

        if !manifest.menu_assets.contains(&manifest.initial_asset) {
            return Err(CatalogError::UnknownInitialAsset(
                manifest.initial_asset.clone(),
            ));
        }
        if !manifest.menu_assets.contains(&manifest.anchor_asset) {
            return Err(CatalogError::UnknownAnchor(manifest.anchor_asset.clone()));
        }

        Ok(Self {
            base_folder: manifest.base_folder.trim_end_matches('/').to_string(),
            extension: manifest.extension.trim_start_matches('.').to_string(),
            initial_asset: manifest.initial_asset.clone(),
            anchor_asset: manifest.anchor_asset.clone(),
            menu_assets: manifest.menu_assets.clone(),
            side_button_assets: manifest.side_button_assets.clone(),
        })
    }

    /// Model file path for `name`, relative to the asset root.
    pub fn path_for(&self, name: &str) -> String {
        format!("{}/{}.{}", self.base_folder, name, self.extension)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all_assets().any(|candidate| candidate == name)
    }

    /// Whether selecting `name` in the menu reveals the side buttons.
    pub fn is_anchor(&self, name: &str) -> bool {
        self.anchor_asset == name
    }

    pub fn initial_asset(&self) -> &str {
        &self.initial_asset
    }

    pub fn anchor_asset(&self) -> &str {
        &self.anchor_asset
    }

    pub fn menu_assets(&self) -> &[String] {
        &self.menu_assets
    }

    pub fn side_button_assets(&self) -> &[String] {
        &self.side_button_assets
    }

    pub fn all_assets(&self) -> impl Iterator<Item = &str> {
        self.menu_assets
            .iter()
            .chain(self.side_button_assets.iter())
            .map(String::as_str)
    }
}
