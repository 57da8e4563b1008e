//! Marker icon images: loaded once per path and shared between markers,
//! with generated pins standing in for icons that cannot be loaded.

mod placeholder;
mod validation;

use std::collections::HashMap;

use bevy::prelude::*;

/// Loaded icon handles by asset path, and generated fallback pins by color.
#[derive(Resource, Default)]
pub struct IconLibrary {
    loaded: HashMap<String, Handle<Image>>,
    fallbacks: HashMap<[u8; 4], Handle<Image>>,
}

impl IconLibrary {
    /// Handle for the icon at `path` (relative to `assets/`), loading it on
    /// first use.
    pub fn handle(&mut self, asset_server: &AssetServer, path: &str) -> Handle<Image> {
        if let Some(handle) = self.loaded.get(path) {
            return handle.clone();
        }
        debug!("Loading icon {}", path);
        let handle: Handle<Image> = asset_server.load(path.to_string());
        self.loaded.insert(path.to_string(), handle.clone());
        handle
    }

    /// Generated pin in `color`, created on first use.
    pub fn fallback(&mut self, images: &mut Assets<Image>, color: [u8; 4]) -> Handle<Image> {
        self.fallbacks
            .entry(color)
            .or_insert_with(|| images.add(placeholder::create_pin_image(color)))
            .clone()
    }
}

pub struct IconsPlugin;

impl Plugin for IconsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<IconLibrary>().add_systems(
            Update,
            validation::detect_missing_icons.after(crate::map::MapInputSet),
        );
    }
}
