//! Detects marker icons that fail to load and swaps in a generated pin.

use std::path::PathBuf;

use bevy::asset::io::file::FileAssetReader;
use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::map::MapMarker;

use super::IconLibrary;

/// Marks a marker whose icon file could not be loaded.
#[derive(Component, Debug)]
pub struct MissingIcon;

/// Where Bevy's file reader looks for `path`: the asset folder under
/// `BEVY_ASSET_ROOT`, the cargo manifest directory or the executable's
/// directory, not the working directory.
pub fn icon_file_path(path: &str) -> PathBuf {
    FileAssetReader::get_base_path()
        .join(AssetPlugin::default().file_path)
        .join(path)
}

/// Runs on markers not yet flagged; a failed load or a file that does not
/// exist in the asset folder replaces the sprite image with a fallback pin in the
/// marker's color. The sprite keeps its icon size and anchor.
pub fn detect_missing_icons(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut icons: ResMut<IconLibrary>,
    mut images: ResMut<Assets<Image>>,
    mut query: Query<(Entity, &MapMarker, &mut Sprite), Without<MissingIcon>>,
) {
    for (entity, marker, mut sprite) in query.iter_mut() {
        let missing = match asset_server.load_state(&sprite.image) {
            LoadState::Failed(err) => {
                warn!("Icon failed to load: {} ({})", marker.icon.path, err);
                true
            }
            LoadState::NotLoaded => {
                let full_path = icon_file_path(&marker.icon.path);
                if full_path.exists() {
                    false
                } else {
                    warn!(
                        "Icon file not found: {} (checked: {:?})",
                        marker.icon.path, full_path
                    );
                    true
                }
            }
            LoadState::Loading | LoadState::Loaded => false,
        };

        if missing {
            sprite.image = icons.fallback(&mut images, marker.icon.fallback_color);
            commands.entity(entity).insert(MissingIcon);
        }
    }
}
