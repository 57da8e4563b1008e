//! The map surface: view state, tiles, markers, circles and popups.
//!
//! Other plugins talk to the map through messages:
//!
//! - [`PlaceMarkerRequest`]: add a marker with an icon and a bound popup
//! - [`AddCircleRequest`]: add a ground-radius circle
//! - [`MapPointerEvent`]: emitted for primary-button presses on the bare map

mod circle;
mod geo;
mod marker;
mod popup;
mod tiles;
mod view;

pub use circle::{AddCircleRequest, OverlayGizmoGroup};
pub use geo::{fit_zoom, LatLng};
pub use marker::{GeoAnchor, IconSpec, MapMarker, MarkerList, PlaceMarkerRequest};
pub use popup::{Popup, PopupContent};
pub use tiles::{TileCache, TileSource};
pub use view::{MapPointerEvent, MapView};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded, TileLayerConfig};
use crate::constants::MAX_SUPPORTED_ZOOM;

/// Pointer, wheel and keyboard handling on the map. Systems consuming
/// [`MapPointerEvent`] run after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapInputSet;

/// Ordered zoom limits for `layer`, capped at [`MAX_SUPPORTED_ZOOM`].
fn zoom_limits(layer: &TileLayerConfig) -> (u8, u8) {
    let (mut min_zoom, mut max_zoom) = if layer.min_zoom <= layer.max_zoom {
        (layer.min_zoom, layer.max_zoom)
    } else {
        warn!(
            "Tile layer min_zoom {} is above max_zoom {}, swapping",
            layer.min_zoom, layer.max_zoom
        );
        (layer.max_zoom, layer.min_zoom)
    };
    if max_zoom > MAX_SUPPORTED_ZOOM {
        warn!(
            "Tile layer max_zoom {} is above {}, capping",
            max_zoom, MAX_SUPPORTED_ZOOM
        );
        max_zoom = MAX_SUPPORTED_ZOOM;
        min_zoom = min_zoom.min(MAX_SUPPORTED_ZOOM);
    }
    (min_zoom, max_zoom)
}

/// Apply the configured tile layer and initial view.
fn apply_map_config(
    config: Res<AppConfig>,
    mut view: ResMut<MapView>,
    mut source: ResMut<TileSource>,
) {
    let layer = &config.data.tile_layer;
    let (min_zoom, max_zoom) = zoom_limits(layer);

    view.min_zoom = min_zoom;
    view.max_zoom = max_zoom;
    // set_view clamps the initial zoom into the limits above
    view.set_view(config.data.initial_view.center, config.data.initial_view.zoom);
    source.layer = TileLayerConfig {
        min_zoom,
        max_zoom,
        ..layer.clone()
    };

    info!(
        "Map view at {} zoom {} using {}",
        view.center.format_short(),
        view.zoom,
        source.layer.url_template
    );
}

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapView>()
            .init_resource::<view::MapPointer>()
            .init_resource::<TileSource>()
            .init_resource::<TileCache>()
            .init_resource::<MarkerList>()
            .init_gizmo_group::<OverlayGizmoGroup>()
            .add_message::<PlaceMarkerRequest>()
            .add_message::<AddCircleRequest>()
            .add_message::<MapPointerEvent>()
            .add_message::<view::MarkerClicked>()
            .add_systems(
                Startup,
                (view::spawn_camera, apply_map_config.after(ConfigLoaded)),
            )
            .add_systems(
                Update,
                (
                    view::track_viewport_size,
                    view::handle_map_pointer,
                    view::handle_scroll_zoom,
                    view::handle_zoom_keys,
                )
                    .chain()
                    .in_set(MapInputSet),
            )
            .add_systems(
                Update,
                (
                    tiles::poll_tile_fetches,
                    tiles::update_visible_tiles,
                    tiles::position_tiles,
                )
                    .chain()
                    .after(MapInputSet),
            )
            .add_systems(
                Update,
                (
                    marker::spawn_markers.run_if(on_message::<PlaceMarkerRequest>),
                    circle::spawn_circles.run_if(on_message::<AddCircleRequest>),
                    marker::handle_marker_clicks.run_if(on_message::<view::MarkerClicked>),
                    marker::sync_marker_transforms,
                    circle::render_circles,
                )
                    .chain()
                    .after(MapInputSet),
            );
    }
}
