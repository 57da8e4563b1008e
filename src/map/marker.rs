use bevy::prelude::*;

use crate::annotate::EventCategory;
use crate::constants::{
    CATEGORY_ICON_ANCHOR, CATEGORY_ICON_SIZE, CATEGORY_POPUP_ANCHOR, DEFAULT_PIN_ANCHOR,
    DEFAULT_PIN_PATH, DEFAULT_PIN_POPUP_ANCHOR, DEFAULT_PIN_SIZE,
};
use crate::icons::IconLibrary;
use crate::theme;

use super::geo::LatLng;
use super::popup::{toggle_popup, Popup, PopupContent};
use super::view::{MapView, MarkerClicked};

/// Z for marker sprites; tiles sit at 0.
const MARKER_Z: f32 = 10.0;

/// Pins an entity to a geographic position. Its transform is recomputed from
/// the [`MapView`] every frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct GeoAnchor(pub LatLng);

/// How a marker image is sized and where its hot-spot is.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    /// Asset path relative to `assets/`
    pub path: String,
    pub size: Vec2,
    /// Hot-spot measured from the top-left corner (y down)
    pub anchor: Vec2,
    /// Popup tip relative to the hot-spot (y down)
    pub popup_anchor: Vec2,
    /// Fill for the generated fallback pin when the image is missing
    pub fallback_color: [u8; 4],
}

impl IconSpec {
    pub fn category(category: EventCategory) -> Self {
        Self {
            path: category.icon_path().to_string(),
            size: CATEGORY_ICON_SIZE.into(),
            anchor: CATEGORY_ICON_ANCHOR.into(),
            popup_anchor: CATEGORY_POPUP_ANCHOR.into(),
            fallback_color: category.color(),
        }
    }

    pub fn default_pin() -> Self {
        Self {
            path: DEFAULT_PIN_PATH.to_string(),
            size: DEFAULT_PIN_SIZE.into(),
            anchor: DEFAULT_PIN_ANCHOR.into(),
            popup_anchor: DEFAULT_PIN_POPUP_ANCHOR.into(),
            fallback_color: theme::DEFAULT_PIN_RGBA,
        }
    }

    /// Offset from the hot-spot to the sprite center in world space (y up).
    pub fn center_offset(&self) -> Vec2 {
        Vec2::new(
            self.size.x / 2.0 - self.anchor.x,
            self.anchor.y - self.size.y / 2.0,
        )
    }

    /// Window-space rectangle covered by the icon when its hot-spot is at
    /// `hotspot`.
    pub fn screen_rect(&self, hotspot: Vec2) -> Rect {
        let min = hotspot - self.anchor;
        Rect::from_corners(min, min + self.size)
    }

    /// Window position of the popup tip.
    pub fn popup_tip(&self, hotspot: Vec2) -> Vec2 {
        hotspot + self.popup_anchor
    }
}

#[derive(Component, Debug, Clone)]
pub struct MapMarker {
    pub icon: IconSpec,
    /// `None` for markers that are not event annotations ("you are here")
    pub category: Option<EventCategory>,
}

/// Add a marker with an icon and a bound popup.
#[derive(Message, Debug, Clone)]
pub struct PlaceMarkerRequest {
    pub position: LatLng,
    pub icon: IconSpec,
    pub popup: PopupContent,
    pub open_popup: bool,
    pub category: Option<EventCategory>,
}

/// The display list: every event marker placed this session, in creation
/// order. Entries are never removed.
#[derive(Resource, Default, Debug)]
pub struct MarkerList {
    entities: Vec<Entity>,
}

impl MarkerList {
    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

pub fn spawn_markers(
    mut commands: Commands,
    mut requests: MessageReader<PlaceMarkerRequest>,
    mut icons: ResMut<IconLibrary>,
    asset_server: Res<AssetServer>,
    view: Res<MapView>,
    mut marker_list: ResMut<MarkerList>,
    mut popups: Query<&mut Popup>,
) {
    for request in requests.read() {
        if request.open_popup {
            for mut popup in popups.iter_mut() {
                popup.open = false;
            }
        }

        let image = icons.handle(&asset_server, &request.icon.path);
        let translation =
            (view.geo_to_world(request.position) + request.icon.center_offset()).extend(MARKER_Z);

        let entity = commands
            .spawn((
                Sprite {
                    image,
                    custom_size: Some(request.icon.size),
                    ..default()
                },
                Transform::from_translation(translation),
                GeoAnchor(request.position),
                MapMarker {
                    icon: request.icon.clone(),
                    category: request.category,
                },
                Popup {
                    content: request.popup.clone(),
                    open: request.open_popup,
                },
            ))
            .id();

        if let Some(category) = request.category {
            marker_list.push(entity);
            info!(
                "Placed {} marker #{} at {}: {}",
                category.key(),
                marker_list.len(),
                request.position.format_short(),
                request.popup.to_html()
            );
        } else {
            debug!("Placed marker at {}", request.position.format_short());
        }
    }
}

/// Recompute the transform of every anchored marker from the current view.
pub fn sync_marker_transforms(
    view: Res<MapView>,
    mut markers: Query<(&GeoAnchor, &MapMarker, &mut Transform)>,
) {
    for (anchor, marker, mut transform) in markers.iter_mut() {
        let position = view.geo_to_world(anchor.0) + marker.icon.center_offset();
        // Southern markers draw over northern ones
        let z = MARKER_Z + (1.0 - (anchor.0.lat as f32 + 90.0) / 180.0);
        let translation = position.extend(z);
        if transform.translation != translation {
            transform.translation = translation;
        }
    }
}

pub fn handle_marker_clicks(
    mut clicks: MessageReader<MarkerClicked>,
    mut popups: Query<(Entity, &mut Popup)>,
) {
    for click in clicks.read() {
        toggle_popup(click.entity, &mut popups);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_icon_geometry() {
        let icon = IconSpec::category(EventCategory::Police);
        assert_eq!(icon.path, "icons/police.png");
        assert_eq!(icon.size, Vec2::new(30.0, 30.0));
        assert_eq!(icon.anchor, Vec2::new(15.0, 30.0));
        assert_eq!(icon.popup_anchor, Vec2::new(0.0, -30.0));
    }

    #[test]
    fn test_center_offset_bottom_anchored() {
        // Hot-spot at bottom-center: sprite center sits half a height above it
        let icon = IconSpec::category(EventCategory::Clash);
        assert_eq!(icon.center_offset(), Vec2::new(0.0, 15.0));
    }

    #[test]
    fn test_default_pin_offset() {
        let icon = IconSpec::default_pin();
        assert_eq!(icon.center_offset(), Vec2::new(0.5, 20.5));
    }

    #[test]
    fn test_screen_rect_covers_icon() {
        let icon = IconSpec::category(EventCategory::ActiveProtest);
        let rect = icon.screen_rect(Vec2::new(100.0, 100.0));
        assert_eq!(rect.min, Vec2::new(85.0, 70.0));
        assert_eq!(rect.max, Vec2::new(115.0, 100.0));
        assert!(rect.contains(Vec2::new(100.0, 90.0)));
        assert!(!rect.contains(Vec2::new(100.0, 110.0)));
    }

    #[test]
    fn test_popup_tip_above_icon() {
        let icon = IconSpec::category(EventCategory::FutureProtest);
        assert_eq!(icon.popup_tip(Vec2::new(50.0, 50.0)), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_marker_list_keeps_duplicates() {
        let mut list = MarkerList::default();
        assert!(list.is_empty());
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        list.push(entity);
        list.push(entity);
        assert_eq!(list.len(), 2);
        assert_eq!(list.entities, vec![entity, entity]);
    }
}
