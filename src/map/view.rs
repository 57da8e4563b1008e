//! Map view state, camera and the pan/zoom interaction.
//!
//! The camera never moves. Everything that is placed on the map is
//! re-positioned relative to [`MapView::center`] each frame, which keeps
//! world coordinates small and f32-safe at every zoom level. One world unit
//! is one logical pixel.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::{
    DEFAULT_CENTER, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH, DEFAULT_ZOOM, DRAG_START_DISTANCE,
};
use crate::ui::DialogState;

use super::geo::{from_pixel, meters_per_pixel, to_pixel, world_size, LatLng, MAX_LATITUDE};
use super::marker::{MapMarker, GeoAnchor};

#[derive(Component)]
pub struct MapCamera;

/// Center, zoom and viewport of the visible map.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Logical size of the window the map is drawn into.
    pub viewport: Vec2,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER.into(),
            zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            viewport: Vec2::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }
}

impl MapView {
    /// Absolute pixel position of the view center at the current zoom.
    pub fn center_pixel(&self) -> DVec2 {
        to_pixel(self.center, self.zoom)
    }

    /// Pixel offset of `pos` from the view center, picking the copy of the
    /// world closest to the center.
    fn pixel_offset(&self, pos: LatLng) -> DVec2 {
        let size = world_size(self.zoom);
        let mut offset = to_pixel(pos, self.zoom) - self.center_pixel();
        offset.x = (offset.x + size / 2.0).rem_euclid(size) - size / 2.0;
        offset
    }

    /// Geographic position under a window position (origin top-left, y down).
    pub fn screen_to_geo(&self, screen: Vec2) -> LatLng {
        let offset = screen.as_dvec2() - self.viewport.as_dvec2() / 2.0;
        from_pixel(self.center_pixel() + offset, self.zoom).wrapped()
    }

    /// Window position of a geographic position.
    pub fn geo_to_screen(&self, pos: LatLng) -> Vec2 {
        (self.pixel_offset(pos) + self.viewport.as_dvec2() / 2.0).as_vec2()
    }

    /// World (camera) position of a geographic position: origin at the view
    /// center, y up.
    pub fn geo_to_world(&self, pos: LatLng) -> Vec2 {
        let offset = self.pixel_offset(pos);
        Vec2::new(offset.x as f32, -offset.y as f32)
    }

    /// Length in pixels of `meters` on the ground at `lat`.
    pub fn meters_to_pixels(&self, meters: f64, lat: f64) -> f32 {
        (meters / meters_per_pixel(lat, self.zoom)) as f32
    }

    /// Move the map so that content follows a pointer moved by `delta`.
    pub fn pan_by(&mut self, delta: Vec2) {
        let pixel = self.center_pixel() - delta.as_dvec2();
        self.center = clamp_latitude(from_pixel(pixel, self.zoom).wrapped());
    }

    /// Change zoom, keeping the position under `screen` fixed.
    pub fn zoom_around(&mut self, screen: Vec2, zoom: u8) {
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if zoom == self.zoom {
            return;
        }

        let anchor = self.screen_to_geo(screen);
        let offset = screen.as_dvec2() - self.viewport.as_dvec2() / 2.0;
        self.zoom = zoom;
        let pixel = to_pixel(anchor, zoom) - offset;
        self.center = clamp_latitude(from_pixel(pixel, zoom).wrapped());
    }

    /// Jump to a center and zoom.
    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = clamp_latitude(center.wrapped());
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn zoom_in(&mut self) {
        let center = self.viewport / 2.0;
        self.zoom_around(center, self.zoom.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        let center = self.viewport / 2.0;
        self.zoom_around(center, self.zoom.saturating_sub(1));
    }
}

fn clamp_latitude(pos: LatLng) -> LatLng {
    LatLng::new(pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), pos.lng)
}

/// Pointer gestures the map reports to other plugins, in the order they
/// happened.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum MapPointerEvent {
    /// Primary button went down on the bare map.
    Down { position: LatLng },
    /// Primary button was released after a `Down`.
    Up,
}

/// Tracks the current primary-button press.
#[derive(Resource, Default, Debug)]
pub struct MapPointer {
    /// Where the press started, in window coordinates
    pub press_origin: Option<Vec2>,
    /// Last cursor position seen while pressed
    pub last_cursor: Option<Vec2>,
    /// True once the pointer moved far enough to pan the map
    pub dragging: bool,
    /// Marker under the pointer when the press started
    pub pressed_marker: Option<Entity>,
    /// Whether a `Down` event was emitted for this press
    pub reported_down: bool,
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MapCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Keep [`MapView::viewport`] in sync with the primary window size.
pub fn track_viewport_size(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut view: ResMut<MapView>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if view.viewport != size {
        view.viewport = size;
    }
}

/// Topmost marker whose icon covers `screen`.
pub fn marker_at(
    view: &MapView,
    screen: Vec2,
    markers: &Query<(Entity, &GeoAnchor, &MapMarker)>,
) -> Option<Entity> {
    markers
        .iter()
        .filter(|(_, anchor, marker)| {
            marker
                .icon
                .screen_rect(view.geo_to_screen(anchor.0))
                .contains(screen)
        })
        .max_by(|(_, a, _), (_, b, _)| {
            // Leaflet stacks southern markers on top
            view.geo_to_screen(a.0)
                .y
                .total_cmp(&view.geo_to_screen(b.0).y)
        })
        .map(|(entity, _, _)| entity)
}

/// Primary-button handling: press/release reporting, drag to pan, and
/// routing presses on markers to popups.
#[allow(clippy::too_many_arguments)]
pub fn handle_map_pointer(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    dialog_state: Res<DialogState>,
    markers: Query<(Entity, &GeoAnchor, &MapMarker)>,
    mut view: ResMut<MapView>,
    mut pointer: ResMut<MapPointer>,
    mut events: MessageWriter<MapPointerEvent>,
    mut clicked: MessageWriter<MarkerClicked>,
    mut contexts: EguiContexts,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let cursor = window.cursor_position();

    if mouse_button.just_pressed(MouseButton::Left) && pointer.press_origin.is_none() {
        let over_ui = contexts
            .ctx_mut()
            .map(|ctx| ctx.is_pointer_over_area())
            .unwrap_or(false);

        if let Some(cursor) = cursor
            && !over_ui
            && !dialog_state.any_modal_open
        {
            pointer.press_origin = Some(cursor);
            pointer.last_cursor = Some(cursor);
            pointer.dragging = false;
            pointer.pressed_marker = marker_at(&view, cursor, &markers);
            pointer.reported_down = pointer.pressed_marker.is_none();

            if pointer.reported_down {
                events.write(MapPointerEvent::Down {
                    position: view.screen_to_geo(cursor),
                });
            }
        }
    }

    let Some(origin) = pointer.press_origin else {
        return;
    };

    if mouse_button.pressed(MouseButton::Left) {
        if let (Some(cursor), Some(last)) = (cursor, pointer.last_cursor) {
            if !pointer.dragging && cursor.distance(origin) > DRAG_START_DISTANCE {
                pointer.dragging = true;
            }
            if pointer.dragging && cursor != last {
                view.pan_by(cursor - last);
            }
            pointer.last_cursor = Some(cursor);
        }
    }

    if mouse_button.just_released(MouseButton::Left) || !mouse_button.pressed(MouseButton::Left) {
        if pointer.reported_down {
            events.write(MapPointerEvent::Up);
        }

        if let Some(entity) = pointer.pressed_marker
            && !pointer.dragging
            && cursor.is_some_and(|c| marker_at(&view, c, &markers) == Some(entity))
        {
            clicked.write(MarkerClicked { entity });
        }

        *pointer = MapPointer::default();
    }
}

/// A marker icon was clicked (pressed and released without dragging).
#[derive(Message, Debug, Clone, Copy)]
pub struct MarkerClicked {
    pub entity: Entity,
}

/// Mouse wheel zooms one level per notch around the cursor.
pub fn handle_scroll_zoom(
    mut scroll_events: MessageReader<MouseWheel>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    dialog_state: Res<DialogState>,
    mut view: ResMut<MapView>,
    mut accumulated: Local<f32>,
    mut contexts: EguiContexts,
) {
    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false);

    if over_ui || dialog_state.any_modal_open {
        scroll_events.clear();
        *accumulated = 0.0;
        return;
    }

    for event in scroll_events.read() {
        *accumulated += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / 100.0,
        };
    }

    let steps = accumulated.trunc();
    if steps == 0.0 {
        return;
    }
    *accumulated -= steps;

    let Ok(window) = window_query.single() else {
        return;
    };
    let focus = window.cursor_position().unwrap_or(view.viewport / 2.0);
    let target = (view.zoom as f32 + steps).clamp(0.0, u8::MAX as f32) as u8;
    view.zoom_around(focus, target);
}

/// `+` / `-` zoom around the view center.
pub fn handle_zoom_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    dialog_state: Res<DialogState>,
    mut view: ResMut<MapView>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        view.zoom_in();
    } else if keyboard.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        view.zoom_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_at(center: LatLng, zoom: u8) -> MapView {
        MapView {
            center,
            zoom,
            viewport: Vec2::new(800.0, 600.0),
            ..default()
        }
    }

    #[test]
    fn test_default_view_matches_constants() {
        let view = MapView::default();
        assert_eq!(view.center, LatLng::new(39.92077, 32.85411));
        assert_eq!(view.zoom, 6);
        assert_eq!(view.max_zoom, 18);
    }

    #[test]
    fn test_screen_center_is_view_center() {
        let view = view_at(LatLng::new(39.92, 32.85), 10);
        let pos = view.screen_to_geo(Vec2::new(400.0, 300.0));
        assert!((pos.lat - 39.92).abs() < 1e-9);
        assert!((pos.lng - 32.85).abs() < 1e-9);
    }

    #[test]
    fn test_screen_geo_round_trip() {
        let view = view_at(LatLng::new(39.92, 32.85), 12);
        let screen = Vec2::new(123.0, 456.0);
        let back = view.geo_to_screen(view.screen_to_geo(screen));
        assert!((back - screen).length() < 0.01);
    }

    #[test]
    fn test_geo_to_world_y_is_up() {
        let view = view_at(LatLng::new(0.0, 0.0), 4);
        let north = view.geo_to_world(LatLng::new(10.0, 0.0));
        assert!(north.y > 0.0);
        assert!(north.x.abs() < 1e-3);
    }

    #[test]
    fn test_geo_to_world_picks_nearest_world_copy() {
        let view = view_at(LatLng::new(0.0, 179.0), 3);
        let across = view.geo_to_world(LatLng::new(0.0, -179.0));
        // Two degrees east, not 358 degrees west
        assert!(across.x > 0.0);
        assert!(across.x < 50.0);
    }

    #[test]
    fn test_pan_moves_center_against_pointer() {
        let mut view = view_at(LatLng::new(0.0, 0.0), 5);
        view.pan_by(Vec2::new(100.0, 0.0));
        // Dragging right reveals what is to the west
        assert!(view.center.lng < 0.0);
        assert!(view.center.lat.abs() < 1e-9);
    }

    #[test]
    fn test_zoom_around_keeps_anchor_fixed() {
        let mut view = view_at(LatLng::new(39.92, 32.85), 8);
        let screen = Vec2::new(200.0, 150.0);
        let before = view.screen_to_geo(screen);
        view.zoom_around(screen, 9);
        let after = view.screen_to_geo(screen);
        assert_eq!(view.zoom, 9);
        assert!((before.lat - after.lat).abs() < 1e-6);
        assert!((before.lng - after.lng).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = view_at(LatLng::new(0.0, 0.0), 18);
        view.zoom_in();
        assert_eq!(view.zoom, 18);

        let mut view = view_at(LatLng::new(0.0, 0.0), 0);
        view.zoom_out();
        assert_eq!(view.zoom, 0);
    }

    #[test]
    fn test_set_view_clamps_zoom() {
        let mut view = view_at(LatLng::new(0.0, 0.0), 3);
        view.set_view(LatLng::new(41.0, 29.0), 30);
        assert_eq!(view.zoom, 18);
        assert_eq!(view.center, LatLng::new(41.0, 29.0));
    }

    #[test]
    fn test_meters_to_pixels_scales_with_zoom() {
        let low = view_at(LatLng::new(0.0, 0.0), 10);
        let high = view_at(LatLng::new(0.0, 0.0), 11);
        let r_low = low.meters_to_pixels(1000.0, 0.0);
        let r_high = high.meters_to_pixels(1000.0, 0.0);
        assert!((r_high - 2.0 * r_low).abs() < 1e-3);
    }
}
