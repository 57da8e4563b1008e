//! Geographic circles (e.g. location accuracy), drawn with gizmos.

use bevy::gizmos::config::GizmoConfigGroup;
use bevy::prelude::*;

use crate::theme;

use super::geo::LatLng;
use super::marker::GeoAnchor;
use super::view::MapView;

/// Gizmo group for map overlays so they can be styled apart from debug gizmos.
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct OverlayGizmoGroup;

/// A circle whose radius is measured on the ground.
#[derive(Component, Debug, Clone, Copy)]
pub struct GeoCircle {
    pub radius_m: f64,
}

/// Add a circle at `center` with a radius in meters.
#[derive(Message, Debug, Clone, Copy)]
pub struct AddCircleRequest {
    pub center: LatLng,
    pub radius_m: f64,
}

pub fn spawn_circles(mut commands: Commands, mut requests: MessageReader<AddCircleRequest>) {
    for request in requests.read() {
        commands.spawn((
            GeoAnchor(request.center),
            GeoCircle {
                radius_m: request.radius_m,
            },
        ));
        debug!(
            "Added circle at {} with radius {:.1} m",
            request.center.format_short(),
            request.radius_m
        );
    }
}

pub fn render_circles(
    mut gizmos: Gizmos<OverlayGizmoGroup>,
    view: Res<MapView>,
    circles: Query<(&GeoAnchor, &GeoCircle)>,
) {
    for (anchor, circle) in circles.iter() {
        let center = view.geo_to_world(anchor.0);
        let radius = view.meters_to_pixels(circle.radius_m, anchor.0.lat);
        if radius < 0.5 {
            continue;
        }
        gizmos.circle_2d(
            Isometry2d::from_translation(center),
            radius,
            theme::CIRCLE_STROKE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_spawn_circle_keeps_center_and_radius() {
        let mut app = App::new();
        app.add_message::<AddCircleRequest>();
        let center = LatLng::new(39.92, 32.85);
        app.world_mut().write_message(AddCircleRequest {
            center,
            radius_m: 25.0,
        });
        app.world_mut().run_system_once(spawn_circles).unwrap();

        let mut query = app.world_mut().query::<(&GeoAnchor, &GeoCircle)>();
        let circles: Vec<_> = query.iter(app.world()).collect();
        assert_eq!(circles.len(), 1);
        assert_eq!(circles[0].0 .0, center);
        assert_eq!(circles[0].1.radius_m, 25.0);
    }

    #[test]
    fn test_circle_grows_with_zoom() {
        let mut view = MapView::default();
        view.zoom = 10;
        let near = view.meters_to_pixels(1000.0, 39.92);
        view.zoom = 11;
        let nearer = view.meters_to_pixels(1000.0, 39.92);
        assert!((nearer - 2.0 * near).abs() < 1e-3);
    }
}
