//! Geographic coordinates and the spherical Web Mercator projection.
//!
//! Pixel coordinates follow the slippy-map convention: the whole world is a
//! square of `TILE_SIZE * 2^zoom` pixels, x grows east, y grows south.

use std::f64::consts::PI;

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::TILE_SIZE;

/// Equatorial radius used by EPSG:3857, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude where the Web Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Longitude folded into `[-180, 180)`.
    pub fn wrapped(self) -> Self {
        Self {
            lat: self.lat,
            lng: (self.lng + 180.0).rem_euclid(360.0) - 180.0,
        }
    }

    /// `lat, lng` with two decimals, as shown in popups.
    pub fn format_short(&self) -> String {
        format!("{:.2}, {:.2}", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Size of the world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

/// Project to normalized Mercator coordinates (`0..1` on both axes).
pub fn project(pos: LatLng) -> DVec2 {
    let lat = pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (pos.lng + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    DVec2::new(x, y)
}

/// Inverse of [`project`]. Longitude is not wrapped.
pub fn unproject(point: DVec2) -> LatLng {
    let lng = point.x * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * point.y);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Absolute pixel position of `pos` at `zoom`.
pub fn to_pixel(pos: LatLng, zoom: u8) -> DVec2 {
    project(pos) * world_size(zoom)
}

/// Geographic position of an absolute pixel at `zoom`.
pub fn from_pixel(pixel: DVec2, zoom: u8) -> LatLng {
    unproject(pixel / world_size(zoom))
}

/// Ground resolution at `lat` for `zoom`.
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    2.0 * PI * EARTH_RADIUS_M * lat.cos() / world_size(zoom)
}

/// Highest zoom in `min_zoom..=max_zoom` at which a square of `extent_m`
/// meters centered at `lat` fits inside `viewport`.
pub fn fit_zoom(lat: f64, extent_m: f64, viewport: DVec2, min_zoom: u8, max_zoom: u8) -> u8 {
    let span = viewport.x.min(viewport.y);
    if span <= 0.0 || extent_m <= 0.0 {
        return max_zoom;
    }

    (min_zoom..=max_zoom)
        .rev()
        .find(|&zoom| extent_m / meters_per_pixel(lat, zoom) <= span)
        .unwrap_or(min_zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_project_origin_is_world_center() {
        let p = project(LatLng::new(0.0, 0.0));
        assert!(approx(p.x, 0.5, 1e-12));
        assert!(approx(p.y, 0.5, 1e-12));
    }

    #[test]
    fn test_project_unproject_round_trip() {
        let pos = LatLng::new(39.92077, 32.85411);
        let back = unproject(project(pos));
        assert!(approx(back.lat, pos.lat, 1e-9));
        assert!(approx(back.lng, pos.lng, 1e-9));
    }

    #[test]
    fn test_project_clamps_poles() {
        let north = project(LatLng::new(90.0, 0.0));
        assert!(approx(north.y, 0.0, 1e-9));
        let south = project(LatLng::new(-90.0, 0.0));
        assert!(approx(south.y, 1.0, 1e-9));
    }

    #[test]
    fn test_world_size_doubles_per_zoom() {
        assert_eq!(world_size(0), 256.0);
        assert_eq!(world_size(1), 512.0);
        assert_eq!(world_size(6), 16384.0);
    }

    #[test]
    fn test_pixel_round_trip() {
        let pos = LatLng::new(-33.8688, 151.2093);
        let back = from_pixel(to_pixel(pos, 12), 12);
        assert!(approx(back.lat, pos.lat, 1e-9));
        assert!(approx(back.lng, pos.lng, 1e-9));
    }

    #[test]
    fn test_meters_per_pixel_at_equator() {
        // Well-known value for zoom 0
        assert!(approx(meters_per_pixel(0.0, 0), 156_543.033_928, 1e-3));
        assert!(approx(meters_per_pixel(0.0, 1), 78_271.516_964, 1e-3));
    }

    #[test]
    fn test_meters_per_pixel_shrinks_with_latitude() {
        assert!(meters_per_pixel(60.0, 10) < meters_per_pixel(0.0, 10));
        assert!(approx(
            meters_per_pixel(60.0, 10),
            meters_per_pixel(0.0, 10) / 2.0,
            1e-6
        ));
    }

    #[test]
    fn test_wrapped_longitude() {
        assert!(approx(LatLng::new(0.0, 190.0).wrapped().lng, -170.0, 1e-9));
        assert!(approx(LatLng::new(0.0, -190.0).wrapped().lng, 170.0, 1e-9));
        assert!(approx(LatLng::new(0.0, 32.5).wrapped().lng, 32.5, 1e-9));
    }

    #[test]
    fn test_format_short_two_decimals() {
        assert_eq!(LatLng::new(39.92077, 32.85411).format_short(), "39.92, 32.85");
        assert_eq!(LatLng::new(-1.0, 0.004).format_short(), "-1.00, 0.00");
    }

    #[test]
    fn test_fit_zoom_respects_cap() {
        // A 100 m box fits at very high zoom; the cap must win.
        let zoom = fit_zoom(39.9, 100.0, DVec2::new(1280.0, 800.0), 0, 16);
        assert_eq!(zoom, 16);
    }

    #[test]
    fn test_fit_zoom_large_extent_zooms_out() {
        let zoom = fit_zoom(0.0, 10_000.0, DVec2::new(800.0, 600.0), 0, 18);
        // zoom 13 = 19.1 m/px -> 523 px fits; zoom 14 = 9.55 m/px -> 1047 px does not
        assert_eq!(zoom, 13);
    }

    #[test]
    fn test_fit_zoom_never_below_min() {
        let zoom = fit_zoom(0.0, 1.0e12, DVec2::new(800.0, 600.0), 2, 18);
        assert_eq!(zoom, 2);
    }
}
