//! Tests for the location lookup.

use bevy::prelude::Vec2;

use crate::config::GeolocationSource;
use crate::map::{LatLng, MapView};

use super::operations::{locate, make_fix, parse_location_response};
use super::state::{LocateError, LocationFix};
use super::systems::{located_view, location_overlays, YOU_ARE_HERE};

const DEFAULT_ACCURACY: f64 = 5000.0;

// Response parsing tests
#[test]
fn test_parse_ip_api_success() {
    let body = r#"{
        "status": "success",
        "country": "Turkey",
        "city": "Ankara",
        "lat": 39.9199,
        "lon": 32.8543,
        "query": "203.0.113.7"
    }"#;

    let fix = parse_location_response(body, DEFAULT_ACCURACY).unwrap();
    assert_eq!(fix.position, LatLng::new(39.9199, 32.8543));
    assert_eq!(fix.accuracy_m, DEFAULT_ACCURACY);
}

#[test]
fn test_parse_ip_api_failure() {
    let body = r#"{ "status": "fail", "message": "private range", "query": "10.0.0.1" }"#;

    let err = parse_location_response(body, DEFAULT_ACCURACY).unwrap_err();
    assert!(matches!(err, LocateError::Refused(ref msg) if msg == "private range"));
}

#[test]
fn test_parse_long_field_names_with_accuracy() {
    let body = r#"{ "latitude": 48.8566, "longitude": 2.3522, "accuracy": 120.0 }"#;

    let fix = parse_location_response(body, DEFAULT_ACCURACY).unwrap();
    assert_eq!(fix.position, LatLng::new(48.8566, 2.3522));
    assert_eq!(fix.accuracy_m, 120.0);
}

#[test]
fn test_parse_lng_field_name() {
    let body = r#"{ "lat": -33.87, "lng": 151.21 }"#;

    let fix = parse_location_response(body, DEFAULT_ACCURACY).unwrap();
    assert_eq!(fix.position, LatLng::new(-33.87, 151.21));
}

#[test]
fn test_parse_missing_coordinates() {
    let body = r#"{ "status": "success", "lat": 10.0 }"#;

    let err = parse_location_response(body, DEFAULT_ACCURACY).unwrap_err();
    assert!(matches!(err, LocateError::MissingCoordinates));
}

#[test]
fn test_parse_malformed_json() {
    let err = parse_location_response("<html>", DEFAULT_ACCURACY).unwrap_err();
    assert!(matches!(err, LocateError::Parse(_)));
}

// Fix construction tests
#[test]
fn test_make_fix_rejects_out_of_range() {
    assert!(matches!(
        make_fix(91.0, 0.0, None, DEFAULT_ACCURACY),
        Err(LocateError::OutOfRange { .. })
    ));
    assert!(matches!(
        make_fix(0.0, f64::NAN, None, DEFAULT_ACCURACY),
        Err(LocateError::OutOfRange { .. })
    ));
}

#[test]
fn test_make_fix_replaces_bad_accuracy() {
    let fix = make_fix(1.0, 2.0, Some(0.0), DEFAULT_ACCURACY).unwrap();
    assert_eq!(fix.accuracy_m, DEFAULT_ACCURACY);
    let fix = make_fix(1.0, 2.0, Some(-5.0), DEFAULT_ACCURACY).unwrap();
    assert_eq!(fix.accuracy_m, DEFAULT_ACCURACY);
}

#[test]
fn test_circle_radius_is_half_accuracy() {
    let fix = LocationFix {
        position: LatLng::new(0.0, 0.0),
        accuracy_m: 100.0,
    };
    assert_eq!(fix.circle_radius_m(), 50.0);
}

// Source tests
#[test]
fn test_locate_fixed_source() {
    let source = GeolocationSource::Fixed {
        lat: 41.0082,
        lng: 28.9784,
        accuracy_m: Some(25.0),
    };

    let fix = locate(&source, DEFAULT_ACCURACY).unwrap();
    assert_eq!(fix.position, LatLng::new(41.0082, 28.9784));
    assert_eq!(fix.accuracy_m, 25.0);
}

#[test]
fn test_locate_fixed_source_default_accuracy() {
    let source = GeolocationSource::Fixed {
        lat: 41.0,
        lng: 29.0,
        accuracy_m: None,
    };

    let fix = locate(&source, 750.0).unwrap();
    assert_eq!(fix.accuracy_m, 750.0);
}

#[test]
fn test_locate_disabled_source() {
    let err = locate(&GeolocationSource::Disabled, DEFAULT_ACCURACY).unwrap_err();
    assert!(matches!(err, LocateError::Disabled));
}

// View fitting tests
fn view_with_viewport(width: f32, height: f32) -> MapView {
    MapView {
        viewport: Vec2::new(width, height),
        ..MapView::default()
    }
}

#[test]
fn test_located_view_small_accuracy_hits_cap() {
    let view = view_with_viewport(1280.0, 800.0);
    let fix = LocationFix {
        position: LatLng::new(39.92, 32.85),
        accuracy_m: 10.0,
    };

    let (center, zoom) = located_view(&view, &fix, 16);
    assert_eq!(center, fix.position);
    assert_eq!(zoom, 16);
}

#[test]
fn test_located_view_city_accuracy_zooms_out() {
    let view = view_with_viewport(1280.0, 800.0);
    let fix = LocationFix {
        position: LatLng::new(0.0, 0.0),
        accuracy_m: 5000.0,
    };

    // 10 km across must fit in 800 px: about 12.5 m/px, which is zoom 13 at
    // the equator (19.1 m/px) but not zoom 14 (9.6 m/px)
    let (_, zoom) = located_view(&view, &fix, 16);
    assert_eq!(zoom, 13);
}

#[test]
fn test_located_view_respects_layer_max_zoom() {
    let mut view = view_with_viewport(1280.0, 800.0);
    view.max_zoom = 12;
    let fix = LocationFix {
        position: LatLng::new(0.0, 0.0),
        accuracy_m: 1.0,
    };

    let (_, zoom) = located_view(&view, &fix, 16);
    assert_eq!(zoom, 12);
}

// Overlay tests
#[test]
fn test_overlays_for_accuracy_fifty() {
    let position = LatLng::new(39.92, 32.85);
    let fix = LocationFix {
        position,
        accuracy_m: 50.0,
    };

    let (marker, circle) = location_overlays(&fix);
    assert_eq!(marker.position, position);
    assert!(marker.open_popup);
    assert_eq!(marker.category, None);
    assert_eq!(marker.popup.to_html(), YOU_ARE_HERE);
    assert_eq!(marker.icon.size, Vec2::new(25.0, 41.0));
    assert_eq!(circle.center, position);
    assert_eq!(circle.radius_m, 25.0);
}
