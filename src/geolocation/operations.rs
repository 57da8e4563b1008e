//! Resolving the user's position from the configured source.

use std::time::Duration;

use serde::Deserialize;

use crate::config::GeolocationSource;
use crate::constants::{LOCATE_TIMEOUT_SECS, USER_AGENT};
use crate::map::LatLng;

use super::state::{LocateError, LocationFix};

/// JSON body of a location service. Field names vary between services.
#[derive(Debug, Deserialize)]
struct LocationResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "latitude")]
    lat: Option<f64>,
    #[serde(default, alias = "lon", alias = "longitude")]
    lng: Option<f64>,
    #[serde(default)]
    accuracy: Option<f64>,
}

/// Build a fix, rejecting impossible coordinates and replacing a missing or
/// non-positive accuracy with `default_accuracy_m`.
pub fn make_fix(
    lat: f64,
    lng: f64,
    accuracy_m: Option<f64>,
    default_accuracy_m: f64,
) -> Result<LocationFix, LocateError> {
    let valid = lat.is_finite()
        && lng.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng);
    if !valid {
        return Err(LocateError::OutOfRange { lat, lng });
    }

    let accuracy_m = accuracy_m
        .filter(|a| a.is_finite() && *a > 0.0)
        .unwrap_or(default_accuracy_m);

    Ok(LocationFix {
        position: LatLng::new(lat, lng),
        accuracy_m,
    })
}

/// Parse a location service response body.
pub fn parse_location_response(
    body: &str,
    default_accuracy_m: f64,
) -> Result<LocationFix, LocateError> {
    let response: LocationResponse = serde_json::from_str(body)?;

    if let Some(status) = &response.status
        && status != "success"
    {
        return Err(LocateError::Refused(
            response.message.unwrap_or_else(|| status.clone()),
        ));
    }

    let (Some(lat), Some(lng)) = (response.lat, response.lng) else {
        return Err(LocateError::MissingCoordinates);
    };

    make_fix(lat, lng, response.accuracy, default_accuracy_m)
}

fn fetch_location(url: &str, default_accuracy_m: f64) -> Result<LocationFix, LocateError> {
    let response = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .timeout(Duration::from_secs(LOCATE_TIMEOUT_SECS))
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => LocateError::Status(code),
            other => LocateError::Transport(other.to_string()),
        })?;

    let body = response.into_string()?;
    parse_location_response(&body, default_accuracy_m)
}

/// Resolve the current position. Blocking; run it off the main thread.
pub fn locate(
    source: &GeolocationSource,
    default_accuracy_m: f64,
) -> Result<LocationFix, LocateError> {
    match source {
        GeolocationSource::Http { url } => fetch_location(url, default_accuracy_m),
        GeolocationSource::Fixed {
            lat,
            lng,
            accuracy_m,
        } => make_fix(*lat, *lng, *accuracy_m, default_accuracy_m),
        GeolocationSource::Disabled => Err(LocateError::Disabled),
    }
}
