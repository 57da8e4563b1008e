//! Geolocation state resources and task components.

use bevy::prelude::*;
use bevy::tasks::Task;
use thiserror::Error;

use crate::map::LatLng;

/// Message shown when the position could not be determined.
pub const LOCATION_ERROR_NOTICE: &str =
    "Unable to find your location. Please enable location services.";

/// A resolved position and how far off it may be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub position: LatLng,
    /// Radius of uncertainty in meters
    pub accuracy_m: f64,
}

impl LocationFix {
    /// Radius of the circle drawn around the "you are here" marker.
    pub fn circle_radius_m(&self) -> f64 {
        self.accuracy_m / 2.0
    }
}

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("location lookup is disabled")]
    Disabled,
    #[error("location service answered {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("location service refused the lookup: {0}")]
    Refused(String),
    #[error("response has no coordinates")]
    MissingCoordinates,
    #[error("coordinates out of range: {lat}, {lng}")]
    OutOfRange { lat: f64, lng: f64 },
}

/// Ask for the user's position. Ignored while a lookup is running.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct LocateRequest;

#[derive(Resource, Default)]
pub struct LocateState {
    /// Whether a lookup is running
    pub in_progress: bool,
}

/// Background location lookup
#[derive(Component)]
pub struct LocateTask(pub Task<Result<LocationFix, LocateError>>);
