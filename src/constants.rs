//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants. Values that
//! users may want to change (tile server, initial view, thresholds) live in
//! [`crate::config`] and only default to the constants here.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

// ============================================================================
// Map defaults
// ============================================================================

/// Initial map center (latitude, longitude), Ankara
pub const DEFAULT_CENTER: (f64, f64) = (39.92077, 32.85411);

/// Initial zoom level
pub const DEFAULT_ZOOM: u8 = 6;

/// Square tile size in pixels (Web Mercator slippy map convention).
pub const TILE_SIZE: f64 = 256.0;

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const DEFAULT_TILE_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

pub const DEFAULT_ATTRIBUTION: &str = "© OpenStreetMap contributors";

pub const DEFAULT_ATTRIBUTION_URL: &str = "https://www.openstreetmap.org/copyright";

pub const DEFAULT_MAX_ZOOM: u8 = 18;

pub const DEFAULT_MIN_ZOOM: u8 = 0;

/// Highest zoom accepted from config. Tile indices stay within `u32`.
pub const MAX_SUPPORTED_ZOOM: u8 = 22;

/// Maximum number of tile downloads running at the same time.
/// Tile servers throttle clients that open too many connections.
pub const MAX_TILE_FETCHES_IN_FLIGHT: usize = 6;

/// Maximum number of decoded tiles kept in memory.
pub const MAX_CACHED_TILES: usize = 512;

/// Pixels the pointer must travel with the button held before the map pans.
pub const DRAG_START_DISTANCE: f32 = 4.0;

// ============================================================================
// Interaction
// ============================================================================

/// Hold duration that turns a press on the map into a marker request.
pub const LONG_PRESS_THRESHOLD_MS: u64 = 1000;

// ============================================================================
// Marker icons
// ============================================================================

/// Category icon size in pixels (width, height).
pub const CATEGORY_ICON_SIZE: (f32, f32) = (30.0, 30.0);

/// Hot-spot inside a category icon, measured from its top-left corner.
pub const CATEGORY_ICON_ANCHOR: (f32, f32) = (15.0, 30.0);

/// Popup offset relative to a category icon's hot-spot.
pub const CATEGORY_POPUP_ANCHOR: (f32, f32) = (0.0, -30.0);

/// Default pin used for the "you are here" marker.
pub const DEFAULT_PIN_PATH: &str = "icons/marker-icon.png";

pub const DEFAULT_PIN_SIZE: (f32, f32) = (25.0, 41.0);

pub const DEFAULT_PIN_ANCHOR: (f32, f32) = (12.0, 41.0);

pub const DEFAULT_PIN_POPUP_ANCHOR: (f32, f32) = (1.0, -34.0);

// ============================================================================
// Geolocation
// ============================================================================

/// Endpoint used for the location lookup when none is configured.
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json/";

/// Accuracy (meters) assumed when the location source does not report one.
pub const DEFAULT_LOCATION_ACCURACY_M: f64 = 5000.0;

/// Zoom cap when recentering on a located position.
pub const LOCATE_MAX_ZOOM: u8 = 16;

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("rallymap/", env!("CARGO_PKG_VERSION"));

/// Give up on a location lookup after this many seconds.
pub const LOCATE_TIMEOUT_SECS: u64 = 10;
