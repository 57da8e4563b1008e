use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ATTRIBUTION, DEFAULT_ATTRIBUTION_URL, DEFAULT_CENTER, DEFAULT_GEOLOCATION_URL,
    DEFAULT_LOCATION_ACCURACY_M, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_TILE_SUBDOMAINS,
    DEFAULT_TILE_URL, DEFAULT_ZOOM, LOCATE_MAX_ZOOM, LONG_PRESS_THRESHOLD_MS,
};
use crate::map::LatLng;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Raster tile server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerConfig {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders
    pub url_template: String,
    /// Values substituted for `{s}`, spread across tiles
    pub subdomains: Vec<String>,
    pub attribution: String,
    /// Page opened when the attribution is clicked
    pub attribution_url: String,
    pub max_zoom: u8,
    pub min_zoom: u8,
}

impl Default for TileLayerConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_string(),
            subdomains: DEFAULT_TILE_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            attribution_url: DEFAULT_ATTRIBUTION_URL.to_string(),
            max_zoom: DEFAULT_MAX_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
        }
    }
}

/// Where the map opens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialView {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER.into(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Where "Show My Location" gets its position from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeolocationSource {
    /// JSON lookup service (IP based by default)
    Http { url: String },
    /// Fixed position, for machines without network access
    Fixed {
        lat: f64,
        lng: f64,
        #[serde(default)]
        accuracy_m: Option<f64>,
    },
    /// Location lookups always fail
    Disabled,
}

impl Default for GeolocationSource {
    fn default() -> Self {
        GeolocationSource::Http {
            url: DEFAULT_GEOLOCATION_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub source: GeolocationSource,
    /// Accuracy assumed when the source does not report one
    pub default_accuracy_m: f64,
    /// Zoom cap when recentering on the located position
    pub locate_max_zoom: u8,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            source: GeolocationSource::default(),
            default_accuracy_m: DEFAULT_LOCATION_ACCURACY_M,
            locate_max_zoom: LOCATE_MAX_ZOOM,
        }
    }
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfigData {
    #[serde(default)]
    pub tile_layer: TileLayerConfig,

    #[serde(default)]
    pub initial_view: InitialView,

    /// Hold time in milliseconds before a press on the map becomes a marker request
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

fn default_long_press_ms() -> u64 {
    LONG_PRESS_THRESHOLD_MS
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            tile_layer: TileLayerConfig::default(),
            initial_view: InitialView::default(),
            long_press_ms: LONG_PRESS_THRESHOLD_MS,
            geolocation: GeolocationConfig::default(),
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Why the config file on disk could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Configuration file was corrupted: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse config JSON, falling back to defaults for missing fields.
pub fn parse_config(json: &str) -> Result<AppConfigData, serde_json::Error> {
    serde_json::from_str(json)
}

/// Read the config at `path`. `Ok(None)` means no file exists yet.
fn read_config(path: &Path) -> Result<Option<AppConfigData>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    Ok(Some(parse_config(&json)?))
}

fn write_config(config: &AppConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(&config.data)?;
    std::fs::write(&config.config_path, json)?;
    Ok(())
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    if let Err(e) = crate::paths::ensure_directories() {
        warn!("Failed to create application directories: {}", e);
    }

    config.config_path = crate::paths::config_file();
    match read_config(&config.config_path) {
        Ok(Some(data)) => {
            info!("Loaded config from {:?}", config.config_path);
            config.data = data;
        }
        Ok(None) => {
            info!("No config file found, writing defaults to {:?}", config.config_path);
            config.data = AppConfigData::default();
            // Leave a file the user can edit
            if let Err(e) = write_config(&config) {
                error!("Failed to save config: {}", e);
            }
        }
        Err(e) => {
            warn!("{}, using defaults", e);
            config.data = AppConfigData::default();
            reset_notification.show = true;
            reset_notification.reason = Some(e.to_string());
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.long_press_ms, 1000);
        assert_eq!(data.initial_view.center, LatLng::new(39.92077, 32.85411));
        assert_eq!(data.initial_view.zoom, 6);
        assert_eq!(data.tile_layer.max_zoom, 18);
        assert_eq!(data.tile_layer.subdomains, vec!["a", "b", "c"]);
        assert_eq!(data.geolocation.locate_max_zoom, 16);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            long_press_ms: 750,
            geolocation: GeolocationConfig {
                source: GeolocationSource::Fixed {
                    lat: 41.0,
                    lng: 29.0,
                    accuracy_m: Some(30.0),
                },
                ..GeolocationConfig::default()
            },
            ..AppConfigData::default()
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed = parse_config(&json).unwrap();

        assert_eq!(parsed, data);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let parsed = parse_config("{}").unwrap();
        assert_eq!(parsed, AppConfigData::default());
    }

    #[test]
    fn test_partial_tile_layer_keeps_other_defaults() {
        let parsed = parse_config(
            r#"{ "tile_layer": { "url_template": "https://tiles.example.com/{z}/{x}/{y}.png" } }"#,
        )
        .unwrap();
        assert_eq!(
            parsed.tile_layer.url_template,
            "https://tiles.example.com/{z}/{x}/{y}.png"
        );
        assert_eq!(parsed.tile_layer.max_zoom, 18);
        assert_eq!(parsed.long_press_ms, 1000);
    }

    #[test]
    fn test_geolocation_source_tagged_json() {
        let parsed = parse_config(r#"{ "geolocation": { "source": { "kind": "disabled" } } }"#)
            .unwrap();
        assert_eq!(parsed.geolocation.source, GeolocationSource::Disabled);
        assert_eq!(parsed.geolocation.default_accuracy_m, 5000.0);

        let parsed = parse_config(
            r#"{ "geolocation": { "source": { "kind": "fixed", "lat": 1.5, "lng": 2.5 } } }"#,
        )
        .unwrap();
        assert_eq!(
            parsed.geolocation.source,
            GeolocationSource::Fixed {
                lat: 1.5,
                lng: 2.5,
                accuracy_m: None
            }
        );
    }

    #[test]
    fn test_corrupted_config_is_an_error() {
        assert!(parse_config("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let path = std::env::temp_dir().join("rallymap-no-such-config.json");
        assert!(matches!(read_config(&path), Ok(None)));
    }

    #[test]
    fn test_parse_error_message_names_corruption() {
        let err = ConfigError::from(parse_config("{ not json").unwrap_err());
        assert!(err.to_string().starts_with("Configuration file was corrupted"));
    }

    #[test]
    fn test_config_reset_notification_default() {
        let notification = ConfigResetNotification::default();
        assert!(!notification.show);
        assert!(notification.reason.is_none());
    }
}
