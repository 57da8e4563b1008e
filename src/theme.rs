//! Centralized color theme for the application.
//!
//! This module provides all colors used for map overlays and the UI.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

// ============================================================================
// Map Colors
// ============================================================================

/// Background shown where tiles have not loaded (or failed to)
pub const MAP_BACKGROUND: Color = Color::srgb(0.87, 0.87, 0.85);

/// Outline of the accuracy circle around the located position
pub const CIRCLE_STROKE: Color = Color::srgb(0.2, 0.533, 1.0);

/// Fallback pin color for the "you are here" marker (RGBA)
pub const DEFAULT_PIN_RGBA: [u8; 4] = [42, 129, 203, 255];

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// White for selected button borders
    pub const SELECTED_BORDER: egui::Color32 = egui::Color32::WHITE;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Translucent white behind the attribution text
    pub const ATTRIBUTION_BACKGROUND: egui::Color32 =
        egui::Color32::from_rgba_premultiplied(200, 200, 200, 200);

    /// Dark text on light map overlays
    pub const OVERLAY_TEXT: egui::Color32 = egui::Color32::from_rgb(40, 40, 40);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert an RGBA byte color to egui Color32
pub fn rgba_to_egui(color: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}
