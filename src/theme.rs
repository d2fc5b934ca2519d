//! Centralized color theme for the application.
//!
//! This module provides the colors used by the editor UI and canvas overlays.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

// ============================================================================
// Canvas Colors
// ============================================================================

/// Semi-transparent grey outline around the drawing area
pub const CANVAS_FRAME: Color = Color::srgba(0.6, 0.6, 0.6, 0.8);

/// Handle outline when the handle carries no usable stroke color
pub const HANDLE_FALLBACK: Color = Color::BLACK;

/// Clear color behind the canvas
pub const WORKSPACE_BACKGROUND: Color = Color::srgb(0.16, 0.16, 0.18);

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Dark grey panel background (tool settings bar)
    pub const PANEL_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(45, 45, 48);

    /// Light grey for label text
    pub const LABEL_TEXT: egui::Color32 = egui::Color32::LIGHT_GRAY;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// White for selected button borders
    pub const SELECTED_BORDER: egui::Color32 = egui::Color32::WHITE;

    /// Dark grey for unselected button borders
    pub const UNSELECTED_BORDER: egui::Color32 = egui::Color32::DARK_GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Amber marker for unsaved changes in the title
    pub const DIRTY_MARK: egui::Color32 = egui::Color32::from_rgb(230, 180, 60);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (preserving alpha)
pub fn bevy_to_egui(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        (srgba.alpha * 255.0) as u8,
    )
}
