//! Host-wide defaults handed to every marker at construction.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HANDLE_RADIUS, DEFAULT_HIT_PADDING, DEFAULT_STROKE_WIDTH};

/// Defaults and option sets for markers, persisted in the app config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSettings {
    /// Stroke color for new markers (any CSS color token)
    pub default_color: String,
    pub default_stroke_width: f32,
    /// Colors offered by the stroke color panel
    pub default_color_set: Vec<String>,
    /// Widths offered by the stroke width panel
    pub default_stroke_widths: Vec<f32>,
    /// Dash patterns offered by the line style panel ("" is solid)
    pub default_dasharrays: Vec<String>,
    /// Skip move points closer than this to the previous point.
    /// `None` captures every move event.
    pub min_point_distance: Option<f32>,
    /// Radius of point edit handles
    pub handle_radius: f32,
    /// Extra width added to the invisible hit-test path
    pub hit_padding: f32,
    /// Whether markers create point edit handles at all
    pub editable_handles: bool,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            default_color: "#e53935".to_string(),
            default_stroke_width: DEFAULT_STROKE_WIDTH,
            default_color_set: [
                "#e53935", "#1e88e5", "#43a047", "#fdd835", "#000000", "#ffffff", "#8e24aa",
                "#fb8c00",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            default_stroke_widths: vec![1.0, 2.0, 3.0, 5.0, 8.0, 12.0],
            default_dasharrays: ["", "3", "12 3", "9 6 3 6"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            min_point_distance: None,
            handle_radius: DEFAULT_HANDLE_RADIUS,
            hit_padding: DEFAULT_HIT_PADDING,
            editable_handles: true,
        }
    }
}
