//! Stroke style and the toolbox panels that edit it.

use super::settings::MarkerSettings;
use super::surface::Attributes;

/// Presentation of a stroke, independent of its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub stroke_color: String,
    pub stroke_width: f32,
    pub stroke_dasharray: Option<String>,
}

impl Style {
    pub fn from_settings(settings: &MarkerSettings) -> Self {
        Self {
            stroke_color: settings.default_color.clone(),
            stroke_width: settings.default_stroke_width,
            stroke_dasharray: None,
        }
    }

    /// Width must be finite and positive; anything else is ignored.
    pub fn set_stroke_width(&mut self, width: f32) -> bool {
        if !width.is_finite() || width <= 0.0 {
            return false;
        }
        self.stroke_width = width;
        true
    }

    pub fn set_stroke_color(&mut self, color: impl Into<String>) {
        self.stroke_color = color.into();
    }

    /// An empty or whitespace-only pattern means a solid line.
    pub fn set_stroke_dasharray(&mut self, pattern: Option<String>) {
        self.stroke_dasharray = pattern.filter(|p| !p.trim().is_empty());
    }

    /// Apply a panel change, returning whether anything was accepted
    pub fn apply(&mut self, change: &StyleChange) -> bool {
        match change {
            StyleChange::StrokeColor(color) => {
                self.set_stroke_color(color.clone());
                true
            }
            StyleChange::StrokeWidth(width) => self.set_stroke_width(*width),
            StyleChange::StrokeDasharray(pattern) => {
                self.set_stroke_dasharray(pattern.clone());
                true
            }
        }
    }

    /// SVG presentation attributes for the visible path.
    pub fn path_attributes(&self) -> Attributes {
        vec![
            ("stroke", self.stroke_color.clone()),
            ("stroke-width", self.stroke_width.to_string()),
            (
                "stroke-dasharray",
                self.stroke_dasharray.clone().unwrap_or_default(),
            ),
        ]
    }
}

/// A new value picked in one of the toolbox panels.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleChange {
    StrokeColor(String),
    StrokeWidth(f32),
    StrokeDasharray(Option<String>),
}

/// One settings panel a marker contributes to the toolbox.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolboxPanel {
    StrokeColor {
        title: &'static str,
        options: Vec<String>,
        current: String,
    },
    StrokeWidth {
        title: &'static str,
        options: Vec<f32>,
        current: f32,
    },
    LineStyle {
        title: &'static str,
        options: Vec<String>,
        current: String,
    },
}

impl ToolboxPanel {
    /// The three panels for `style`, with option sets from `settings`.
    pub fn for_style(style: &Style, settings: &MarkerSettings) -> Vec<ToolboxPanel> {
        vec![
            ToolboxPanel::StrokeColor {
                title: "Line color",
                options: settings.default_color_set.clone(),
                current: style.stroke_color.clone(),
            },
            ToolboxPanel::StrokeWidth {
                title: "Line width",
                options: settings.default_stroke_widths.clone(),
                current: style.stroke_width,
            },
            ToolboxPanel::LineStyle {
                title: "Line style",
                options: settings.default_dasharrays.clone(),
                current: style.stroke_dasharray.clone().unwrap_or_default(),
            },
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            ToolboxPanel::StrokeColor { title, .. }
            | ToolboxPanel::StrokeWidth { title, .. }
            | ToolboxPanel::LineStyle { title, .. } => *title,
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            ToolboxPanel::StrokeColor { options, .. } | ToolboxPanel::LineStyle { options, .. } => {
                options.len()
            }
            ToolboxPanel::StrokeWidth { options, .. } => options.len(),
        }
    }

    pub fn is_current(&self, index: usize) -> bool {
        match self {
            ToolboxPanel::StrokeColor { options, current, .. }
            | ToolboxPanel::LineStyle { options, current, .. } => {
                options.get(index) == Some(current)
            }
            ToolboxPanel::StrokeWidth { options, current, .. } => {
                options.get(index) == Some(current)
            }
        }
    }

    /// The change produced by picking option `index`, if it exists.
    pub fn select(&self, index: usize) -> Option<StyleChange> {
        match self {
            ToolboxPanel::StrokeColor { options, .. } => {
                options.get(index).cloned().map(StyleChange::StrokeColor)
            }
            ToolboxPanel::StrokeWidth { options, .. } => {
                options.get(index).copied().map(StyleChange::StrokeWidth)
            }
            ToolboxPanel::LineStyle { options, .. } => options
                .get(index)
                .map(|p| StyleChange::StrokeDasharray(Some(p.clone()).filter(|p| !p.is_empty()))),
        }
    }
}
