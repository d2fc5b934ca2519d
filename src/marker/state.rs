//! Persisted marker records.
//!
//! A pen marker serializes to one flat camelCase record: its own fields
//! plus the base marker's fields, stamped with a `typeName` discriminator.
//! [`MarkerState`] is the host-side tagged union that dispatches on it.

use bevy::prelude::*;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::base::BaseMarkerState;
use super::path::PathMode;
use super::style::Style;

/// Discriminator stamped on every pen marker record.
pub const PEN_TYPE_NAME: &str = "PenTool";

/// A point as stored on disk: `{"x": .., "y": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatePoint {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for StatePoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<StatePoint> for Vec2 {
    fn from(p: StatePoint) -> Self {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenMarkerState {
    pub type_name: String,
    pub stroke_color: String,
    pub stroke_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dasharray: Option<String>,
    #[serde(default)]
    pub path_mode: PathMode,
    pub points: Vec<StatePoint>,
    #[serde(flatten)]
    pub base: BaseMarkerState,
}

impl PenMarkerState {
    /// Build the record from the pen's own fields and the base marker's fields.
    pub fn compose(
        style: &Style,
        path_mode: PathMode,
        points: &[Vec2],
        base: BaseMarkerState,
    ) -> Self {
        Self {
            type_name: PEN_TYPE_NAME.to_string(),
            stroke_color: style.stroke_color.clone(),
            stroke_width: style.stroke_width,
            stroke_dasharray: style.stroke_dasharray.clone(),
            path_mode,
            points: points.iter().map(|&p| p.into()).collect(),
            base,
        }
    }

    pub fn style(&self) -> Style {
        Style {
            stroke_color: self.stroke_color.clone(),
            stroke_width: self.stroke_width,
            stroke_dasharray: self.stroke_dasharray.clone(),
        }
    }

    pub fn point_vec(&self) -> Vec<Vec2> {
        self.points.iter().map(|&p| p.into()).collect()
    }

    /// The same record with every coordinate scaled, base offset included
    pub fn scaled(&self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| StatePoint {
                    x: p.x * scale_x,
                    y: p.y * scale_y,
                })
                .collect(),
            base: self.base.scaled(scale_x, scale_y),
            ..self.clone()
        }
    }
}

/// Any marker record, discriminated by `typeName`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerState {
    Pen(PenMarkerState),
}

impl MarkerState {
    pub fn type_name(&self) -> &str {
        match self {
            MarkerState::Pen(state) => &state.type_name,
        }
    }
}

impl From<PenMarkerState> for MarkerState {
    fn from(state: PenMarkerState) -> Self {
        MarkerState::Pen(state)
    }
}

impl<'de> Deserialize<'de> for MarkerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value.get("typeName").and_then(serde_json::Value::as_str) {
            Some(PEN_TYPE_NAME) => serde_json::from_value(value)
                .map(MarkerState::Pen)
                .map_err(de::Error::custom),
            Some(other) => Err(de::Error::custom(format!(
                "unknown marker type `{}`",
                other
            ))),
            None => Err(de::Error::missing_field("typeName")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::base::MarkerStage;

    fn sample() -> PenMarkerState {
        PenMarkerState::compose(
            &Style {
                stroke_color: "red".to_string(),
                stroke_width: 3.0,
                stroke_dasharray: Some("4 2".to_string()),
            },
            PathMode::Smoothed,
            &[Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0)],
            BaseMarkerState {
                stage: MarkerStage::Select,
                notes: None,
                offset: StatePoint { x: 1.0, y: 2.0 },
                rotation_angle: 0.0,
            },
        )
    }

    #[test]
    fn test_compose_stamps_type_name() {
        assert_eq!(sample().type_name, PEN_TYPE_NAME);
    }

    #[test]
    fn test_json_layout_is_flat_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["typeName"], "PenTool");
        assert_eq!(json["strokeColor"], "red");
        assert_eq!(json["strokeWidth"], 3.0);
        assert_eq!(json["strokeDasharray"], "4 2");
        assert_eq!(json["pathMode"], "smoothed");
        assert_eq!(json["points"][1]["x"], 10.0);
        assert_eq!(json["stage"], "select");
        assert_eq!(json["offset"]["y"], 2.0);
        assert_eq!(json["rotationAngle"], 0.0);
    }

    #[test]
    fn test_solid_line_omits_dasharray() {
        let mut state = sample();
        state.stroke_dasharray = None;
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("strokeDasharray").is_none());
    }

    #[test]
    fn test_marker_state_roundtrip() {
        let state = MarkerState::from(sample());
        let json = serde_json::to_string(&state).unwrap();
        let parsed: MarkerState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
        assert_eq!(parsed.type_name(), PEN_TYPE_NAME);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "typeName": "PenTool",
            "strokeColor": "blue",
            "strokeWidth": 2,
            "points": [{"x": 1, "y": 2}]
        }"#;
        let MarkerState::Pen(state) = serde_json::from_str(json).unwrap();
        assert_eq!(state.path_mode, PathMode::Smoothed);
        assert!(state.stroke_dasharray.is_none());
        assert_eq!(state.base, BaseMarkerState::default());
        assert_eq!(state.point_vec(), vec![Vec2::new(1.0, 2.0)]);
    }

    #[test]
    fn test_unknown_type_name_is_rejected() {
        let json = r#"{"typeName": "EllipseMarker", "points": []}"#;
        let err = serde_json::from_str::<MarkerState>(json).unwrap_err();
        assert!(err.to_string().contains("EllipseMarker"));
        assert!(serde_json::from_str::<MarkerState>(r#"{"points": []}"#).is_err());
    }

    #[test]
    fn test_scaled_scales_points_and_offset() {
        let scaled = sample().scaled(2.0, 0.5);
        assert_eq!(scaled.points[1], StatePoint { x: 20.0, y: 2.5 });
        assert_eq!(scaled.base.offset, StatePoint { x: 2.0, y: 1.0 });
        assert_eq!(scaled.stroke_width, 3.0);
    }
}
