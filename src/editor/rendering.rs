//! Gizmo rendering of marker elements and the canvas frame.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore, GizmoLineJoint};
use bevy::prelude::*;

use crate::constants::FLATTEN_TOLERANCE;
use crate::marker::{ElementAttributes, HandleShape, PathShape, flatten_path};
use crate::theme;

use super::document::MarkerDocument;

/// Gizmo group for marker strokes and handles
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct StrokeGizmoGroup;

pub fn configure_stroke_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<StrokeGizmoGroup>();
    config.line.width = 2.0;
    config.line.joints = GizmoLineJoint::Round(4);
}

/// Parse a CSS color token. `transparent` and unknown tokens yield `None`.
pub fn parse_color(token: &str) -> Option<Color> {
    let color = csscolorparser::parse(token).ok()?;
    let [r, g, b, a] = color.to_array();
    if a <= 0.0 {
        return None;
    }
    Some(Color::srgba(r as f32, g as f32, b as f32, a as f32))
}

/// Parse an SVG dash array. Empty, all-zero or malformed patterns mean a
/// solid line. An odd number of values is repeated to make it even.
pub fn parse_dasharray(pattern: &str) -> Option<Vec<f32>> {
    let values: Vec<f32> = pattern
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    if values.is_empty() || values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return None;
    }
    if values.iter().all(|v| *v == 0.0) {
        return None;
    }
    if values.len() % 2 == 1 {
        return Some([values.as_slice(), values.as_slice()].concat());
    }
    Some(values)
}

/// Split a polyline into the "on" segments of a dash pattern.
pub fn dash_segments(polyline: &[Vec2], pattern: &[f32]) -> Vec<(Vec2, Vec2)> {
    let mut segments = Vec::new();
    if pattern.is_empty() {
        return segments;
    }

    let mut dash_index = 0;
    let mut remaining = pattern[0];
    for window in polyline.windows(2) {
        let (mut start, end) = (window[0], window[1]);
        let mut length = start.distance(end);
        while length > 0.0 {
            let step = remaining.min(length);
            let next = start + (end - start) * (step / length);
            if dash_index % 2 == 0 && step > 0.0 {
                segments.push((start, next));
            }
            length -= step;
            remaining -= step;
            start = next;
            if remaining <= 0.0 {
                dash_index = (dash_index + 1) % pattern.len();
                remaining = pattern[dash_index];
            }
        }
    }
    segments
}

pub fn render_marker_paths(
    mut gizmos: Gizmos<StrokeGizmoGroup>,
    paths: Query<(&PathShape, &ElementAttributes, &GlobalTransform)>,
) {
    for (shape, attrs, global) in paths.iter() {
        if attrs.is_hidden() {
            continue;
        }
        // The hit-test path has a transparent stroke and is skipped here
        let Some(color) = attrs.get("stroke").and_then(parse_color) else {
            continue;
        };

        let polyline: Vec<Vec2> = flatten_path(&shape.geometry, FLATTEN_TOLERANCE)
            .into_iter()
            .map(|p| global.transform_point(p.extend(0.0)).truncate())
            .collect();
        if polyline.len() < 2 {
            continue;
        }

        match attrs.get("stroke-dasharray").and_then(parse_dasharray) {
            Some(pattern) => {
                for (start, end) in dash_segments(&polyline, &pattern) {
                    gizmos.line_2d(start, end, color);
                }
            }
            None => gizmos.linestrip_2d(polyline, color),
        }
    }
}

pub fn render_marker_handles(
    mut gizmos: Gizmos<StrokeGizmoGroup>,
    handles: Query<(&HandleShape, &ElementAttributes, &GlobalTransform)>,
) {
    for (handle, attrs, global) in handles.iter() {
        if attrs.is_hidden() {
            continue;
        }
        let center = global.transform_point(handle.center.extend(0.0)).truncate();
        let stroke = attrs
            .get("stroke")
            .and_then(parse_color)
            .unwrap_or(theme::HANDLE_FALLBACK);
        gizmos.circle_2d(Isometry2d::from_translation(center), handle.radius, stroke);
        if let Some(fill) = attrs.get("fill").and_then(parse_color) {
            gizmos.circle_2d(
                Isometry2d::from_translation(center),
                handle.radius * 0.5,
                fill,
            );
        }
    }
}

/// Outline of the canvas, which spans `(0, 0)` to its size.
pub fn render_canvas_frame(mut gizmos: Gizmos<StrokeGizmoGroup>, document: Res<MarkerDocument>) {
    let size = document.canvas.size;
    gizmos.rect_2d(
        Isometry2d::from_translation(size / 2.0),
        size,
        theme::CANVAS_FRAME,
    );
}
