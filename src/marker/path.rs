//! Path generation: turns a point sequence into drawable path geometry.

use bevy::prelude::*;
use kurbo::{BezPath, PathEl, Point};
use serde::{Deserialize, Serialize};

/// How a stroke's points are connected when the path is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    /// Quadratic segments through inter-point midpoints
    #[default]
    Smoothed,
    /// Straight segments between captured points
    Polyline,
}

impl PathMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            PathMode::Smoothed => "Smoothed",
            PathMode::Polyline => "Polyline",
        }
    }
}

fn to_point(v: Vec2) -> Point {
    Point::new(v.x as f64, v.y as f64)
}

fn to_vec2(p: Point) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

/// Build the path for `points`. Fewer than two points yield an empty path.
///
/// In smoothed mode every interior point becomes the control point of a
/// quadratic segment ending at the midpoint between it and its successor;
/// a final line segment reaches the last point.
pub fn generate_path(points: &[Vec2], mode: PathMode) -> BezPath {
    let mut path = BezPath::new();
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return path;
    };
    if points.len() < 2 {
        return path;
    }

    path.move_to(to_point(first));
    match mode {
        PathMode::Polyline => {
            for &point in &points[1..] {
                path.line_to(to_point(point));
            }
        }
        PathMode::Smoothed => {
            for pair in points[1..].windows(2) {
                let control = to_point(pair[0]);
                let end = control.midpoint(to_point(pair[1]));
                path.quad_to(control, end);
            }
            path.line_to(to_point(last));
        }
    }
    path
}

/// SVG path data (`d` attribute) for a generated path.
pub fn path_data(path: &BezPath) -> String {
    path.to_svg()
}

/// Approximate the path with line segments within `tolerance`.
pub fn flatten_path(path: &BezPath, tolerance: f64) -> Vec<Vec2> {
    let mut polyline = Vec::new();
    path.flatten(tolerance, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => polyline.push(to_vec2(p)),
        _ => {}
    });
    polyline
}
