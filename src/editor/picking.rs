//! Hit testing of rendered marker elements under the cursor.

use bevy::prelude::*;

use crate::constants::FLATTEN_TOLERANCE;
use crate::marker::{ElementAttributes, HandleShape, PathShape, flatten_path};

/// Distance from `point` to the segment `seg_start`..`seg_end`
pub fn distance_to_segment(point: Vec2, seg_start: Vec2, seg_end: Vec2) -> f32 {
    let line_vec = seg_end - seg_start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        // Segment is essentially a point
        return point.distance(seg_start);
    }

    // Project point onto line, clamped to segment
    let t = ((point - seg_start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    point.distance(seg_start + line_vec * t)
}

/// Smallest distance from `point` to any segment of `polyline`
pub fn distance_to_polyline(point: Vec2, polyline: &[Vec2]) -> Option<f32> {
    match polyline {
        [] => None,
        [only] => Some(point.distance(*only)),
        _ => polyline
            .windows(2)
            .map(|w| distance_to_segment(point, w[0], w[1]))
            .min_by(f32::total_cmp),
    }
}

/// Map a world-space point into an element's local space.
pub fn to_local(global: &GlobalTransform, point: Vec2) -> Vec2 {
    global
        .affine()
        .inverse()
        .transform_point3(point.extend(0.0))
        .truncate()
}

/// Distance to a path's centerline if `local` lies within its stroke.
pub fn path_hit_distance(local: Vec2, shape: &PathShape, attrs: &ElementAttributes) -> Option<f32> {
    if attrs.is_hidden() {
        return None;
    }
    let polyline = flatten_path(&shape.geometry, FLATTEN_TOLERANCE);
    let distance = distance_to_polyline(local, &polyline)?;
    (distance <= attrs.stroke_width() / 2.0).then_some(distance)
}

/// Distance to a handle's center if `local` lies inside it.
pub fn handle_hit_distance(
    local: Vec2,
    handle: &HandleShape,
    attrs: &ElementAttributes,
) -> Option<f32> {
    if attrs.is_hidden() {
        return None;
    }
    let distance = local.distance(handle.center);
    (distance <= handle.radius).then_some(distance)
}

/// Pick the element under `point`: the nearest visible handle wins,
/// then the nearest path whose stroke covers the point.
pub fn pick_target<'a>(
    point: Vec2,
    handles: impl IntoIterator<
        Item = (Entity, &'a HandleShape, &'a ElementAttributes, &'a GlobalTransform),
    >,
    paths: impl IntoIterator<Item = (Entity, &'a PathShape, &'a ElementAttributes, &'a GlobalTransform)>,
) -> Option<Entity> {
    let nearest = |hits: Vec<(Entity, f32)>| {
        hits.into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, _)| entity)
    };

    let handle_hits: Vec<_> = handles
        .into_iter()
        .filter_map(|(entity, handle, attrs, global)| {
            handle_hit_distance(to_local(global, point), handle, attrs).map(|d| (entity, d))
        })
        .collect();
    if let Some(entity) = nearest(handle_hits) {
        return Some(entity);
    }

    let path_hits: Vec<_> = paths
        .into_iter()
        .filter_map(|(entity, shape, attrs, global)| {
            path_hit_distance(to_local(global, point), shape, attrs).map(|d| (entity, d))
        })
        .collect();
    nearest(path_hits)
}
