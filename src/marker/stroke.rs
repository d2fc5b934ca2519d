//! Point store for a single freehand stroke.

use bevy::prelude::*;

/// Ordered point sequence of a stroke, in the marker's local space.
///
/// Insertion order defines draw order and curve topology, so the only
/// ways to change a stored point are [`Stroke::set`] and [`Stroke::scale`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    points: Vec<Vec2>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    /// A stroke needs two points before it has anything to render.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push(point);
    }

    /// Replace the point at `index` in place. Returns false if out of range.
    pub fn set(&mut self, index: usize, point: Vec2) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    /// Multiply every x by `scale_x` and every y by `scale_y`.
    pub fn scale(&mut self, scale_x: f32, scale_y: f32) {
        let factor = Vec2::new(scale_x, scale_y);
        for point in &mut self.points {
            *point *= factor;
        }
    }

    /// Axis-aligned bounds (min, max corners), or None for an empty stroke
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
        )
    }
}
