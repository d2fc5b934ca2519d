//! Shared marker lifecycle: stage, placement, selection and move-drag.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::state::StatePoint;

/// Lifecycle stage of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStage {
    #[default]
    New,
    Creating,
    Select,
    Move,
    Edit,
}

/// Persisted fields owned by the base marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMarkerState {
    #[serde(default)]
    pub stage: MarkerStage,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub offset: StatePoint,
    #[serde(default)]
    pub rotation_angle: f32,
}

impl BaseMarkerState {
    pub fn scaled(&self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            offset: StatePoint {
                x: self.offset.x * scale_x,
                y: self.offset.y * scale_y,
            },
            ..self.clone()
        }
    }
}

/// What a pointer-down landed on, from the marker's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Nothing belonging to this marker
    Outside,
    /// The marker's group or one of its paths
    Body,
    /// Edit handle for the point at this index
    Handle(usize),
}

#[derive(Debug, Clone, Default)]
pub struct MarkerBase {
    stage: MarkerStage,
    notes: Option<String>,
    offset: Vec2,
    rotation: f32,
    selected: bool,
    drag_anchor: Option<Vec2>,
}

impl MarkerBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> MarkerStage {
        self.stage
    }

    pub fn set_stage(&mut self, stage: MarkerStage) {
        self.stage = stage;
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn select(&mut self) {
        self.selected = true;
        if self.stage == MarkerStage::New {
            self.stage = MarkerStage::Select;
        }
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Placement of the marker's local space inside the host space
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.offset.extend(0.0))
            .with_rotation(Quat::from_rotation_z(self.rotation))
    }

    /// Map a host-space point into the marker's local space.
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        Rot2::radians(-self.rotation) * (point - self.offset)
    }

    pub fn is_moving(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Start a move-drag when the body of the marker is grabbed.
    pub fn pointer_down(&mut self, point: Vec2, target: PointerTarget) {
        if target == PointerTarget::Body && self.stage != MarkerStage::Creating {
            self.drag_anchor = Some(point);
            self.stage = MarkerStage::Move;
        }
    }

    /// Returns true if the marker moved
    pub fn pointer_move(&mut self, point: Vec2) -> bool {
        let Some(anchor) = self.drag_anchor else {
            return false;
        };
        self.offset += point - anchor;
        self.drag_anchor = Some(point);
        true
    }

    /// Returns true if a move-drag ended here
    pub fn pointer_up(&mut self, point: Vec2) -> bool {
        if !self.pointer_move(point) {
            return false;
        }
        self.drag_anchor = None;
        self.stage = MarkerStage::Select;
        true
    }

    pub fn scale(&mut self, scale_x: f32, scale_y: f32) {
        self.offset *= Vec2::new(scale_x, scale_y);
    }

    /// An unfinished stroke is saved as selectable.
    pub fn state(&self) -> BaseMarkerState {
        BaseMarkerState {
            stage: settled_stage(self.stage),
            notes: self.notes.clone(),
            offset: self.offset.into(),
            rotation_angle: self.rotation,
        }
    }

    /// Selection and in-flight drags are session state and are not restored.
    pub fn restore(&mut self, state: &BaseMarkerState) {
        self.stage = settled_stage(state.stage);
        self.notes = state.notes.clone();
        self.offset = state.offset.into();
        self.rotation = state.rotation_angle;
        self.drag_anchor = None;
    }
}

fn settled_stage(stage: MarkerStage) -> MarkerStage {
    match stage {
        MarkerStage::Creating => MarkerStage::Select,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_to_local_identity() {
        let base = MarkerBase::new();
        assert_eq!(base.to_local(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_to_local_undoes_offset_and_rotation() {
        let mut base = MarkerBase::new();
        base.restore(&BaseMarkerState {
            offset: StatePoint { x: 10.0, y: 0.0 },
            rotation_angle: FRAC_PI_2,
            ..Default::default()
        });
        // Local (1, 0) rotated a quarter turn lands at (0, 1), then offset
        let local = base.to_local(Vec2::new(10.0, 1.0));
        assert_relative_eq!(local.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(local.y, 0.0, epsilon = 1e-5);
        let world = base.transform().transform_point(local.extend(0.0));
        assert_relative_eq!(world.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(world.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_body_drag_moves_offset() {
        let mut base = MarkerBase::new();
        base.select();
        base.pointer_down(Vec2::new(1.0, 1.0), PointerTarget::Body);
        assert_eq!(base.stage(), MarkerStage::Move);
        assert!(base.pointer_move(Vec2::new(4.0, 5.0)));
        assert!(base.pointer_up(Vec2::new(6.0, 5.0)));
        assert_eq!(base.offset(), Vec2::new(5.0, 4.0));
        assert_eq!(base.stage(), MarkerStage::Select);
        assert!(!base.is_moving());
    }

    #[test]
    fn test_handle_or_outside_does_not_move() {
        let mut base = MarkerBase::new();
        base.pointer_down(Vec2::ZERO, PointerTarget::Handle(0));
        assert!(!base.pointer_move(Vec2::ONE));
        base.pointer_down(Vec2::ZERO, PointerTarget::Outside);
        assert!(!base.pointer_up(Vec2::ONE));
        assert_eq!(base.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_state_roundtrip_and_scale() {
        let mut base = MarkerBase::new();
        base.set_notes(Some("check this".to_string()));
        base.set_stage(MarkerStage::Select);
        base.restore(&BaseMarkerState {
            offset: StatePoint { x: 2.0, y: 3.0 },
            ..base.state()
        });
        base.scale(2.0, 3.0);
        let state = base.state();
        assert_eq!(state.offset, StatePoint { x: 4.0, y: 9.0 });
        assert_eq!(state.notes.as_deref(), Some("check this"));

        let mut restored = MarkerBase::new();
        restored.restore(&state);
        assert_eq!(restored.state(), state);
    }

    #[test]
    fn test_creating_stage_restores_as_movable() {
        let mut base = MarkerBase::new();
        base.restore(&BaseMarkerState {
            stage: MarkerStage::Creating,
            ..Default::default()
        });
        assert_eq!(base.stage(), MarkerStage::Select);

        base.pointer_down(Vec2::ZERO, PointerTarget::Body);
        assert!(base.pointer_up(Vec2::new(2.0, 3.0)));
        assert_eq!(base.offset(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_creating_stage_is_saved_as_select() {
        let mut base = MarkerBase::new();
        base.set_stage(MarkerStage::Creating);
        assert_eq!(base.state().stage, MarkerStage::Select);
        assert_eq!(base.stage(), MarkerStage::Creating);
    }
}
