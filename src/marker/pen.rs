//! The pen marker: freehand stroke capture, point editing, style and scale.

use bevy::prelude::*;

use super::base::{MarkerBase, MarkerStage, PointerTarget};
use super::path::PathMode;
use super::settings::MarkerSettings;
use super::state::{PenMarkerState, PEN_TYPE_NAME};
use super::stroke::Stroke;
use super::style::{Style, StyleChange, ToolboxPanel};
use super::surface::DrawingSurface;
use super::visual::{VisualSnapshot, VisualSynchronizer};

/// Whether the marker is currently capturing points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPhase {
    #[default]
    Idle,
    Drawing,
}

/// Freehand stroke marker.
///
/// Pointer positions are given in host space and mapped into the marker's
/// local space through the base marker. Every model mutation ends in a
/// refresh of the visuals.
#[derive(Debug, Clone)]
pub struct PenMarker {
    base: MarkerBase,
    stroke: Stroke,
    style: Style,
    mode: PathMode,
    phase: DrawPhase,
    grabbed_handle: Option<usize>,
    min_point_distance: Option<f32>,
    visual: VisualSynchronizer,
}

impl PenMarker {
    pub const TYPE_NAME: &'static str = PEN_TYPE_NAME;

    pub fn new(settings: &MarkerSettings, mode: PathMode) -> Self {
        Self {
            base: MarkerBase::new(),
            stroke: Stroke::new(),
            style: Style::from_settings(settings),
            mode,
            phase: DrawPhase::Idle,
            grabbed_handle: None,
            min_point_distance: settings.min_point_distance,
            visual: VisualSynchronizer::new(settings),
        }
    }

    /// Start from `style` instead of the settings defaults.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn base(&self) -> &MarkerBase {
        &self.base
    }

    pub fn points(&self) -> &[Vec2] {
        self.stroke.points()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn path_mode(&self) -> PathMode {
        self.mode
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == DrawPhase::Drawing
    }

    pub fn grabbed_handle(&self) -> Option<usize> {
        self.grabbed_handle
    }

    pub fn visual(&self) -> &VisualSynchronizer {
        &self.visual
    }

    /// True if `target` is this marker's group, one of its paths, or a handle.
    pub fn owns_target(&self, target: Entity) -> bool {
        self.visual.owns(target)
    }

    fn classify(&self, target: Option<Entity>) -> PointerTarget {
        match target {
            Some(entity) => match self.visual.handle_index(entity) {
                Some(index) => PointerTarget::Handle(index),
                None if self.visual.owns(entity) => PointerTarget::Body,
                None => PointerTarget::Outside,
            },
            None => PointerTarget::Outside,
        }
    }

    /// Push the current model to the visuals, allocating them first if asked.
    fn sync_visual<S: DrawingSurface>(&mut self, surface: &mut S, create: bool) {
        let snapshot = VisualSnapshot {
            points: self.stroke.points(),
            mode: self.mode,
            style: &self.style,
            transform: self.base.transform(),
            show_handles: self.base.is_selected() && self.phase == DrawPhase::Idle,
        };
        if create {
            self.visual.create_visual(surface, snapshot);
        } else {
            self.visual.refresh(surface, snapshot);
        }
    }

    /// Re-derive the rendered elements from the current model.
    pub fn refresh<S: DrawingSurface>(&mut self, surface: &mut S) {
        self.sync_visual(surface, false);
    }

    pub fn pointer_down<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        point: Vec2,
        target: Option<Entity>,
    ) {
        // A press without a matching release leaves the stroke open
        if self.phase == DrawPhase::Drawing {
            self.finish_stroke(surface);
        }

        let target = self.classify(target);
        self.base.pointer_down(point, target);

        match target {
            PointerTarget::Handle(index) if self.phase == DrawPhase::Idle => {
                self.grabbed_handle = Some(index);
                self.base.set_stage(MarkerStage::Edit);
            }
            PointerTarget::Body if self.phase == DrawPhase::Idle => {}
            _ => {
                let local = self.base.to_local(point);
                self.stroke.clear();
                self.stroke.push(local);
                self.phase = DrawPhase::Drawing;
                self.grabbed_handle = None;
                self.base.set_stage(MarkerStage::Creating);
                self.sync_visual(surface, true);
                debug!("Pen stroke started at {:?}", local);
            }
        }
    }

    pub fn pointer_move<S: DrawingSurface>(&mut self, surface: &mut S, point: Vec2) {
        if self.base.pointer_move(point) {
            self.refresh(surface);
            return;
        }

        match self.phase {
            DrawPhase::Drawing => {
                let local = self.base.to_local(point);
                if let (Some(min), Some(last)) = (self.min_point_distance, self.stroke.last())
                    && local.distance(last) < min
                {
                    return;
                }
                self.stroke.push(local);
                self.refresh(surface);
            }
            DrawPhase::Idle => {
                if let Some(index) = self.grabbed_handle {
                    let local = self.base.to_local(point);
                    self.edit_point(surface, index, local);
                }
            }
        }
    }

    pub fn pointer_up<S: DrawingSurface>(&mut self, surface: &mut S, point: Vec2) {
        if self.base.pointer_up(point) {
            self.refresh(surface);
            return;
        }

        match self.phase {
            DrawPhase::Drawing => {
                let local = self.base.to_local(point);
                self.stroke.push(local);
                self.finish_stroke(surface);
            }
            DrawPhase::Idle => {
                if let Some(index) = self.grabbed_handle.take() {
                    let local = self.base.to_local(point);
                    self.base.set_stage(MarkerStage::Select);
                    self.edit_point(surface, index, local);
                }
            }
        }
    }

    /// End the drawing session with the points captured so far.
    pub fn finish_stroke<S: DrawingSurface>(&mut self, surface: &mut S) {
        if self.phase != DrawPhase::Drawing {
            return;
        }
        self.phase = DrawPhase::Idle;
        self.base.set_stage(MarkerStage::Select);
        self.refresh(surface);
        debug!("Pen stroke finished with {} points", self.stroke.len());
    }

    /// Move the point at `index` (local space) and refresh once.
    ///
    /// Out-of-range indices leave the stroke and visuals untouched.
    pub fn edit_point<S: DrawingSurface>(&mut self, surface: &mut S, index: usize, point: Vec2) -> bool {
        if self.phase == DrawPhase::Drawing || !self.stroke.set(index, point) {
            debug!("Ignoring edit of point {} ({} points)", index, self.stroke.len());
            return false;
        }
        self.refresh(surface);
        true
    }

    pub fn set_stroke_color<S: DrawingSurface>(&mut self, surface: &mut S, color: impl Into<String>) {
        self.style.set_stroke_color(color);
        self.refresh(surface);
    }

    pub fn set_stroke_width<S: DrawingSurface>(&mut self, surface: &mut S, width: f32) {
        if self.style.set_stroke_width(width) {
            self.refresh(surface);
        }
    }

    pub fn set_stroke_dasharray<S: DrawingSurface>(&mut self, surface: &mut S, pattern: Option<String>) {
        self.style.set_stroke_dasharray(pattern);
        self.refresh(surface);
    }

    /// Route a toolbox panel change to the matching setter.
    pub fn apply_style_change<S: DrawingSurface>(&mut self, surface: &mut S, change: &StyleChange) {
        match change {
            StyleChange::StrokeColor(color) => self.set_stroke_color(surface, color.clone()),
            StyleChange::StrokeWidth(width) => self.set_stroke_width(surface, *width),
            StyleChange::StrokeDasharray(pattern) => {
                self.set_stroke_dasharray(surface, pattern.clone())
            }
        }
    }

    pub fn toolbox_panels(&self, settings: &MarkerSettings) -> Vec<ToolboxPanel> {
        ToolboxPanel::for_style(&self.style, settings)
    }

    pub fn select<S: DrawingSurface>(&mut self, surface: &mut S) {
        self.base.select();
        self.refresh(surface);
    }

    pub fn deselect<S: DrawingSurface>(&mut self, surface: &mut S) {
        self.base.deselect();
        self.grabbed_handle = None;
        self.refresh(surface);
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.base.set_notes(notes);
    }

    pub fn get_state(&self) -> PenMarkerState {
        PenMarkerState::compose(&self.style, self.mode, self.stroke.points(), self.base.state())
    }

    /// Load `state` and rebuild the visuals from scratch.
    ///
    /// Returns false, changing nothing, if the record belongs to another
    /// marker type.
    pub fn restore_state<S: DrawingSurface>(&mut self, surface: &mut S, state: &PenMarkerState) -> bool {
        if state.type_name != Self::TYPE_NAME {
            warn!(
                "Refusing to restore `{}` state into a pen marker",
                state.type_name
            );
            return false;
        }

        self.base.restore(&state.base);
        self.stroke = Stroke::from_points(state.point_vec());
        self.style = state.style();
        self.mode = state.path_mode;
        self.phase = DrawPhase::Idle;
        self.grabbed_handle = None;

        self.sync_visual(surface, true);
        self.refresh(surface);
        true
    }

    /// Scale every point (and the base placement) by the given factors.
    ///
    /// Zero or non-finite factors are ignored.
    pub fn scale<S: DrawingSurface>(&mut self, surface: &mut S, scale_x: f32, scale_y: f32) {
        let valid = |s: f32| s.is_finite() && s != 0.0;
        if !valid(scale_x) || !valid(scale_y) {
            warn!("Ignoring invalid marker scale ({}, {})", scale_x, scale_y);
            return;
        }
        self.stroke.scale(scale_x, scale_y);
        self.base.scale(scale_x, scale_y);
        self.refresh(surface);
    }

    /// Remove all rendered elements. The model is kept.
    pub fn destroy<S: DrawingSurface>(&mut self, surface: &mut S) {
        self.visual.destroy(surface);
    }
}
