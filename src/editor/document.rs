//! The open document: canvas plus every marker drawn on it.

use bevy::prelude::*;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, MIN_CANVAS_EDGE};
use crate::marker::{DrawingSurface, MarkerSettings, MarkerState, PenMarker};
use crate::persistence::{CanvasRecord, DocumentFile};

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub size: Vec2,
    pub background_image: Option<PathBuf>,
}

impl Canvas {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            background_image: None,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT))
    }
}

impl From<&CanvasRecord> for Canvas {
    fn from(record: &CanvasRecord) -> Self {
        Self {
            size: record.size(),
            background_image: record.background_image.clone(),
        }
    }
}

impl From<&Canvas> for CanvasRecord {
    fn from(canvas: &Canvas) -> Self {
        Self {
            width: canvas.size.x,
            height: canvas.size.y,
            background_image: canvas.background_image.clone(),
        }
    }
}

/// Canvas edges must be finite and at least [`MIN_CANVAS_EDGE`].
pub fn is_valid_canvas_size(size: Vec2) -> bool {
    size.is_finite() && size.x >= MIN_CANVAS_EDGE && size.y >= MIN_CANVAS_EDGE
}

/// Markers are kept in drawing order; indices are stable until a removal.
#[derive(Resource)]
pub struct MarkerDocument {
    markers: Vec<PenMarker>,
    selected: Option<usize>,
    /// Marker receiving the current pointer drag
    active: Option<usize>,
    pub canvas: Canvas,
    /// File the document was last saved to or loaded from
    pub path: Option<PathBuf>,
    dirty: bool,
}

impl MarkerDocument {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            markers: Vec::new(),
            selected: None,
            active: None,
            canvas,
            path: None,
            dirty: false,
        }
    }

    pub fn markers(&self) -> &[PenMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker_mut(&mut self, index: usize) -> Option<&mut PenMarker> {
        self.markers.get_mut(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_marker(&self) -> Option<&PenMarker> {
        self.selected.and_then(|i| self.markers.get(i))
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.markers.len());
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Display name for the title bar and dialogs
    pub fn name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }

    /// Index of the marker owning `entity`, if any
    pub fn marker_for_target(&self, entity: Entity) -> Option<usize> {
        self.markers.iter().position(|m| m.owns_target(entity))
    }

    pub fn add_marker(&mut self, marker: PenMarker) -> usize {
        self.markers.push(marker);
        self.dirty = true;
        self.markers.len() - 1
    }

    /// Select `index` (or nothing), deselecting the previous selection.
    pub fn select<S: DrawingSurface>(&mut self, surface: &mut S, index: Option<usize>) {
        let index = index.filter(|&i| i < self.markers.len());
        if self.selected == index {
            return;
        }
        if let Some(previous) = self.selected.and_then(|i| self.markers.get_mut(i)) {
            previous.deselect(surface);
        }
        if let Some(marker) = index.and_then(|i| self.markers.get_mut(i)) {
            marker.select(surface);
        }
        self.selected = index;
    }

    /// Destroy the marker at `index` and drop it from the document.
    pub fn remove<S: DrawingSurface>(&mut self, surface: &mut S, index: usize) -> bool {
        if index >= self.markers.len() {
            return false;
        }
        let mut marker = self.markers.remove(index);
        marker.destroy(surface);

        let shift = |slot: Option<usize>| match slot {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(i - 1),
            other => other,
        };
        self.selected = shift(self.selected);
        self.active = shift(self.active);
        self.dirty = true;
        true
    }

    pub fn delete_selected<S: DrawingSurface>(&mut self, surface: &mut S) -> bool {
        match self.selected {
            Some(index) => self.remove(surface, index),
            None => false,
        }
    }

    /// Destroy every marker.
    pub fn clear<S: DrawingSurface>(&mut self, surface: &mut S) {
        for marker in &mut self.markers {
            marker.destroy(surface);
        }
        self.markers.clear();
        self.selected = None;
        self.active = None;
    }

    /// Scale every marker by the given per-axis factors.
    pub fn scale_all<S: DrawingSurface>(&mut self, surface: &mut S, scale_x: f32, scale_y: f32) {
        for marker in &mut self.markers {
            marker.scale(surface, scale_x, scale_y);
        }
    }

    /// Change the canvas size, scaling every marker to keep its relative
    /// position. Returns false for an invalid size.
    pub fn resize_canvas<S: DrawingSurface>(&mut self, surface: &mut S, size: Vec2) -> bool {
        if !is_valid_canvas_size(size) {
            warn!("Ignoring invalid canvas size {:?}", size);
            return false;
        }
        if !is_valid_canvas_size(self.canvas.size) {
            warn!("Current canvas size {:?} is invalid, not scaling markers", self.canvas.size);
            return false;
        }
        if size == self.canvas.size {
            return true;
        }
        let factor = size / self.canvas.size;
        self.scale_all(surface, factor.x, factor.y);
        info!(
            "Canvas resized from {:?} to {:?}, scaled {} markers",
            self.canvas.size,
            size,
            self.markers.len()
        );
        self.canvas.size = size;
        self.dirty = true;
        true
    }

    pub fn to_file(&self) -> DocumentFile {
        DocumentFile::new(
            CanvasRecord::from(&self.canvas),
            self.markers
                .iter()
                .map(|m| MarkerState::from(m.get_state()))
                .collect(),
        )
    }

    /// Replace the whole document with `file`, returning how many markers
    /// were restored.
    pub fn load_file<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        file: &DocumentFile,
        settings: &MarkerSettings,
    ) -> usize {
        self.clear(surface);
        self.canvas = Canvas::from(&file.canvas);

        for state in &file.markers {
            match state {
                MarkerState::Pen(pen) => {
                    let mut marker = PenMarker::new(settings, pen.path_mode);
                    if marker.restore_state(surface, pen) {
                        self.markers.push(marker);
                    }
                }
            }
        }

        self.dirty = false;
        self.markers.len()
    }

    /// Start over with no markers on `canvas`.
    pub fn reset<S: DrawingSurface>(&mut self, surface: &mut S, canvas: Canvas) {
        self.clear(surface);
        self.canvas = canvas;
        self.path = None;
        self.dirty = false;
    }
}
