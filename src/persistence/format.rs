//! On-disk document layout and its read/write helpers.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::DOCUMENT_VERSION;
use crate::editor::is_valid_canvas_size;
use crate::marker::MarkerState;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported document version {0} (expected {DOCUMENT_VERSION})")]
    UnsupportedVersion(u32),
    #[error("Invalid canvas size {width} x {height}")]
    InvalidCanvas { width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRecord {
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,
}

impl CanvasRecord {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A saved drawing: canvas description plus every marker record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub version: u32,
    pub canvas: CanvasRecord,
    #[serde(default)]
    pub markers: Vec<MarkerState>,
}

impl DocumentFile {
    pub fn new(canvas: CanvasRecord, markers: Vec<MarkerState>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            canvas,
            markers,
        }
    }
}

pub fn parse_document(json: &str) -> Result<DocumentFile, DocumentError> {
    let document: DocumentFile = serde_json::from_str(json)?;
    if document.version != DOCUMENT_VERSION {
        return Err(DocumentError::UnsupportedVersion(document.version));
    }
    if !is_valid_canvas_size(document.canvas.size()) {
        return Err(DocumentError::InvalidCanvas {
            width: document.canvas.width,
            height: document.canvas.height,
        });
    }
    Ok(document)
}

pub fn read_document(path: &Path) -> Result<DocumentFile, DocumentError> {
    let json = std::fs::read_to_string(path)?;
    parse_document(&json)
}

pub fn write_document(path: &Path, document: &DocumentFile) -> Result<(), DocumentError> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json)?;
    Ok(())
}
