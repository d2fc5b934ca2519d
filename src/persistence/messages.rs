//! Message types for document persistence operations.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct SaveDocumentRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct LoadDocumentRequest {
    pub path: PathBuf,
}

/// Discard every marker and start over on a blank canvas
#[derive(Message)]
pub struct NewDocumentRequest;
