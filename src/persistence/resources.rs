//! Resource types for document persistence state tracking.

use bevy::prelude::*;
use bevy::tasks::Task;

use super::results::{LoadResult, SaveResult};

#[derive(Resource, Default)]
pub struct DocumentLoadError {
    pub message: Option<String>,
}

/// Resource tracking save operation errors for display to user.
#[derive(Resource, Default)]
pub struct DocumentSaveError {
    pub message: Option<String>,
}

/// Resource tracking async document I/O for the busy modal
#[derive(Resource, Default)]
pub struct AsyncDocumentOperation {
    pub is_saving: bool,
    pub is_loading: bool,
    /// Description of the current operation
    pub operation_description: Option<String>,
}

impl AsyncDocumentOperation {
    pub fn is_busy(&self) -> bool {
        self.is_saving || self.is_loading
    }
}

/// Component for save task
#[derive(Component)]
pub struct SaveDocumentTask(pub Task<SaveResult>);

/// Component for load task
#[derive(Component)]
pub struct LoadDocumentTask(pub Task<LoadResult>);
