//! Result types for async document operations.

use std::path::PathBuf;

use super::format::DocumentFile;

/// Result of an async save operation
pub struct SaveResult {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Result of an async load operation
pub struct LoadResult {
    pub path: PathBuf,
    pub document: Option<DocumentFile>,
    pub error: Option<String>,
}
