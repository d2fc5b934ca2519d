//! Document persistence: saving and loading drawings as JSON files.
//!
//! File I/O runs on the [`IoTaskPool`](bevy::tasks::IoTaskPool). Loaded
//! documents are handed to the editor through its command queue, so the
//! markers are rebuilt in the same place every other marker change happens.
//!
//! ## Module Structure
//!
//! - [`format`] - On-disk layout and read/write helpers
//! - [`messages`] - Message types for document operations
//! - [`resources`] - Error and busy-state resources
//! - [`save`] / [`load`] - Async systems and task polling

mod document_state;
pub mod format;
mod load;
mod messages;
mod resources;
mod results;
mod save;


use bevy::prelude::*;

pub use format::{CanvasRecord, DocumentFile};
pub use messages::{LoadDocumentRequest, NewDocumentRequest, SaveDocumentRequest};
pub use resources::{AsyncDocumentOperation, DocumentLoadError, DocumentSaveError};

pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AsyncDocumentOperation>()
            .init_resource::<DocumentLoadError>()
            .init_resource::<DocumentSaveError>()
            .add_message::<SaveDocumentRequest>()
            .add_message::<LoadDocumentRequest>()
            .add_message::<NewDocumentRequest>()
            .add_systems(
                Update,
                (
                    save::save_document_system.run_if(on_message::<SaveDocumentRequest>),
                    save::poll_save_tasks,
                    load::load_document_system.run_if(on_message::<LoadDocumentRequest>),
                    load::poll_load_tasks,
                    document_state::new_document_system.run_if(on_message::<NewDocumentRequest>),
                ),
            );
    }
}
