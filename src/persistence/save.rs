//! Document save system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::UpdateLastDocumentPathRequest;
use crate::editor::MarkerDocument;

use super::format::write_document;
use super::messages::SaveDocumentRequest;
use super::resources::{AsyncDocumentOperation, DocumentSaveError, SaveDocumentTask};
use super::results::SaveResult;

/// Starts an async save operation
pub fn save_document_system(
    mut commands: Commands,
    mut events: MessageReader<SaveDocumentRequest>,
    document: Res<MarkerDocument>,
    mut async_op: ResMut<AsyncDocumentOperation>,
) {
    for event in events.read() {
        // Don't start a new save if one is already in progress
        if async_op.is_busy() {
            warn!("Save operation already in progress");
            continue;
        }

        // Snapshot on the main thread; the task only serializes and writes
        let file = document.to_file();
        let path = event.path.clone();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        async_op.is_saving = true;
        async_op.operation_description = Some(format!("Saving {}...", name));
        debug!("Saving {} markers to {:?}", file.markers.len(), path);

        let task = IoTaskPool::get().spawn(async move {
            let error = write_document(&path, &file)
                .err()
                .map(|e| format!("Failed to save {}: {}", path.display(), e));
            SaveResult { path, error }
        });

        commands.spawn(SaveDocumentTask(task));
    }
}

/// Polls save tasks and handles completion
pub fn poll_save_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut SaveDocumentTask)>,
    mut async_op: ResMut<AsyncDocumentOperation>,
    mut document: ResMut<MarkerDocument>,
    mut save_error: ResMut<DocumentSaveError>,
    mut config_events: MessageWriter<UpdateLastDocumentPathRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };

        async_op.is_saving = false;
        async_op.operation_description = None;

        match result.error {
            None => {
                info!("Document saved to {:?}", result.path);
                save_error.message = None;
                document.path = Some(result.path.clone());
                document.mark_clean();
                config_events.write(UpdateLastDocumentPathRequest { path: result.path });
            }
            Some(error) => {
                error!("{}", error);
                save_error.message = Some(error);
            }
        }

        commands.entity(entity).despawn();
    }
}
