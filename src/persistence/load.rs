//! Document load system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;

use crate::config::UpdateLastDocumentPathRequest;
use crate::editor::{MarkerCommand, PendingMarkerCommands};

use super::format::read_document;
use super::messages::LoadDocumentRequest;
use super::resources::{AsyncDocumentOperation, DocumentLoadError, LoadDocumentTask};
use super::results::LoadResult;

/// Starts an async load operation (file I/O and parsing only)
pub fn load_document_system(
    mut commands: Commands,
    mut events: MessageReader<LoadDocumentRequest>,
    mut async_op: ResMut<AsyncDocumentOperation>,
) {
    for event in events.read() {
        if async_op.is_busy() {
            warn!("Load operation already in progress");
            continue;
        }

        let path = event.path.clone();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        async_op.is_loading = true;
        async_op.operation_description = Some(format!("Loading {}...", name));

        let task = IoTaskPool::get().spawn(async move {
            match read_document(&path) {
                Ok(document) => LoadResult {
                    path,
                    document: Some(document),
                    error: None,
                },
                Err(e) => LoadResult {
                    error: Some(format!("Failed to load {}: {}", path.display(), e)),
                    path,
                    document: None,
                },
            }
        });

        commands.spawn(LoadDocumentTask(task));
    }
}

/// Polls load tasks and queues the parsed document for the editor
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadDocumentTask)>,
    mut async_op: ResMut<AsyncDocumentOperation>,
    mut load_error: ResMut<DocumentLoadError>,
    mut pending: ResMut<PendingMarkerCommands>,
    mut config_events: MessageWriter<UpdateLastDocumentPathRequest>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };

        async_op.is_loading = false;
        async_op.operation_description = None;
        load_error.message = None;
        commands.entity(entity).despawn();

        if let Some(error) = result.error {
            error!("{}", error);
            load_error.message = Some(error);
            continue;
        }
        let Some(file) = result.document else {
            continue;
        };

        info!(
            "Loaded {} markers from {:?}",
            file.markers.len(),
            result.path
        );
        config_events.write(UpdateLastDocumentPathRequest {
            path: result.path.clone(),
        });
        pending.push(MarkerCommand::ReplaceDocument {
            file,
            path: result.path,
        });
    }
}
