//! Starting a fresh document.

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::editor::{Canvas, MarkerCommand, PendingMarkerCommands, is_valid_canvas_size};

use super::messages::NewDocumentRequest;

pub fn new_document_system(
    mut events: MessageReader<NewDocumentRequest>,
    config: Res<AppConfig>,
    mut pending: ResMut<PendingMarkerCommands>,
) {
    for _ in events.read() {
        let configured = config.data.canvas_size.as_vec2();
        let canvas = if is_valid_canvas_size(configured) {
            Canvas::new(configured)
        } else {
            Canvas::default()
        };
        pending.push(MarkerCommand::NewDocument(canvas));
        info!("Created new document");
    }
}
