//! Background image display for the canvas.

use bevy::prelude::*;
use std::path::PathBuf;

use super::document::MarkerDocument;

/// Sprite showing the document's background image
#[derive(Component)]
pub struct CanvasBackground {
    pub path: PathBuf,
    pub size: Vec2,
}

/// Keep the background sprite in step with the document's canvas.
pub fn sync_canvas_background(
    mut commands: Commands,
    document: Res<MarkerDocument>,
    asset_server: Res<AssetServer>,
    backgrounds: Query<(Entity, &CanvasBackground)>,
) {
    if !document.is_changed() {
        return;
    }
    let canvas = &document.canvas;

    let mut current = None;
    for (entity, background) in backgrounds.iter() {
        let up_to_date = canvas.background_image.as_ref() == Some(&background.path)
            && background.size == canvas.size;
        if up_to_date && current.is_none() {
            current = Some(entity);
        } else {
            commands.entity(entity).despawn();
        }
    }

    if current.is_some() {
        return;
    }
    let Some(path) = canvas.background_image.clone() else {
        return;
    };

    info!("Showing background image {:?}", path);
    let texture: Handle<Image> = asset_server.load(path.clone());
    commands.spawn((
        Sprite {
            image: texture,
            custom_size: Some(canvas.size),
            ..default()
        },
        Transform::from_translation((canvas.size / 2.0).extend(-1.0)),
        CanvasBackground {
            path,
            size: canvas.size,
        },
    ));
}
