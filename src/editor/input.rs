//! Pointer input and the marker command queue.
//!
//! Regular systems push [`MarkerCommand`]s in the order they happen. A
//! single exclusive system drains the queue, so every marker mutation runs
//! with `&mut World` as the drawing surface and nothing else touching it.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::marker::style::Style;
use crate::marker::{
    DrawingSurface, ElementAttributes, HandleShape, MarkerSettings, PathShape, PenMarker,
    StyleChange,
};
use crate::persistence::DocumentFile;

use super::camera::{EditorCamera, cursor_world_position};
use super::document::{Canvas, MarkerDocument};
use super::picking::pick_target;
use super::tools::{CurrentTool, EditorTool, PenToolStyle};

#[derive(Debug, Clone)]
pub enum MarkerCommand {
    PointerDown { point: Vec2, target: Option<Entity> },
    PointerMove { point: Vec2 },
    PointerUp { point: Vec2 },
    ClearSelection,
    DeleteSelected,
    /// Style change from a toolbox panel. Goes to the selected marker, or to
    /// the pen defaults when nothing is selected.
    ApplyStyle(StyleChange),
    SetNotes(Option<String>),
    ResizeCanvas(Vec2),
    SetBackground(Option<PathBuf>),
    ReplaceDocument { file: DocumentFile, path: PathBuf },
    NewDocument(Canvas),
}

#[derive(Resource, Default)]
pub struct PendingMarkerCommands {
    commands: Vec<MarkerCommand>,
}

impl PendingMarkerCommands {
    pub fn push(&mut self, command: MarkerCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn take(&mut self) -> Vec<MarkerCommand> {
        std::mem::take(&mut self.commands)
    }
}

/// Tracks the primary button between frames
#[derive(Resource, Default)]
pub struct PointerState {
    pub pressed: bool,
    pub last_position: Option<Vec2>,
}

/// Everything besides the document that commands read or update
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub tool: EditorTool,
    pub settings: MarkerSettings,
    pub pen_style: Style,
}

/// Finish a press. Runs while dialogs are open so a release is never lost.
pub fn collect_pointer_release(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    mut pointer: ResMut<PointerState>,
    mut pending: ResMut<PendingMarkerCommands>,
) {
    if !pointer.pressed || !mouse_button.just_released(MouseButton::Left) {
        return;
    }
    let world_pos = match (window_query.single(), camera_query.single()) {
        (Ok(window), Ok((camera, camera_transform))) => {
            cursor_world_position(window, camera, camera_transform)
        }
        _ => None,
    };
    if let Some(point) = world_pos.or(pointer.last_position) {
        pending.push(MarkerCommand::PointerUp { point });
    }
    pointer.pressed = false;
    pointer.last_position = None;
}

#[allow(clippy::too_many_arguments)]
pub fn collect_pointer_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    handles: Query<(Entity, &HandleShape, &ElementAttributes, &GlobalTransform)>,
    paths: Query<(Entity, &PathShape, &ElementAttributes, &GlobalTransform)>,
    mut pointer: ResMut<PointerState>,
    mut pending: ResMut<PendingMarkerCommands>,
    mut contexts: EguiContexts,
) {
    let world_pos = match (window_query.single(), camera_query.single()) {
        (Ok(window), Ok((camera, camera_transform))) => {
            cursor_world_position(window, camera, camera_transform)
        }
        _ => None,
    };

    let Some(point) = world_pos else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left) {
        // Clicks on egui panels never reach the canvas
        if let Ok(ctx) = contexts.ctx_mut()
            && ctx.is_pointer_over_area()
        {
            return;
        }
        let target = pick_target(point, handles.iter(), paths.iter());
        pending.push(MarkerCommand::PointerDown { point, target });
        pointer.pressed = true;
        pointer.last_position = Some(point);
    } else if pointer.pressed
        && mouse_button.pressed(MouseButton::Left)
        && pointer.last_position != Some(point)
    {
        pending.push(MarkerCommand::PointerMove { point });
        pointer.last_position = Some(point);
    }
}

/// Drain the command queue against the document.
pub fn apply_marker_commands(world: &mut World) {
    let commands = world.resource_mut::<PendingMarkerCommands>().take();
    if commands.is_empty() {
        return;
    }

    let mut context = CommandContext {
        tool: world.resource::<CurrentTool>().tool,
        settings: world.resource::<AppConfig>().data.marker_settings.clone(),
        pen_style: world.resource::<PenToolStyle>().style.clone(),
    };

    world.resource_scope(|world, mut document: Mut<MarkerDocument>| {
        for command in commands {
            apply_command(world, &mut document, &mut context, command);
        }
    });

    world.resource_mut::<PenToolStyle>().style = context.pen_style;
}

pub fn apply_command<S: DrawingSurface>(
    surface: &mut S,
    document: &mut MarkerDocument,
    context: &mut CommandContext,
    command: MarkerCommand,
) {
    match command {
        MarkerCommand::PointerDown { point, target } => {
            pointer_down(surface, document, context, point, target);
        }
        MarkerCommand::PointerMove { point } => {
            if let Some(marker) = document.active().and_then(|i| document.marker_mut(i)) {
                marker.pointer_move(surface, point);
                document.mark_dirty();
            }
        }
        MarkerCommand::PointerUp { point } => pointer_up(surface, document, point),
        MarkerCommand::ClearSelection => document.select(surface, None),
        MarkerCommand::DeleteSelected => {
            if document.delete_selected(surface) {
                info!("Deleted selected marker");
            }
        }
        MarkerCommand::ApplyStyle(change) => {
            match document.selected().and_then(|i| document.marker_mut(i)) {
                Some(marker) => {
                    marker.apply_style_change(surface, &change);
                    document.mark_dirty();
                }
                None => {
                    context.pen_style.apply(&change);
                }
            }
        }
        MarkerCommand::SetNotes(notes) => {
            if let Some(marker) = document.selected().and_then(|i| document.marker_mut(i)) {
                marker.set_notes(notes);
                document.mark_dirty();
            }
        }
        MarkerCommand::ResizeCanvas(size) => {
            document.resize_canvas(surface, size);
        }
        MarkerCommand::SetBackground(path) => {
            document.canvas.background_image = path;
            document.mark_dirty();
        }
        MarkerCommand::ReplaceDocument { file, path } => {
            let restored = document.load_file(surface, &file, &context.settings);
            if restored < file.markers.len() {
                warn!(
                    "Restored {} of {} markers from {:?}",
                    restored,
                    file.markers.len(),
                    path
                );
            }
            document.path = Some(path);
        }
        MarkerCommand::NewDocument(canvas) => document.reset(surface, canvas),
    }
}

fn pointer_down<S: DrawingSurface>(
    surface: &mut S,
    document: &mut MarkerDocument,
    context: &CommandContext,
    point: Vec2,
    target: Option<Entity>,
) {
    if let Some(marker) = document.active().and_then(|i| document.marker_mut(i))
        && marker.is_drawing()
    {
        marker.finish_stroke(surface);
    }

    let owner = target.and_then(|e| document.marker_for_target(e));

    // Select picks any marker; pen tools only edit the selected one
    let edit = match owner {
        Some(index) if context.tool == EditorTool::Select || document.selected() == Some(index) => {
            Some(index)
        }
        _ => None,
    };

    if let Some(index) = edit {
        document.select(surface, Some(index));
        document.set_active(Some(index));
        if let Some(marker) = document.marker_mut(index) {
            marker.pointer_down(surface, point, target);
        }
        return;
    }

    document.select(surface, None);
    document.set_active(None);

    let Some(mode) = context.tool.path_mode() else {
        return;
    };
    let marker = PenMarker::new(&context.settings, mode).with_style(context.pen_style.clone());
    let index = document.add_marker(marker);
    document.set_active(Some(index));
    if let Some(marker) = document.marker_mut(index) {
        marker.pointer_down(surface, point, None);
    }
}

fn pointer_up<S: DrawingSurface>(surface: &mut S, document: &mut MarkerDocument, point: Vec2) {
    let Some(index) = document.active() else {
        return;
    };
    document.set_active(None);
    let Some(marker) = document.marker_mut(index) else {
        return;
    };

    let was_drawing = marker.is_drawing();
    marker.pointer_up(surface, point);
    // A click without movement leaves nothing worth keeping
    let is_click = marker.points().windows(2).all(|w| w[0] == w[1]);
    let point_count = marker.points().len();
    document.mark_dirty();
    if !was_drawing {
        return;
    }

    if is_click {
        debug!("Discarding stroke without movement");
        document.remove(surface, index);
        return;
    }

    info!("Added stroke with {} points", point_count);
    document.select(surface, Some(index));
}
