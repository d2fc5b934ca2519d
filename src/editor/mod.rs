mod camera;
mod canvas;
pub mod conditions;
pub mod document;
pub mod input;
pub mod picking;
pub mod rendering;
pub mod tools;

pub use document::{Canvas, MarkerDocument, is_valid_canvas_size};
pub use input::{MarkerCommand, PendingMarkerCommands};
pub use tools::{CurrentTool, EditorTool, PenToolStyle};

use bevy::prelude::*;

use crate::config::{AppConfig, ConfigLoaded};
use crate::marker::style::Style;

/// Size the starting canvas and seed the pen style from the loaded config
fn apply_config_defaults(
    config: Res<AppConfig>,
    mut document: ResMut<MarkerDocument>,
    mut pen_style: ResMut<PenToolStyle>,
) {
    let size = config.data.canvas_size.as_vec2();
    if is_valid_canvas_size(size) {
        document.canvas.size = size;
    } else {
        warn!("Configured canvas size {:?} is invalid, keeping default", size);
    }
    pen_style.style = Style::from_settings(&config.data.marker_settings);
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentTool>()
            .init_resource::<PenToolStyle>()
            .init_resource::<PendingMarkerCommands>()
            .init_resource::<input::PointerState>()
            .insert_resource(MarkerDocument::new(Canvas::default()))
            // Register stroke gizmo group for marker rendering
            .init_gizmo_group::<rendering::StrokeGizmoGroup>()
            .add_systems(
                Startup,
                (
                    apply_config_defaults,
                    camera::spawn_camera,
                    rendering::configure_stroke_gizmos,
                )
                    .after(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                    tools::handle_tool_shortcuts,
                    tools::update_cursor_icon,
                ),
            )
            .add_systems(
                Update,
                (
                    input::collect_pointer_release,
                    input::collect_pointer_input.run_if(conditions::no_dialog_open),
                    input::apply_marker_commands.run_if(conditions::has_pending_commands),
                )
                    .chain()
                    .after(tools::handle_tool_shortcuts),
            )
            .add_systems(
                Update,
                (
                    canvas::sync_canvas_background,
                    rendering::render_canvas_frame,
                    rendering::render_marker_paths,
                    rendering::render_marker_handles,
                )
                    .after(input::apply_marker_commands),
            );
    }
}
