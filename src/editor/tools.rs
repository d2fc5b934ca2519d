use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::marker::{MarkerSettings, PathMode};
use crate::marker::style::Style;

use super::input::{MarkerCommand, PendingMarkerCommands};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Select,
    Pen,
    Polyline,
}

impl EditorTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select (V)",
            EditorTool::Pen => "Pen (P)",
            EditorTool::Polyline => "Polyline (L)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            EditorTool::Select => CursorIcon::System(SystemCursorIcon::Default),
            EditorTool::Pen | EditorTool::Polyline => {
                CursorIcon::System(SystemCursorIcon::Crosshair)
            }
        }
    }

    pub fn all() -> &'static [EditorTool] {
        &[EditorTool::Select, EditorTool::Pen, EditorTool::Polyline]
    }

    /// Path mode of markers created with this tool, if it draws at all
    pub fn path_mode(&self) -> Option<PathMode> {
        match self {
            EditorTool::Select => None,
            EditorTool::Pen => Some(PathMode::Smoothed),
            EditorTool::Polyline => Some(PathMode::Polyline),
        }
    }

    pub fn is_pen_tool(&self) -> bool {
        self.path_mode().is_some()
    }
}

#[derive(Resource, Default)]
pub struct CurrentTool {
    pub tool: EditorTool,
}

/// Style given to the next marker the pen tools create
#[derive(Resource, Debug, Clone)]
pub struct PenToolStyle {
    pub style: Style,
}

impl Default for PenToolStyle {
    fn default() -> Self {
        Self {
            style: Style::from_settings(&MarkerSettings::default()),
        }
    }
}

/// Tool picked by this frame's key presses. Ctrl combinations belong to
/// the file menu.
fn shortcut_tool(keyboard: &ButtonInput<KeyCode>) -> Option<EditorTool> {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if ctrl {
        None
    } else if keyboard.just_pressed(KeyCode::KeyV) || keyboard.just_pressed(KeyCode::KeyS) {
        Some(EditorTool::Select)
    } else if keyboard.just_pressed(KeyCode::KeyP) {
        Some(EditorTool::Pen)
    } else if keyboard.just_pressed(KeyCode::KeyL) {
        Some(EditorTool::Polyline)
    } else {
        None
    }
}

pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentTool>,
    mut pending: ResMut<PendingMarkerCommands>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if let Some(tool) = shortcut_tool(&keyboard) {
        current_tool.tool = tool;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        pending.push(MarkerCommand::ClearSelection);
    }
    if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        pending.push(MarkerCommand::DeleteSelected);
    }
}

pub fn update_cursor_icon(
    current_tool: Res<CurrentTool>,
    mut window_query: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok((entity, _window)) = window_query.single_mut() else {
        return;
    };

    // Use default cursor over UI, tool cursor in editor space
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(current_tool.tool.cursor_icon());
}
