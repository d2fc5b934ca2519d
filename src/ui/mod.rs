mod canvas_dialog;
pub mod file_menu;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{ConfigResetNotification, MissingDocumentWarning};
use crate::persistence::{AsyncDocumentOperation, DocumentLoadError, DocumentSaveError};

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
#[allow(clippy::too_many_arguments)]
fn update_dialog_state(
    file_menu: Res<file_menu::FileMenuState>,
    canvas_dialog: Res<canvas_dialog::CanvasDialogState>,
    missing_document: Res<MissingDocumentWarning>,
    config_reset: Res<ConfigResetNotification>,
    save_error: Res<DocumentSaveError>,
    load_error: Res<DocumentLoadError>,
    async_op: Res<AsyncDocumentOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = file_menu.show_new_confirmation
        || file_menu.show_close_confirmation
        || canvas_dialog.is_open
        || missing_document.show
        || config_reset.show
        || save_error.message.is_some()
        || load_error.message.is_some()
        || async_op.is_busy();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<file_menu::FileMenuState>()
            .init_resource::<canvas_dialog::CanvasDialogState>()
            .init_resource::<toolbar::NotesEditState>()
            .add_systems(
                EguiPrimaryContextPass,
                (toolbar::toolbar_ui, toolbar::tool_settings_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: dialogs/overlays
                    file_menu::file_menu_ui,
                    file_menu::missing_document_warning_ui,
                    file_menu::async_operation_modal_ui,
                    file_menu::save_error_dialog_ui,
                    file_menu::load_error_dialog_ui,
                    file_menu::config_reset_notification_ui,
                    canvas_dialog::canvas_dialog_ui,
                )
                    .after(toolbar::tool_settings_ui),
            )
            .add_systems(
                Update,
                (
                    file_menu::handle_window_close,
                    file_menu::handle_file_shortcuts.run_if(crate::editor::conditions::no_dialog_open),
                ),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
