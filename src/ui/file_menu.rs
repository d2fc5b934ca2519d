//! File operations: native file dialogs, confirmations and error popups.

use bevy::prelude::*;
use bevy::window::WindowCloseRequested;
use bevy_egui::{EguiContexts, egui};
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, ConfigResetNotification, MissingDocumentWarning, SaveConfigRequest};
use crate::editor::{MarkerCommand, MarkerDocument, PendingMarkerCommands};
use crate::persistence::{
    AsyncDocumentOperation, DocumentLoadError, DocumentSaveError, LoadDocumentRequest,
    NewDocumentRequest, SaveDocumentRequest,
};
use crate::theme;

const DOCUMENT_FILTER: (&str, &[&str]) = ("Strokemark Documents", &["json"]);
const IMAGE_FILTER: (&str, &[&str]) = ("Images", &["png", "jpg", "jpeg", "webp", "bmp"]);

#[derive(Resource, Default)]
pub struct FileMenuState {
    pub show_new_confirmation: bool,
    pub show_close_confirmation: bool,
}

/// Directory a file dialog should open in
fn dialog_directory(document: &MarkerDocument) -> PathBuf {
    document
        .path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(crate::paths::documents_dir)
}

/// Force a `.json` extension on a chosen save path
pub fn with_document_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "json") {
        path
    } else {
        path.with_extension("json")
    }
}

pub fn pick_document_to_open(document: &MarkerDocument) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(DOCUMENT_FILTER.0, DOCUMENT_FILTER.1)
        .set_directory(dialog_directory(document))
        .set_title("Open Document")
        .pick_file()
}

pub fn pick_save_location(document: &MarkerDocument) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(DOCUMENT_FILTER.0, DOCUMENT_FILTER.1)
        .set_directory(dialog_directory(document))
        .set_file_name(format!("{}.json", document.name()))
        .set_title("Save Document As")
        .save_file()
        .map(with_document_extension)
}

pub fn pick_background_image(document: &MarkerDocument) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(IMAGE_FILTER.0, IMAGE_FILTER.1)
        .set_directory(dialog_directory(document))
        .set_title("Choose Background Image")
        .pick_file()
}

/// Save to the current file, or ask for one if the document was never saved.
pub fn save_or_save_as(
    document: &MarkerDocument,
    save_events: &mut MessageWriter<SaveDocumentRequest>,
) {
    let path = document.path.clone().or_else(|| pick_save_location(document));
    if let Some(path) = path {
        save_events.write(SaveDocumentRequest { path });
    }
}

/// Ctrl+N / Ctrl+O / Ctrl+S (Shift for Save As)
pub fn handle_file_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    document: Res<MarkerDocument>,
    async_op: Res<AsyncDocumentOperation>,
    mut menu_state: ResMut<FileMenuState>,
    mut save_events: MessageWriter<SaveDocumentRequest>,
    mut load_events: MessageWriter<LoadDocumentRequest>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl || async_op.is_busy() {
        return;
    }
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if keyboard.just_pressed(KeyCode::KeyS) {
        if shift {
            if let Some(path) = pick_save_location(&document) {
                save_events.write(SaveDocumentRequest { path });
            }
        } else {
            save_or_save_as(&document, &mut save_events);
        }
    } else if keyboard.just_pressed(KeyCode::KeyO) {
        if let Some(path) = pick_document_to_open(&document) {
            load_events.write(LoadDocumentRequest { path });
        }
    } else if keyboard.just_pressed(KeyCode::KeyN) {
        menu_state.show_new_confirmation = true;
    }
}

/// Renders the confirmation dialogs for file operations
pub fn file_menu_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    document: Res<MarkerDocument>,
    mut new_events: MessageWriter<NewDocumentRequest>,
    mut save_events: MessageWriter<SaveDocumentRequest>,
    mut exit_events: MessageWriter<AppExit>,
) -> Result {
    // New document confirmation dialog
    if menu_state.show_new_confirmation {
        if !document.is_dirty() {
            new_events.write(NewDocumentRequest);
            menu_state.show_new_confirmation = false;
        } else {
            egui::Window::new("New Document")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(contexts.ctx_mut()?, |ui| {
                    ui.label(format!(
                        "\"{}\" has unsaved changes that will be lost.",
                        document.name()
                    ));
                    ui.horizontal(|ui| {
                        if ui.button("Discard and Create New").clicked() {
                            new_events.write(NewDocumentRequest);
                            menu_state.show_new_confirmation = false;
                        }
                        if ui.button("Cancel").clicked() {
                            menu_state.show_new_confirmation = false;
                        }
                    });
                });
        }
    }

    if menu_state.show_close_confirmation {
        egui::Window::new("Unsaved Changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                ui.label(format!(
                    "Save changes to \"{}\" before quitting?",
                    document.name()
                ));
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save_or_save_as(&document, &mut save_events);
                        menu_state.show_close_confirmation = false;
                    }
                    if ui.button("Quit Without Saving").clicked() {
                        exit_events.write(AppExit::Success);
                    }
                    if ui.button("Cancel").clicked() {
                        menu_state.show_close_confirmation = false;
                    }
                });
            });
    }

    Ok(())
}

/// Intercept window close so unsaved work can be saved first
pub fn handle_window_close(
    mut close_events: MessageReader<WindowCloseRequested>,
    document: Res<MarkerDocument>,
    mut menu_state: ResMut<FileMenuState>,
    mut exit_events: MessageWriter<AppExit>,
) {
    for _event in close_events.read() {
        if document.is_dirty() {
            info!("Close requested with unsaved changes");
            menu_state.show_close_confirmation = true;
        } else {
            exit_events.write(AppExit::Success);
        }
    }
}

/// Blocking overlay while a save or load is running
pub fn async_operation_modal_ui(
    mut contexts: EguiContexts,
    async_op: Res<AsyncDocumentOperation>,
) -> Result {
    if !async_op.is_busy() {
        return Ok(());
    }
    egui::Window::new("Please Wait")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    async_op
                        .operation_description
                        .as_deref()
                        .unwrap_or("Working..."),
                );
            });
        });

    Ok(())
}

pub fn save_error_dialog_ui(
    mut contexts: EguiContexts,
    mut save_error: ResMut<DocumentSaveError>,
) -> Result {
    let Some(error) = save_error.message.clone() else {
        return Ok(());
    };
    let mut dismissed = false;
    egui::Window::new("Save Failed")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                ui.colored_label(theme::ui::ERROR_TEXT, &error);
            });
            dismissed = ui.button("OK").clicked();
        });
    if dismissed {
        save_error.message = None;
    }
    Ok(())
}

pub fn load_error_dialog_ui(
    mut contexts: EguiContexts,
    mut load_error: ResMut<DocumentLoadError>,
) -> Result {
    let Some(error) = load_error.message.clone() else {
        return Ok(());
    };
    let mut dismissed = false;
    egui::Window::new("Load Error")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                ui.colored_label(theme::ui::ERROR_TEXT, &error);
            });
            ui.label("The current document was left unchanged.");
            dismissed = ui.button("OK").clicked();
        });
    if dismissed {
        load_error.message = None;
    }
    Ok(())
}

/// Shown at startup when the config file could not be used
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }
    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(ref reason) = notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });
    Ok(())
}

/// Renders the missing document warning (shown at startup if the last
/// document no longer exists)
pub fn missing_document_warning_ui(
    mut contexts: EguiContexts,
    mut warning: ResMut<MissingDocumentWarning>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !warning.show {
        return Ok(());
    }

    egui::Window::new("Document Not Found")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The last opened document no longer exists:");

            if let Some(ref path) = warning.path {
                ui.add_space(5.0);
                let path_str = path.to_string_lossy();
                ui.label(egui::RichText::new(truncate_path(&path_str, 50)).weak())
                    .on_hover_text(path_str.as_ref());
                ui.add_space(10.0);
            }

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    warning.show = false;
                }

                if ui.button("Clear from history").clicked() {
                    if let Some(missing) = warning.path.take() {
                        config.data.recent_documents.retain(|p| *p != missing);
                    }
                    config.data.last_document_path = None;
                    config.dirty = true;
                    save_events.write(SaveConfigRequest);
                    warning.show = false;
                }
            });
        });

    Ok(())
}

/// Keep the tail of long paths, which is the part that identifies them
pub fn truncate_path(path: &str, max_chars: usize) -> String {
    let count = path.chars().count();
    if count <= max_chars {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - (max_chars - 3)).collect();
    format!("...{}", tail)
}

/// Queue a background change for the open document
pub fn set_background(pending: &mut PendingMarkerCommands, path: Option<PathBuf>) {
    pending.push(MarkerCommand::SetBackground(path));
}
