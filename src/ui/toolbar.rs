use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::{AppConfig, UpdateMarkerDefaultsRequest};
use crate::editor::rendering::parse_color;
use crate::editor::{
    CurrentTool, EditorTool, MarkerCommand, MarkerDocument, PenToolStyle, PendingMarkerCommands,
};
use crate::marker::style::Style;
use crate::marker::{StyleChange, ToolboxPanel};
use crate::persistence::{AsyncDocumentOperation, LoadDocumentRequest, SaveDocumentRequest};
use crate::theme;

use super::canvas_dialog::CanvasDialogState;
use super::file_menu::{
    self, FileMenuState, pick_background_image, pick_document_to_open, pick_save_location,
    save_or_save_as, truncate_path,
};

/// Notes text being edited for the selected marker
#[derive(Resource, Default)]
pub struct NotesEditState {
    pub marker: Option<usize>,
    pub buffer: String,
}

/// Main toolbar with the file menus, tools and document name
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut current_tool: ResMut<CurrentTool>,
    mut menu_state: ResMut<FileMenuState>,
    mut canvas_dialog: ResMut<CanvasDialogState>,
    mut pending: ResMut<PendingMarkerCommands>,
    mut save_events: MessageWriter<SaveDocumentRequest>,
    mut load_events: MessageWriter<LoadDocumentRequest>,
    document: Res<MarkerDocument>,
    config: Res<AppConfig>,
    async_op: Res<AsyncDocumentOperation>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                ui.add_enabled_ui(!async_op.is_busy(), |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("New").clicked() {
                            menu_state.show_new_confirmation = true;
                            ui.close();
                        }

                        if ui.button("Open...").clicked() {
                            if let Some(path) = pick_document_to_open(&document) {
                                load_events.write(LoadDocumentRequest { path });
                            }
                            ui.close();
                        }

                        ui.add_enabled_ui(!config.data.recent_documents.is_empty(), |ui| {
                            ui.menu_button("Open Recent", |ui| {
                                for path in &config.data.recent_documents {
                                    let path_str = path.to_string_lossy();
                                    if ui
                                        .button(truncate_path(&path_str, 60))
                                        .on_hover_text(path_str.as_ref())
                                        .clicked()
                                    {
                                        load_events.write(LoadDocumentRequest { path: path.clone() });
                                        ui.close();
                                    }
                                }
                            });
                        });

                        ui.separator();

                        if ui.button("Save").clicked() {
                            save_or_save_as(&document, &mut save_events);
                            ui.close();
                        }

                        if ui.button("Save As...").clicked() {
                            if let Some(path) = pick_save_location(&document) {
                                save_events.write(SaveDocumentRequest { path });
                            }
                            ui.close();
                        }
                    });

                    ui.menu_button("Canvas", |ui| {
                        if ui.button("Resize...").clicked() {
                            canvas_dialog.open(document.canvas.size);
                            ui.close();
                        }

                        ui.separator();

                        if ui.button("Set Background...").clicked() {
                            if let Some(path) = pick_background_image(&document) {
                                file_menu::set_background(&mut pending, Some(path));
                            }
                            ui.close();
                        }

                        let has_background = document.canvas.background_image.is_some();
                        if ui
                            .add_enabled(has_background, egui::Button::new("Clear Background"))
                            .clicked()
                        {
                            file_menu::set_background(&mut pending, None);
                            ui.close();
                        }
                    });
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Tool buttons with keyboard shortcuts
                for tool in EditorTool::all() {
                    let selected = current_tool.tool == *tool;
                    let button = egui::Button::new(
                        egui::RichText::new(tool_button_label(tool)).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    let response = ui.add(button);
                    if response.clicked() {
                        current_tool.tool = *tool;
                    }
                    response.on_hover_text(tool.display_name());
                }

                // Right-aligned document name
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if document.is_dirty() {
                        ui.colored_label(theme::ui::DIRTY_MARK, "●")
                            .on_hover_text("Unsaved changes");
                    }
                    ui.label(egui::RichText::new(document.name()).strong());
                    ui.label(
                        egui::RichText::new(format!("{} markers", document.len()))
                            .color(theme::ui::HINT_TEXT),
                    );
                });
            });
        });
    Ok(())
}

/// Secondary toolbar with the style panels of the selected marker, or of
/// the pen when nothing is selected
#[allow(clippy::too_many_arguments)]
pub fn tool_settings_ui(
    mut contexts: EguiContexts,
    current_tool: Res<CurrentTool>,
    document: Res<MarkerDocument>,
    pen_style: Res<PenToolStyle>,
    config: Res<AppConfig>,
    mut notes: ResMut<NotesEditState>,
    mut pending: ResMut<PendingMarkerCommands>,
    mut defaults_events: MessageWriter<UpdateMarkerDefaultsRequest>,
) -> Result {
    let selected = document.selected().zip(document.selected_marker());
    if selected.is_none() && !current_tool.tool.is_pen_tool() {
        return Ok(());
    }

    let settings = &config.data.marker_settings;
    let panels = match selected {
        Some((_, marker)) => marker.toolbox_panels(settings),
        None => ToolboxPanel::for_style(&pen_style.style, settings),
    };

    // Reload the notes buffer when the selection changes
    let selected_index = selected.map(|(index, _)| index);
    if notes.marker != selected_index {
        notes.marker = selected_index;
        notes.buffer = selected
            .and_then(|(_, marker)| marker.base().notes())
            .unwrap_or_default()
            .to_string();
    }

    let mut changes = Vec::new();
    let mut notes_changed = false;

    egui::TopBottomPanel::top("tool_settings")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 6))
                .fill(theme::ui::PANEL_BACKGROUND),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 6.0;

                let heading = if selected.is_some() {
                    "Selected Stroke:"
                } else {
                    "Pen Settings:"
                };
                ui.label(egui::RichText::new(heading).color(theme::ui::LABEL_TEXT));
                ui.add_space(8.0);

                for panel in &panels {
                    if let Some(change) = panel_ui(ui, panel) {
                        changes.push(change);
                    }
                    ui.add_space(8.0);
                    ui.separator();
                    ui.add_space(8.0);
                }

                if selected.is_some() {
                    ui.label("Notes:");
                    notes_changed = ui
                        .add(egui::TextEdit::singleline(&mut notes.buffer).desired_width(200.0))
                        .changed();
                } else {
                    ui.label(
                        egui::RichText::new("Esc: Deselect  Del: Delete stroke")
                            .color(theme::ui::HINT_TEXT)
                            .size(11.0),
                    );
                }
            });
        });

    for change in changes {
        if selected.is_none()
            && let Some((color, stroke_width)) = pen_defaults_after(&pen_style.style, &change)
        {
            defaults_events.write(UpdateMarkerDefaultsRequest { color, stroke_width });
        }
        pending.push(MarkerCommand::ApplyStyle(change));
    }
    if notes_changed {
        let text = notes.buffer.trim();
        let value = (!text.is_empty()).then(|| text.to_string());
        pending.push(MarkerCommand::SetNotes(value));
    }

    Ok(())
}

/// Draw one toolbox panel, returning the option the user picked
fn panel_ui(ui: &mut egui::Ui, panel: &ToolboxPanel) -> Option<StyleChange> {
    ui.label(format!("{}:", panel.title()));

    let mut picked = None;
    for index in 0..panel.option_count() {
        let is_selected = panel.is_current(index);
        let response = match panel {
            ToolboxPanel::StrokeColor { options, .. } => {
                let fill = parse_color(&options[index])
                    .map(theme::bevy_to_egui)
                    .unwrap_or(egui::Color32::TRANSPARENT);
                ui.add(
                    egui::Button::new("")
                        .fill(fill)
                        .min_size(egui::vec2(18.0, 18.0))
                        .stroke(if is_selected {
                            egui::Stroke::new(2.0, theme::ui::SELECTED_BORDER)
                        } else {
                            egui::Stroke::new(1.0, theme::ui::UNSELECTED_BORDER)
                        }),
                )
                .on_hover_text(&options[index])
            }
            ToolboxPanel::StrokeWidth { options, .. } => {
                ui.selectable_label(is_selected, format!("{}", options[index]))
            }
            ToolboxPanel::LineStyle { options, .. } => {
                ui.selectable_label(is_selected, dash_label(&options[index]))
            }
        };
        if response.clicked() {
            picked = panel.select(index);
        }
    }
    picked
}

/// Label for a dash pattern option
fn dash_label(pattern: &str) -> String {
    if pattern.trim().is_empty() {
        "Solid".to_string()
    } else {
        pattern.to_string()
    }
}

/// Color and width to remember as defaults after a pen style change.
/// Dash changes are not remembered.
fn pen_defaults_after(style: &Style, change: &StyleChange) -> Option<(String, f32)> {
    if matches!(change, StyleChange::StrokeDasharray(_)) {
        return None;
    }
    let mut updated = style.clone();
    updated
        .apply(change)
        .then(|| (updated.stroke_color.clone(), updated.stroke_width))
}

/// Get the button label for a tool (with keyboard shortcut)
fn tool_button_label(tool: &EditorTool) -> &'static str {
    match tool {
        EditorTool::Select => "Select [V]",
        EditorTool::Pen => "Pen [P]",
        EditorTool::Polyline => "Polyline [L]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerSettings;

    #[test]
    fn test_dash_label() {
        assert_eq!(dash_label(""), "Solid");
        assert_eq!(dash_label("4 2"), "4 2");
    }

    #[test]
    fn test_pen_defaults_follow_color_and_width() {
        let style = Style::from_settings(&MarkerSettings::default());
        assert_eq!(
            pen_defaults_after(&style, &StyleChange::StrokeColor("blue".to_string())),
            Some(("blue".to_string(), style.stroke_width))
        );
        assert_eq!(
            pen_defaults_after(&style, &StyleChange::StrokeWidth(9.0)),
            Some((style.stroke_color.clone(), 9.0))
        );
        assert_eq!(pen_defaults_after(&style, &StyleChange::StrokeWidth(-1.0)), None);
        assert_eq!(
            pen_defaults_after(&style, &StyleChange::StrokeDasharray(Some("3".to_string()))),
            None
        );
    }

    #[test]
    fn test_every_tool_has_a_label() {
        for tool in EditorTool::all() {
            assert!(!tool_button_label(tool).is_empty());
        }
    }
}
