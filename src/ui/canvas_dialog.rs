//! Dialog for changing the canvas size.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::MIN_CANVAS_EDGE;
use crate::editor::{MarkerCommand, MarkerDocument, PendingMarkerCommands, is_valid_canvas_size};
use crate::theme;

#[derive(Resource, Default)]
pub struct CanvasDialogState {
    pub is_open: bool,
    pub width: String,
    pub height: String,
    pub error: Option<String>,
}

impl CanvasDialogState {
    /// Open the dialog prefilled with the current canvas size
    pub fn open(&mut self, size: Vec2) {
        self.is_open = true;
        self.width = size.x.to_string();
        self.height = size.y.to_string();
        self.error = None;
    }
}

/// Parse the two edit fields into a canvas size.
pub fn parse_canvas_size(width: &str, height: &str) -> Result<Vec2, String> {
    let parse = |label: &str, text: &str| {
        text.trim()
            .parse::<f32>()
            .map_err(|_| format!("{} must be a number", label))
    };
    let size = Vec2::new(parse("Width", width)?, parse("Height", height)?);
    if !is_valid_canvas_size(size) {
        return Err(format!(
            "Both edges must be at least {} pixels",
            MIN_CANVAS_EDGE
        ));
    }
    Ok(size)
}

pub fn canvas_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog: ResMut<CanvasDialogState>,
    document: Res<MarkerDocument>,
    mut pending: ResMut<PendingMarkerCommands>,
) -> Result {
    if !dialog.is_open {
        return Ok(());
    }

    let mut should_apply = false;
    let mut should_close = false;

    egui::Window::new("Canvas Size")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            let current = document.canvas.size;
            ui.label(
                egui::RichText::new(format!("Current: {} x {}", current.x, current.y))
                    .color(theme::ui::HINT_TEXT),
            );
            ui.add_space(6.0);

            egui::Grid::new("canvas_size_grid")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("Width:");
                    ui.add(egui::TextEdit::singleline(&mut dialog.width).desired_width(80.0));
                    ui.end_row();
                    ui.label("Height:");
                    ui.add(egui::TextEdit::singleline(&mut dialog.height).desired_width(80.0));
                    ui.end_row();
                });

            ui.label(
                egui::RichText::new("Markers are scaled to keep their place on the canvas.")
                    .small()
                    .color(theme::ui::HINT_TEXT),
            );

            if let Some(ref error) = dialog.error {
                ui.colored_label(theme::ui::ERROR_TEXT, error);
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                should_apply = ui.button("Apply").clicked();
                should_close = ui.button("Cancel").clicked();
            });
        });

    if should_apply {
        match parse_canvas_size(&dialog.width, &dialog.height) {
            Ok(size) => {
                pending.push(MarkerCommand::ResizeCanvas(size));
                dialog.is_open = false;
            }
            Err(error) => dialog.error = Some(error),
        }
    }
    if should_close {
        dialog.is_open = false;
    }

    Ok(())
}
