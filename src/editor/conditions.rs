//! Run conditions for controlling when editor systems execute.

use bevy::prelude::*;

use crate::ui::DialogState;

use super::input::PendingMarkerCommands;

/// Run condition: returns true when no modal dialog is open.
///
/// Use this to prevent editor input handlers from processing when
/// the user is interacting with a dialog.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}

/// Run condition: returns true when marker commands are waiting.
pub fn has_pending_commands(pending: Res<PendingMarkerCommands>) -> bool {
    !pending.is_empty()
}
