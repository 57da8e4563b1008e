//! Run conditions for the annotation systems.

use bevy::prelude::*;

use crate::ui::DialogState;

use super::creation::{CreationFlow, FlowStep};

/// Run condition: returns true when both prompts were answered and the
/// record is waiting to become a marker.
///
/// Usage: `.run_if(flow_is_committing)`
pub fn flow_is_committing(flow: Res<CreationFlow>) -> bool {
    matches!(flow.step(), FlowStep::Committing(_))
}

/// Run condition: returns true when no modal dialog is open.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}
