mod controls;
mod notices;
mod popups;
mod prompt;
mod toolbar;

pub use notices::{Notices, ShowNotice};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::annotate::CreationFlow;
use crate::config::ConfigResetNotification;

/// Resource that tracks whether any modal dialog is currently open.
/// Map input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block map input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    notices: Res<Notices>,
    flow: Res<CreationFlow>,
    config_reset: Res<ConfigResetNotification>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = !notices.is_empty() || flow.is_active() || config_reset.show;
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<Notices>()
            .add_message::<ShowNotice>()
            .add_systems(Update, notices::collect_notices.run_if(on_message::<ShowNotice>))
            // Panels first so overlays are placed inside the remaining area
            .add_systems(
                EguiPrimaryContextPass,
                (toolbar::toolbar_ui, toolbar::status_bar_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    popups::marker_popups_ui,
                    controls::map_controls_ui,
                    // Last: dialogs
                    // Notices read Enter while the prompt field still has focus
                    notices::notice_dialog_ui,
                    prompt::creation_prompt_ui,
                    notices::config_reset_notification_ui,
                )
                    .chain()
                    .after(toolbar::status_bar_ui),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
