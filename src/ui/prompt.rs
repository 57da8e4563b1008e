use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotate::CreationFlow;

/// Renders the time/notes prompt while a marker is being created.
///
/// OK or Enter submits the typed text. Cancel or Escape submits nothing.
pub fn creation_prompt_ui(mut contexts: EguiContexts, mut flow: ResMut<CreationFlow>) -> Result {
    let Some(prompt) = flow.prompt() else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;

    let mut submit = false;
    let mut cancel = ctx.input(|i| i.key_pressed(egui::Key::Escape));

    egui::Window::new("Event Details")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(360.0);
            ui.label(prompt);
            ui.add_space(4.0);

            let response = ui.add(
                egui::TextEdit::singleline(&mut flow.input).desired_width(f32::INFINITY),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            } else if !response.has_focus() {
                response.request_focus();
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    submit = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if cancel {
        flow.cancel();
    } else if submit {
        flow.submit();
    }

    Ok(())
}
