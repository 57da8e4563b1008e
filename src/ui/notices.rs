//! Blocking notices (the map's equivalent of an alert box).

use std::collections::VecDeque;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::ConfigResetNotification;
use crate::theme;

/// Show a message the user has to acknowledge.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ShowNotice {
    pub text: String,
}

impl ShowNotice {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Notices waiting to be acknowledged, oldest first. Only the front one is
/// on screen.
#[derive(Resource, Default, Debug)]
pub struct Notices {
    queue: VecDeque<String>,
    /// The front notice has been drawn at least once
    front_seen: bool,
}

impl Notices {
    pub fn push(&mut self, text: String) {
        self.queue.push_back(text);
    }

    pub fn current(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn dismiss(&mut self) {
        self.queue.pop_front();
        self.front_seen = false;
    }

    pub fn mark_seen(&mut self) {
        self.front_seen = !self.queue.is_empty();
    }

    /// Whether an Enter press acknowledges the front notice. The notice must
    /// have been on screen before this frame and no text field may hold the
    /// keyboard, so an Enter meant for another dialog is not consumed here.
    pub fn enter_acknowledges(&self, text_field_focused: bool) -> bool {
        self.front_seen && !text_field_focused
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

pub fn collect_notices(mut messages: MessageReader<ShowNotice>, mut notices: ResMut<Notices>) {
    for message in messages.read() {
        info!("Notice: {}", message.text);
        notices.push(message.text.clone());
    }
}

/// Renders the front notice with an OK button. Enter also acknowledges once
/// the notice holds the keyboard.
pub fn notice_dialog_ui(mut contexts: EguiContexts, mut notices: ResMut<Notices>) -> Result {
    let Some(text) = notices.current().map(str::to_owned) else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;

    let focused = ctx.memory(|m| m.focused().is_some());
    let mut dismissed =
        ctx.input(|i| i.key_pressed(egui::Key::Enter)) && notices.enter_acknowledges(focused);

    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(280.0);
            ui.label(text);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        notices.dismiss();
    } else {
        notices.mark_seen();
    }

    Ok(())
}

/// Renders the notification shown when the config file had to be reset.
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Configuration Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your configuration could not be loaded and default settings are in use.");
            if let Some(ref reason) = notification.reason {
                ui.add_space(5.0);
                ui.colored_label(theme::ui::ERROR_TEXT, reason);
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
            }
        });

    Ok(())
}
