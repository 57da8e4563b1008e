use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts};

use crate::annotate::{EventCategory, SelectCategoryRequest, SelectedCategory};
use crate::geolocation::LocateState;
use crate::map::{MapView, MarkerList, TileCache};
use crate::theme;

use super::DialogState;

/// Top toolbar with one button per event category
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    selected: Res<SelectedCategory>,
    dialog_state: Res<DialogState>,
    marker_list: Res<MarkerList>,
    mut requests: MessageWriter<SelectCategoryRequest>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                ui.add_enabled_ui(!dialog_state.any_modal_open, |ui| {
                    for category in EventCategory::all() {
                        let is_selected = selected.get() == Some(*category);
                        if category_button(ui, *category, is_selected).clicked() {
                            requests.write(SelectCategoryRequest {
                                category: *category,
                            });
                        }
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} events", marker_list.len()))
                            .color(theme::ui::LABEL_TEXT),
                    );
                });
            });
        });
    Ok(())
}

fn category_button(ui: &mut egui::Ui, category: EventCategory, selected: bool) -> egui::Response {
    let swatch = theme::rgba_to_egui(category.color());
    let text = egui::RichText::new(category.button_label()).size(14.0).strong();

    let button = egui::Button::new(text)
        .min_size(egui::vec2(0.0, 28.0))
        .selected(selected)
        .stroke(if selected {
            egui::Stroke::new(2.0, theme::ui::SELECTED_BORDER)
        } else {
            egui::Stroke::new(1.0, swatch)
        });

    ui.add(button).on_hover_text(format!(
        "Long-press the map to add a {} marker",
        category.display_name()
    ))
}

/// Bottom status bar: cursor position, zoom, and background work
pub fn status_bar_ui(
    mut contexts: EguiContexts,
    view: Res<MapView>,
    tiles: Res<TileCache>,
    locate_state: Res<LocateState>,
    window_query: Query<&Window, With<PrimaryWindow>>,
) -> Result {
    let cursor = window_query
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .map(|cursor| view.screen_to_geo(cursor));

    egui::TopBottomPanel::bottom("status_bar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 4)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                let position = cursor
                    .map(|pos| format!("{:.5}, {:.5}", pos.lat, pos.lng))
                    .unwrap_or_else(|| "-".to_string());
                ui.label(egui::RichText::new(position).monospace());
                ui.separator();
                ui.label(format!("Zoom {}", view.zoom));

                if tiles.in_flight() > 0 {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("Loading {} tiles", tiles.in_flight()))
                            .color(theme::ui::HINT_TEXT),
                    );
                }

                if locate_state.in_progress {
                    ui.separator();
                    ui.spinner();
                    ui.label(egui::RichText::new("Locating").color(theme::ui::HINT_TEXT));
                }
            });
        });
    Ok(())
}
