use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::map::{GeoAnchor, MapMarker, MapView, Popup, PopupContent};

/// Renders open marker popups above their icons.
pub fn marker_popups_ui(
    mut contexts: EguiContexts,
    view: Res<MapView>,
    mut popups: Query<(Entity, &GeoAnchor, &MapMarker, &mut Popup)>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    for (entity, anchor, marker, mut popup) in popups.iter_mut() {
        if !popup.open {
            continue;
        }

        let tip = marker.icon.popup_tip(view.geo_to_screen(anchor.0));
        let mut close = false;

        egui::Area::new(egui::Id::new(("marker_popup", entity)))
            .fixed_pos(egui::pos2(tip.x, tip.y))
            .pivot(egui::Align2::CENTER_BOTTOM)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(260.0);
                    ui.horizontal(|ui| {
                        popup_body(ui, &popup.content);
                        if ui.small_button("x").on_hover_text("Close").clicked() {
                            close = true;
                        }
                    });
                });
            });

        if close {
            popup.open = false;
        }
    }

    Ok(())
}

fn popup_body(ui: &mut egui::Ui, content: &PopupContent) {
    ui.vertical(|ui| {
        ui.label(&content.title);
        for line in &content.lines {
            ui.horizontal_wrapped(|ui| {
                ui.strong(format!("{}:", line.label));
                ui.label(&line.value);
            });
        }
    });
}
