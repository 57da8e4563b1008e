use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::geolocation::{LocateRequest, LocateState};
use crate::map::TileSource;
use crate::theme;

use super::DialogState;

/// Bottom-right map overlay: "Show My Location" and the tile attribution.
pub fn map_controls_ui(
    mut contexts: EguiContexts,
    dialog_state: Res<DialogState>,
    locate_state: Res<LocateState>,
    tiles: Res<TileSource>,
    mut locate_requests: MessageWriter<LocateRequest>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Area::new(egui::Id::new("map_controls"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
        .show(ctx, |ui| {
            ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                let enabled = !dialog_state.any_modal_open && !locate_state.in_progress;
                let button = egui::Button::new(egui::RichText::new("Show My Location").strong())
                    .min_size(egui::vec2(0.0, 28.0));
                if ui.add_enabled(enabled, button).clicked() {
                    locate_requests.write(LocateRequest);
                }

                ui.add_space(6.0);

                egui::Frame::new()
                    .fill(theme::ui::ATTRIBUTION_BACKGROUND)
                    .inner_margin(egui::Margin::symmetric(4, 1))
                    .show(ui, |ui| {
                        let layer = &tiles.layer;
                        let link = ui.add(
                            egui::Label::new(
                                egui::RichText::new(&layer.attribution)
                                    .size(11.0)
                                    .color(theme::ui::OVERLAY_TEXT),
                            )
                            .sense(egui::Sense::click()),
                        );
                        if link.on_hover_text(&layer.attribution_url).clicked()
                            && let Err(e) = open::that(&layer.attribution_url)
                        {
                            warn!("Failed to open {}: {}", layer.attribution_url, e);
                        }
                    });
            });
        });

    Ok(())
}
