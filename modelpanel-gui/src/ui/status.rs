//! Status bar at the bottom of the window.

use eframe::egui::{self, RichText};

use crate::app::PanelApp;
use crate::ui::colors;

pub fn render(app: &PanelApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());

    ui.horizontal(|ui| {
        if let Some((msg, _)) = &app.status_message {
            ui.label(RichText::new(msg).size(11.0).color(muted));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let Some(panel) = &app.panel else {
                return;
            };
            let selection = panel.store.resolve();
            if let Some(model) = &selection.selected_model_id {
                ui.label(RichText::new(model).size(11.0).color(muted));
                ui.separator();
            }
            ui.label(
                RichText::new(selection.selected_provider.to_string())
                    .size(11.0)
                    .color(muted),
            );
        });
    });
}
