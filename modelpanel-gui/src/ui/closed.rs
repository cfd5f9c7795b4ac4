//! Placeholder shown while the settings panel is closed.

use eframe::egui::{self, RichText, Rounding, Vec2};

use modelpanel_core::{normalize_api_configuration, LicenseState, ResolvedSelection, Settings};

use crate::app::PanelApp;
use crate::ui::colors;

pub fn render(app: &mut PanelApp, ui: &mut egui::Ui) {
    let muted = colors::muted(ui.visuals());

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);

        ui.label(RichText::new(summary(&app.settings, app.license.as_ref())).size(14.0).color(muted));
        if let Some(license) = &app.license {
            let features = license.features().collect::<Vec<_>>();
            let text = if features.is_empty() {
                "No licensed features".to_string()
            } else {
                format!("Licensed: {}", features.join(", "))
            };
            ui.label(RichText::new(text).size(11.0).color(muted));
        }
        ui.add_space(12.0);

        if ui
            .add_sized(
                Vec2::new(160.0, 34.0),
                egui::Button::new(RichText::new("Open Settings").strong())
                    .fill(colors::ACCENT)
                    .rounding(Rounding::same(8.0)),
            )
            .clicked()
        {
            app.open_panel();
        }
    });
}

/// Provider and model the saved configuration resolves to.
fn summary(settings: &Settings, license: Option<&LicenseState>) -> String {
    let Some(config) = &settings.api_configuration else {
        return "No provider configured".to_string();
    };
    let Some(license) = license else {
        if config.explicit_provider().is_none() {
            // The default depends on a license list not fetched yet
            return "Default provider".to_string();
        }
        return describe(&normalize_api_configuration(Some(config), false));
    };
    describe(&normalize_api_configuration(
        Some(config),
        license.has_constructory_license(),
    ))
}

fn describe(selection: &ResolvedSelection) -> String {
    format!(
        "{} / {}",
        selection.selected_provider,
        selection.selected_model_id.as_deref().unwrap_or("no model")
    )
}
