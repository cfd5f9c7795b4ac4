//! Provider settings panel.

use eframe::egui::{self, Color32, RichText, Rounding, Vec2};

use modelpanel_core::api::profiles::{self, BASE_URL_PLACEHOLDER};
use modelpanel_core::{
    profile_for, ApiConfiguration, ApiProvider, CatalogFamily, CatalogStatus, ModelInfo,
    ModelSource, ProviderProfile, ResolvedSelection, Settings, Theme,
};

use crate::app::{OpenPanel, PanelApp};
use crate::ui::colors;

/// Catalog matches listed under the search box.
const MAX_SEARCH_RESULTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FooterAction {
    Save,
    Cancel,
}

/// Edits collected while drawing one frame of the form.
#[derive(Default)]
struct FormEdits {
    changed: bool,
    /// Model picked or typed this frame.
    model: Option<String>,
    refresh: Option<CatalogFamily>,
}

/// Render the settings window. Does nothing when no panel is open.
pub fn render(app: &mut PanelApp, ctx: &egui::Context) {
    let PanelApp {
        panel, settings, ..
    } = &mut *app;
    let Some(panel) = panel.as_mut() else {
        return;
    };

    let mut open = true;
    let mut action = None;
    let mut theme = settings.theme;

    egui::Window::new("API Provider")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(520.0)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            let muted = colors::muted(ui.visuals());
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 10.0);

            let scroll_max = (ui.available_height() - 80.0).max(240.0);
            egui::ScrollArea::vertical()
                .max_height(scroll_max)
                .show(ui, |ui| {
                    render_provider_section(panel, ui, muted);
                    ui.add_space(16.0);
                    render_preferences(settings, &mut theme, ui, muted);
                });

            ui.add_space(12.0);
            ui.separator();
            action = render_footer(ui, muted);
        });

    if theme != app.settings.theme {
        app.set_theme(ctx, theme);
    }
    if !open {
        action = Some(FooterAction::Cancel);
    }
    match action {
        Some(FooterAction::Save) => app.close_panel(true),
        Some(FooterAction::Cancel) => {
            app.close_panel(false);
            // Discard unsaved preference edits too
            app.settings = Settings::load(&app.db);
            app.set_theme(ctx, app.settings.theme);
        }
        None => {}
    }
}

fn render_provider_section(panel: &mut OpenPanel, ui: &mut egui::Ui, muted: Color32) {
    ui.heading("Provider");
    ui.separator();

    render_provider_picker(panel, ui);

    if let Some(notice) = panel.store.provider_notice() {
        egui::Frame::none()
            .fill(colors::notice_bg(ui.visuals()))
            .rounding(Rounding::same(6.0))
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(notice.message()).color(colors::ERROR).strong());
            });
    }

    let selection = panel.store.resolve();
    let provider = selection.selected_provider.clone();
    let profile = profile_for(&provider);

    // Edits land on a copy, written back only when something changed
    let mut config = panel.store.configuration().cloned().unwrap_or_default();
    let mut edits = FormEdits::default();

    render_credentials(&mut config, profile, &provider, ui, &mut edits);

    ui.add_space(8.0);
    ui.heading("Model");
    ui.separator();

    match profile.model_source {
        ModelSource::Static { models, .. } => {
            let entries = models
                .iter()
                .map(|m| (m.id.to_string(), m.to_info().display_label(m.id).to_string()))
                .collect::<Vec<_>>();
            render_model_dropdown(&selection, &entries, ui, &mut edits);
        }
        ModelSource::Catalog {
            family, searchable, ..
        } => {
            render_catalog_status(panel, family, ui, muted, &mut edits);
            if searchable {
                render_model_search(panel, &selection, family, ui, muted, &mut edits);
            } else {
                let entries = panel
                    .store
                    .catalog_of(family)
                    .iter()
                    .map(|(id, info)| (id.to_string(), info.display_label(id).to_string()))
                    .collect::<Vec<_>>();
                render_model_dropdown(&selection, &entries, ui, &mut edits);
                render_model_id_field(&config, &provider, profile, ui, &mut edits);
            }
        }
        ModelSource::FreeText => {
            render_model_id_field(&config, &provider, profile, ui, &mut edits);
        }
    }

    if let Some(limits) = profile.token_limits {
        render_token_limits(&mut config, limits, ui, &mut edits);
    }
    if profile.custom_model_info {
        render_custom_model_info(&mut config, ui, &mut edits);
    }

    if edits.changed {
        panel.store.set_configuration(Some(config));
    }
    if let Some(model_id) = edits.model {
        panel.store.select_model(model_id);
    }
    if let Some(family) = edits.refresh {
        panel.refresh(family);
    }

    // Re-resolve so the summary reflects this frame's edits
    if let Some(info) = panel.store.resolve().selected_model_info {
        ui.add_space(8.0);
        render_model_info(&info, ui, muted);
    }
}

fn render_provider_picker(panel: &mut OpenPanel, ui: &mut egui::Ui) {
    let current = panel.store.resolve().selected_provider;
    let current_profile = profile_for(&current);
    let label = if current_profile.is_generic() {
        current.to_string()
    } else {
        current_profile.label.to_string()
    };

    let mut chosen: Option<ApiProvider> = None;
    ui.horizontal(|ui| {
        ui.label("API Provider:");
        egui::ComboBox::from_id_salt("provider_select")
            .selected_text(label)
            .width(280.0)
            .show_ui(ui, |ui| {
                for profile in profiles::profiles() {
                    let selected = profile.provider == current;
                    if ui.selectable_label(selected, profile.label).clicked() {
                        chosen = Some(profile.provider.clone());
                    }
                }
            });
    });

    if let Some(provider) = chosen.filter(|p| *p != current) {
        panel.store.select_provider(provider);
        panel.model_search.clear();
    }
}

fn render_credentials(
    config: &mut ApiConfiguration,
    profile: &ProviderProfile,
    provider: &ApiProvider,
    ui: &mut egui::Ui,
    edits: &mut FormEdits,
) {
    if let Some(default_url) = profile.base_url {
        if let Some(field) = config.base_url_mut(provider) {
            let hint = if default_url.is_empty() {
                BASE_URL_PLACEHOLDER
            } else {
                default_url
            };
            ui.horizontal(|ui| {
                ui.label("Base URL:");
                edits.changed |= optional_text_edit(ui, field, hint, false);
            });
        }
    }

    if let Some(placeholder) = profile.api_key_placeholder() {
        if let Some(field) = config.api_key_mut(provider) {
            ui.horizontal(|ui| {
                ui.label("API Key:");
                edits.changed |= optional_text_edit(ui, field, placeholder, true);
            });
        }
    }
}

/// Single-line edit over an optional string; clearing it stores `None`.
fn optional_text_edit(ui: &mut egui::Ui, field: &mut Option<String>, hint: &str, password: bool) -> bool {
    let mut text = field.clone().unwrap_or_default();
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .hint_text(hint)
            .password(password)
            .desired_width(320.0),
    );
    if response.changed() {
        *field = (!text.is_empty()).then_some(text);
    }
    response.changed()
}

/// Dropdown over `(id, label)` entries.
fn render_model_dropdown(
    selection: &ResolvedSelection,
    entries: &[(String, String)],
    ui: &mut egui::Ui,
    edits: &mut FormEdits,
) {
    if entries.is_empty() {
        return;
    }
    let selected_id = selection.selected_model_id.as_deref().unwrap_or("");
    let selected_text = entries
        .iter()
        .find(|(id, _)| id == selected_id)
        .map(|(_, label)| label.as_str())
        .unwrap_or(if selected_id.is_empty() { "Select a model..." } else { selected_id });
    let mut chosen: Option<&String> = None;

    ui.horizontal(|ui| {
        ui.label("Model:");
        egui::ComboBox::from_id_salt("model_select")
            .selected_text(selected_text)
            .width(320.0)
            .show_ui(ui, |ui| {
                for (id, label) in entries {
                    let response = ui.selectable_label(id == selected_id, label);
                    let response = if label != id {
                        response.on_hover_text(id.as_str())
                    } else {
                        response
                    };
                    if response.clicked() {
                        chosen = Some(id);
                    }
                }
            });
    });

    if let Some(id) = chosen {
        edits.model = Some(id.clone());
    }
}

fn render_model_id_field(
    config: &ApiConfiguration,
    provider: &ApiProvider,
    profile: &ProviderProfile,
    ui: &mut egui::Ui,
    edits: &mut FormEdits,
) {
    let hint = profile
        .model_source
        .placeholder()
        .unwrap_or(profiles::MODEL_ID_PLACEHOLDER);
    let mut text = config.model_id_for(provider).unwrap_or_default().to_string();
    ui.horizontal(|ui| {
        ui.label("Model ID:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text(hint)
                .desired_width(320.0),
        );
        if response.changed() {
            edits.model = Some(text.clone());
        }
    });
}

fn render_model_search(
    panel: &mut OpenPanel,
    selection: &ResolvedSelection,
    family: CatalogFamily,
    ui: &mut egui::Ui,
    muted: Color32,
    edits: &mut FormEdits,
) {
    if let Some(id) = &selection.selected_model_id {
        ui.horizontal(|ui| {
            ui.label("Model:");
            ui.label(RichText::new(id).strong());
        });
    }

    let hint = profiles::MODEL_SEARCH_PLACEHOLDER;
    ui.add(
        egui::TextEdit::singleline(&mut panel.model_search)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );

    let needle = panel.model_search.trim().to_lowercase();
    if needle.is_empty() {
        return;
    }

    let catalog = panel.store.catalog_of(family);
    let matches = catalog
        .iter()
        .filter(|(id, info)| {
            id.to_lowercase().contains(&needle)
                || info
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .take(MAX_SEARCH_RESULTS)
        .map(|(id, _)| id.to_string())
        .collect::<Vec<_>>();

    if matches.is_empty() {
        ui.label(RichText::new("No matching models").size(12.0).color(muted).italics());
        return;
    }

    let mut chosen = None;
    egui::ScrollArea::vertical()
        .id_salt("model_search_results")
        .max_height(180.0)
        .show(ui, |ui| {
            for id in &matches {
                let selected = selection.selected_model_id.as_deref() == Some(id.as_str());
                if ui.selectable_label(selected, id).clicked() {
                    chosen = Some(id.clone());
                }
            }
        });

    if let Some(id) = chosen {
        panel.model_search.clear();
        edits.model = Some(id);
    }
}

fn render_catalog_status(
    panel: &OpenPanel,
    family: CatalogFamily,
    ui: &mut egui::Ui,
    muted: Color32,
    edits: &mut FormEdits,
) {
    let status = panel.store.status(family);
    ui.horizontal(|ui| {
        if status.shows_spinner() {
            ui.spinner();
        }
        match (&status, status.message()) {
            (_, Some(message)) => {
                let color = if status.is_error() { colors::ERROR } else { muted };
                ui.label(RichText::new(message).size(12.0).color(color));
            }
            (CatalogStatus::Ready { models }, None) => {
                ui.label(
                    RichText::new(format!("{models} models available"))
                        .size(12.0)
                        .color(colors::SUCCESS),
                );
            }
            _ => {}
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let button = egui::Button::new("Refresh Models").rounding(Rounding::same(8.0));
            if ui.add_enabled(!status.shows_spinner(), button).clicked() {
                edits.refresh = Some(family);
            }
        });
    });
}

fn render_token_limits(
    config: &mut ApiConfiguration,
    limits: modelpanel_core::api::TokenLimitDefaults,
    ui: &mut egui::Ui,
    edits: &mut FormEdits,
) {
    let mut completion = config
        .fireworks_model_max_completion_tokens
        .unwrap_or(limits.max_completion_tokens);
    let mut context = config
        .fireworks_model_max_tokens
        .unwrap_or(limits.max_tokens);

    ui.horizontal(|ui| {
        ui.label("Max Completion Tokens:");
        if ui
            .add(egui::DragValue::new(&mut completion).range(1..=1_000_000))
            .changed()
        {
            config.fireworks_model_max_completion_tokens = Some(completion);
            edits.changed = true;
        }
    });
    ui.horizontal(|ui| {
        ui.label("Max Context Tokens:");
        if ui
            .add(egui::DragValue::new(&mut context).range(1..=10_000_000))
            .changed()
        {
            config.fireworks_model_max_tokens = Some(context);
            edits.changed = true;
        }
    });
}

fn render_custom_model_info(config: &mut ApiConfiguration, ui: &mut egui::Ui, edits: &mut FormEdits) {
    let mut info = config
        .open_ai_model_info
        .clone()
        .unwrap_or_else(ModelInfo::openai_sane_defaults);
    let mut changed = false;

    egui::CollapsingHeader::new("Model Configuration")
        .default_open(false)
        .show(ui, |ui| {
            let mut supports_images = info.supports_images.unwrap_or(false);
            if ui.checkbox(&mut supports_images, "Supports Images").changed() {
                info.supports_images = Some(supports_images);
                changed = true;
            }

            let mut context_window = info.context_window.unwrap_or(128_000);
            ui.horizontal(|ui| {
                ui.label("Context Window Size:");
                if ui
                    .add(egui::DragValue::new(&mut context_window).range(1..=10_000_000))
                    .changed()
                {
                    info.context_window = Some(context_window);
                    changed = true;
                }
            });

            let mut max_tokens = info.max_tokens.unwrap_or(0);
            ui.horizontal(|ui| {
                ui.label("Max Output Tokens:");
                if ui
                    .add(egui::DragValue::new(&mut max_tokens).range(0..=1_000_000))
                    .changed()
                {
                    info.max_tokens = (max_tokens > 0).then_some(max_tokens);
                    changed = true;
                }
                ui.label(RichText::new("0 = no limit").size(11.0).italics());
            });
        });

    if changed {
        config.open_ai_model_info = Some(info);
        edits.changed = true;
    }
}

fn render_model_info(info: &ModelInfo, ui: &mut egui::Ui, muted: Color32) {
    egui::Frame::none()
        .stroke(egui::Stroke::new(1.0, colors::border(ui.visuals())))
        .rounding(Rounding::same(6.0))
        .inner_margin(8.0)
        .show(ui, |ui| {
            if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
                ui.label(RichText::new(description).size(12.0).color(muted));
            }
            egui::Grid::new("model_info_grid")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    let mut row = |label: &str, value: String| {
                        ui.label(RichText::new(label).size(12.0).color(muted));
                        ui.label(RichText::new(value).size(12.0));
                        ui.end_row();
                    };
                    if let Some(window) = info.context_window {
                        row("Context window", format!("{window} tokens"));
                    }
                    if let Some(max) = info.max_tokens {
                        row("Max output", format!("{max} tokens"));
                    }
                    if let Some(images) = info.supports_images {
                        row("Supports images", yes_no(images));
                    }
                    row("Prompt caching", yes_no(info.supports_prompt_cache));
                    if let Some(price) = info.input_price {
                        row("Input price", format!("${price:.2} / 1M tokens"));
                    }
                    if let Some(price) = info.output_price {
                        row("Output price", format!("${price:.2} / 1M tokens"));
                    }
                });
        });
}

fn yes_no(value: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    text.to_string()
}

fn render_preferences(settings: &mut Settings, theme: &mut Theme, ui: &mut egui::Ui, muted: Color32) {
    ui.heading("Preferences");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Theme:");
        egui::ComboBox::from_id_salt("theme_select")
            .selected_text(theme.to_string())
            .show_ui(ui, |ui| {
                for option in Theme::all() {
                    ui.selectable_value(theme, *option, option.to_string());
                }
            });
    });

    ui.checkbox(
        &mut settings.refresh_on_open,
        "Fetch models when the panel opens",
    );
    ui.horizontal(|ui| {
        ui.label("Request timeout:");
        ui.add(
            egui::DragValue::new(&mut settings.request_timeout_secs)
                .range(5..=120)
                .suffix(" s"),
        );
    });
    ui.label(
        RichText::new("Applies the next time the panel opens")
            .size(11.0)
            .color(muted),
    );
}

fn render_footer(ui: &mut egui::Ui, muted: Color32) -> Option<FooterAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        if ui
            .add_sized(
                Vec2::new(100.0, 30.0),
                egui::Button::new(RichText::new("Save").strong())
                    .fill(colors::ACCENT)
                    .rounding(Rounding::same(8.0)),
            )
            .clicked()
        {
            action = Some(FooterAction::Save);
        }

        if ui
            .add_sized(
                Vec2::new(100.0, 30.0),
                egui::Button::new("Cancel").rounding(Rounding::same(8.0)),
            )
            .clicked()
        {
            action = Some(FooterAction::Cancel);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(format!("v{}", modelpanel_core::VERSION))
                    .size(11.0)
                    .color(muted),
            );
        });
    });
    action
}
