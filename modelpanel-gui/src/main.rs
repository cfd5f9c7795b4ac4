//! Modelpanel GUI Application
//!
//! Desktop settings panel for choosing an AI provider and model.

mod app;
mod ui;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("modelpanel=debug".parse()?)
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Modelpanel v{}", modelpanel_core::VERSION);

    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([560.0, 480.0])
            .with_title("Modelpanel - Provider Settings"),
        ..Default::default()
    };

    eframe::run_native(
        "Modelpanel",
        options,
        Box::new(|cc| Ok(Box::new(app::PanelApp::new(cc, runtime)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run UI: {e}"))
}
