//! Application state and update loop.

use std::time::Duration;

use eframe::egui;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

use modelpanel_core::{
    host_channel, request_channel, CatalogFamily, Database, HostBridge, HostReceiver,
    HttpCatalogSource, LicenseState, PanelStore, RequestSender, Settings, Theme,
};
use modelpanel_core::sync::SyncPhase;

use crate::ui;

// =============================================================================
// Open Panel
// =============================================================================

/// Everything that lives only while the settings panel is open.
///
/// Dropping it drops the store and stops the host bridge.
pub struct OpenPanel {
    pub store: PanelStore,
    /// Search text for searchable catalogs.
    pub model_search: String,
    license_requested: bool,
    requests: RequestSender,
    host_rx: HostReceiver,
    _bridge: HostBridge,
}

impl OpenPanel {
    /// Ask the host for a fresh catalog of `family`.
    pub fn refresh(&mut self, family: CatalogFamily) {
        let request = self.store.refresh_request(family);
        if self.requests.send(request).is_err() {
            warn!(%family, "Host bridge is gone, refresh not sent");
            self.store
                .apply_error(family, "Host connection closed", None);
        }
    }

    pub fn refresh_license(&mut self) {
        self.license_requested = true;
        let request = self.store.license_request();
        if self.requests.send(request).is_err() {
            warn!("Host bridge is gone, license refresh not sent");
        }
    }

    /// License list delivered to this panel, if one arrived.
    fn delivered_license(&self) -> Option<&LicenseState> {
        let license = self.store.license();
        (self.license_requested && !license.is_loading()).then_some(license)
    }

    /// Catalog family of the resolved provider, if it has one.
    pub fn selected_family(&self) -> Option<CatalogFamily> {
        CatalogFamily::for_provider(&self.store.resolve().selected_provider)
    }

    /// Apply every host message that has arrived. Returns how many were applied.
    fn drain_host_messages(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.host_rx.try_recv() {
            self.store.handle(message.into_event());
            applied += 1;
        }
        applied
    }
}

// =============================================================================
// Application State
// =============================================================================

pub struct PanelApp {
    pub runtime: Runtime,
    pub db: Database,
    pub settings: Settings,
    /// Last license list the host delivered. Not persisted.
    pub license: Option<LicenseState>,

    /// `Some` while the settings panel is shown.
    pub panel: Option<OpenPanel>,

    pub status_message: Option<(String, chrono::DateTime<chrono::Utc>)>,
}

impl PanelApp {
    pub fn new(cc: &eframe::CreationContext<'_>, runtime: Runtime) -> Self {
        info!("Initializing PanelApp");

        let db = match Database::open() {
            Ok(db) => db,
            Err(e) => {
                error!("Failed to open database: {}", e);
                Self::fallback_database()
            }
        };
        if let Err(e) = db.migrate() {
            error!("Failed to migrate database: {}", e);
        }

        let settings = Settings::load(&db);
        debug!(theme = %settings.theme, configured = settings.api_configuration.is_some(), "Loaded settings");

        apply_theme(&cc.egui_ctx, settings.theme);

        let mut app = Self {
            runtime,
            db,
            settings,
            license: None,
            panel: None,
            status_message: None,
        };
        app.open_panel();
        app
    }

    /// Scratch database in the temp dir when the data directory is unusable.
    fn fallback_database() -> Database {
        let path = std::env::temp_dir().join(format!("modelpanel-{}.db", std::process::id()));
        match Database::open_at(path) {
            Ok(db) => db,
            Err(e) => {
                error!("Failed to open fallback database: {}", e);
                std::process::exit(1);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Panel Lifecycle
    // -------------------------------------------------------------------------

    pub fn open_panel(&mut self) {
        if self.panel.is_some() {
            return;
        }

        let timeout = Duration::from_secs(self.settings.request_timeout_secs);
        let source = match HttpCatalogSource::new(timeout) {
            Ok(source) => source,
            Err(e) => {
                error!("Failed to create HTTP client: {}", e);
                self.set_status("Could not start model fetching");
                return;
            }
        };

        let (request_tx, request_rx) = request_channel();
        let (host_tx, host_rx) = host_channel();
        let bridge = HostBridge::spawn(self.runtime.handle(), source, request_rx, host_tx);

        let mut store = PanelStore::open(self.settings.api_configuration.clone());
        if let Some(license) = &self.license {
            store = store.with_license(license.clone());
        }
        let mut panel = OpenPanel {
            store,
            model_search: String::new(),
            license_requested: false,
            requests: request_tx,
            host_rx,
            _bridge: bridge,
        };
        if self.settings.refresh_on_open {
            panel.refresh_license();
        }
        self.panel = Some(panel);
    }

    /// Close the panel, persisting its configuration when `save` is set.
    pub fn close_panel(&mut self, save: bool) {
        let Some(panel) = self.panel.take() else {
            return;
        };
        if let Some(license) = panel.delivered_license() {
            self.license = Some(license.clone());
        }
        if save {
            self.settings.api_configuration = panel.store.configuration().cloned();
            self.save_settings();
        }
    }

    /// Fetch the selected provider's catalog the first time it is needed.
    fn ensure_selected_catalog(&mut self) {
        if !self.settings.refresh_on_open {
            return;
        }
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        if panel.store.license().is_loading() {
            return;
        }
        if let Some(family) = panel.selected_family() {
            if panel.store.sync(family).phase() == SyncPhase::Idle {
                debug!(%family, "Auto-fetching catalog");
                panel.refresh(family);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Status / Persistence
    // -------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), chrono::Utc::now()));
    }

    pub fn clear_old_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if chrono::Utc::now() - *time > chrono::Duration::seconds(5) {
                self.status_message = None;
            }
        }
    }

    pub fn save_settings(&mut self) {
        self.settings.validate();
        if let Err(e) = self.settings.save(&self.db) {
            error!("Failed to save settings: {}", e);
            self.set_status("Failed to save settings");
        } else {
            self.set_status("Settings saved");
        }
    }

    pub fn set_theme(&mut self, ctx: &egui::Context, theme: Theme) {
        self.settings.theme = theme;
        apply_theme(ctx, theme);
    }
}

fn apply_theme(ctx: &egui::Context, theme: Theme) {
    let visuals = match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    };
    ctx.set_visuals(visuals);
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut waiting = false;
        if let Some(panel) = self.panel.as_mut() {
            if panel.drain_host_messages() > 0 {
                ctx.request_repaint();
            }
            let family_loading = panel
                .selected_family()
                .is_some_and(|family| panel.store.sync(family).is_loading());
            waiting = family_loading || panel.store.license().is_loading();
        }
        self.ensure_selected_catalog();
        self.clear_old_status();

        egui::TopBottomPanel::bottom("status_panel")
            .max_height(24.0)
            .show(ctx, |ui| {
                ui::status::render(self, ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.panel.is_none() {
                ui::closed::render(self, ui);
            }
        });

        if self.panel.is_some() {
            ui::settings::render(self, ctx);
        }

        // Host responses arrive off-thread; keep polling while any are pending.
        if waiting {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
