//! Panel-scoped store for configuration, license and catalogs.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::{PanelEvent, PanelRequest};
use super::state::{ApplyOutcome, FamilySync, RequestId};
use super::status::CatalogStatus;
use crate::api::{ApiConfiguration, ApiProvider};
use crate::license::{LicenseState, LICENSE_NOTICE};
use crate::models::{CatalogFamily, CatalogLookup, ModelCatalog};
use crate::normalize::{normalize_with_catalogs, ResolvedSelection};

/// Blocking notice shown above the provider's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderNotice {
    /// The selected provider needs a license the user does not hold.
    LicenseRequired,
}

impl ProviderNotice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::LicenseRequired => LICENSE_NOTICE,
        }
    }
}

/// State owned by one open settings panel.
///
/// Created with [`PanelStore::open`] when the panel opens and dropped when it
/// closes. Catalogs and sync state live only here and are never persisted.
/// The configuration is the caller's snapshot; catalog updates never touch it.
#[derive(Debug)]
pub struct PanelStore {
    id: Uuid,
    configuration: Option<ApiConfiguration>,
    license: LicenseState,
    families: HashMap<CatalogFamily, FamilySync>,
}

impl PanelStore {
    /// Open a panel over a configuration snapshot.
    pub fn open(configuration: Option<ApiConfiguration>) -> Self {
        let id = Uuid::new_v4();
        info!(panel_id = %id, configured = configuration.is_some(), "Settings panel opened");
        let families = CatalogFamily::all()
            .iter()
            .map(|family| (*family, FamilySync::default()))
            .collect();
        Self {
            id,
            configuration,
            license: LicenseState::default(),
            families,
        }
    }

    /// Start from a license list delivered to an earlier panel.
    pub fn with_license(mut self, license: LicenseState) -> Self {
        self.license = license;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    pub fn configuration(&self) -> Option<&ApiConfiguration> {
        self.configuration.as_ref()
    }

    /// Mutable configuration, created empty if absent.
    pub fn configuration_mut(&mut self) -> &mut ApiConfiguration {
        self.configuration.get_or_insert_with(ApiConfiguration::default)
    }

    pub fn set_configuration(&mut self, configuration: Option<ApiConfiguration>) {
        self.configuration = configuration;
    }

    /// Make `provider` the explicit selection.
    pub fn select_provider(&mut self, provider: ApiProvider) {
        debug!(panel_id = %self.id, provider = %provider, "Provider selected");
        self.configuration_mut().api_provider = Some(provider);
    }

    /// Store `model_id` for the currently resolved provider.
    pub fn select_model(&mut self, model_id: impl Into<String>) {
        let provider = self.resolve().selected_provider;
        let model_id = model_id.into();
        debug!(panel_id = %self.id, provider = %provider, model = %model_id, "Model selected");
        self.configuration_mut().set_model_id(&provider, model_id);
    }

    /// Effective provider and model for rendering.
    pub fn resolve(&self) -> ResolvedSelection {
        normalize_with_catalogs(
            self.configuration.as_ref(),
            self.license.has_constructory_license(),
            self,
        )
    }

    /// Notice to show for the resolved provider. The selection is never
    /// changed to avoid it.
    pub fn provider_notice(&self) -> Option<ProviderNotice> {
        let provider = self.resolve().selected_provider;
        if self.license.is_loading() || self.license.permits(&provider) {
            return None;
        }
        Some(ProviderNotice::LicenseRequired)
    }

    // -------------------------------------------------------------------------
    // License
    // -------------------------------------------------------------------------

    pub fn license(&self) -> &LicenseState {
        &self.license
    }

    /// Mark the license list as requested and build the host request.
    pub fn license_request(&mut self) -> PanelRequest {
        self.license.set_loading(true);
        PanelRequest::RefreshLicense {
            configuration: Box::new(self.configuration.clone().unwrap_or_default()),
        }
    }

    // -------------------------------------------------------------------------
    // Catalog Sync
    // -------------------------------------------------------------------------

    pub fn sync(&self, family: CatalogFamily) -> &FamilySync {
        &self.families[&family]
    }

    pub fn catalog_of(&self, family: CatalogFamily) -> &ModelCatalog {
        self.sync(family).catalog()
    }

    pub fn status(&self, family: CatalogFamily) -> CatalogStatus {
        CatalogStatus::of(self.sync(family))
    }

    fn transition<F>(&mut self, family: CatalogFamily, step: F) -> ApplyOutcome
    where
        F: FnOnce(FamilySync) -> (FamilySync, ApplyOutcome),
    {
        let entry = self.families.entry(family).or_default();
        let (next, outcome) = step(std::mem::take(entry));
        *entry = next;
        outcome
    }

    /// Mark `family` as loading and issue a new request id for it.
    pub fn begin_refresh(&mut self, family: CatalogFamily) -> RequestId {
        let mut issued = RequestId::default();
        self.transition(family, |sync| {
            let (next, request) = sync.begin();
            issued = request;
            (next, ApplyOutcome::Applied)
        });
        debug!(panel_id = %self.id, %family, request = %issued, "Catalog refresh started");
        issued
    }

    /// [`begin_refresh`](Self::begin_refresh) plus the request to send to the host.
    pub fn refresh_request(&mut self, family: CatalogFamily) -> PanelRequest {
        let request_id = self.begin_refresh(family);
        PanelRequest::RefreshCatalog {
            family,
            request_id,
            configuration: Box::new(self.configuration.clone().unwrap_or_default()),
        }
    }

    /// Replace the catalog of `family`. Never alters the selected model id.
    pub fn apply_catalog(
        &mut self,
        family: CatalogFamily,
        catalog: ModelCatalog,
        request: Option<RequestId>,
    ) -> ApplyOutcome {
        let models = catalog.len();
        let outcome = self.transition(family, |sync| sync.complete(catalog, request));
        match outcome {
            ApplyOutcome::Applied => {
                info!(panel_id = %self.id, %family, models, "Catalog updated");
            }
            ApplyOutcome::Stale => {
                debug!(panel_id = %self.id, %family, ?request, "Dropped stale catalog");
            }
        }
        outcome
    }

    /// Record a failed fetch for `family`. The previous catalog is kept.
    pub fn apply_error(
        &mut self,
        family: CatalogFamily,
        message: impl Into<String>,
        request: Option<RequestId>,
    ) -> ApplyOutcome {
        let message = message.into();
        let outcome = self.transition(family, |sync| sync.fail(message.clone(), request));
        match outcome {
            ApplyOutcome::Applied => {
                warn!(panel_id = %self.id, %family, error = %message, "Catalog fetch failed");
            }
            ApplyOutcome::Stale => {
                debug!(panel_id = %self.id, %family, ?request, "Dropped stale catalog error");
            }
        }
        outcome
    }

    /// Apply one inbound event.
    pub fn handle(&mut self, event: PanelEvent) -> ApplyOutcome {
        match event {
            PanelEvent::CatalogLoaded {
                family,
                catalog,
                request_id,
            } => self.apply_catalog(family, catalog, request_id),
            PanelEvent::CatalogFailed {
                family,
                message,
                request_id,
            } => self.apply_error(family, message, request_id),
            PanelEvent::LicenseUpdated(features) => {
                info!(panel_id = %self.id, features = features.len(), "Licensed features updated");
                self.license.set_features(features);
                ApplyOutcome::Applied
            }
            PanelEvent::LicenseLoading => {
                self.license.set_loading(true);
                ApplyOutcome::Applied
            }
        }
    }
}

impl CatalogLookup for PanelStore {
    fn catalog(&self, family: CatalogFamily) -> Option<&ModelCatalog> {
        self.families.get(&family).map(FamilySync::catalog)
    }
}

impl Drop for PanelStore {
    fn drop(&mut self) {
        info!(panel_id = %self.id, "Settings panel closed");
    }
}
