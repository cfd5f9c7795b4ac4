//! Modelpanel Core Library
//!
//! Provider selection and model catalog synchronization for a settings
//! panel. It includes:
//!
//! - Provider configuration types and the static provider field table
//! - A pure normalizer resolving the effective provider and model
//! - License state and license-denial detection
//! - Per-family catalog sync with stale-response protection
//! - A host bridge fetching catalogs over HTTP
//! - SQLite-backed settings persistence

pub mod api;
pub mod config;
pub mod db;
pub mod host;
pub mod license;
pub mod models;
pub mod normalize;
pub mod sync;

// Re-exports for convenience
pub use api::{profile_for, ApiConfiguration, ApiProvider, ModelSource, ProviderProfile};
pub use config::{Settings, Theme};
pub use db::Database;
pub use license::{is_license_denial, LicenseState, LICENSE_NOTICE};
pub use models::{CatalogFamily, ModelCatalog, ModelInfo};
pub use normalize::{normalize_api_configuration, normalize_with_catalogs, ResolvedSelection};

// Re-export host bridge
pub use host::{CatalogError, CatalogSource, HostBridge, HttpCatalogSource};

// Re-export sync
pub use sync::{
    host_channel, request_channel, CatalogStatus, HostMessage, HostReceiver, HostSender,
    PanelEvent, PanelRequest, PanelStore, ProviderNotice, RequestId, RequestReceiver,
    RequestSender,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn exports_are_accessible() {
        fn _check_types(
            _db: &Database,
            _settings: &Settings,
            _theme: Theme,
            _store: &PanelStore,
            _source: &HttpCatalogSource,
            _bridge: &HostBridge,
            _selection: &ResolvedSelection,
        ) {
        }
    }

    #[test]
    fn normalizer_exported() {
        let resolved = normalize_api_configuration(None, false);
        assert_eq!(resolved.selected_provider, ApiProvider::Anthropic);
    }
}
