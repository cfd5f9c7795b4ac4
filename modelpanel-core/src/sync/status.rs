//! Render-time view of a family's sync state.

use super::state::{FamilySync, SyncPhase};
use crate::license::{is_license_denial, LICENSE_NOTICE};

pub const LOADING_MESSAGE: &str = "Loading models...";

/// Shown when a fetch failed without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// What the panel should show next to a catalog-backed model picker.
///
/// Derived on every read; nothing here is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready { models: usize },
    /// The host refused the catalog for lack of a license.
    LicenseRequired,
    /// Any other failure, with the raw message.
    Failed(String),
}

impl CatalogStatus {
    /// Classify a family's state. An error always wins over a loading flag.
    pub fn of(sync: &FamilySync) -> Self {
        if let Some(message) = sync.error().filter(|m| !m.trim().is_empty()) {
            return if is_license_denial(message) {
                Self::LicenseRequired
            } else {
                Self::Failed(message.to_string())
            };
        }
        if sync.is_loading() {
            return Self::Loading;
        }
        match sync.phase() {
            SyncPhase::Idle => Self::Idle,
            SyncPhase::Errored => Self::Failed(UNKNOWN_ERROR.to_string()),
            _ => Self::Ready {
                models: sync.catalog().len(),
            },
        }
    }

    /// Text for the status line, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle | Self::Ready { .. } => None,
            Self::Loading => Some(LOADING_MESSAGE),
            Self::LicenseRequired => Some(LICENSE_NOTICE),
            Self::Failed(message) => Some(message),
        }
    }

    pub fn shows_spinner(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::LicenseRequired | Self::Failed(_))
    }
}
