//! Host catalog synchronization.
//!
//! This module provides:
//! - `FamilySync` - Per-family phase, error and catalog with stale-response guard
//! - `HostMessage` / `PanelEvent` / `PanelRequest` - Wire and typed messages
//! - `CatalogStatus` - Render-time status line derivation
//! - `PanelStore` - Panel-scoped owner of configuration, license and catalogs

mod events;
mod state;
mod status;
mod store;

pub use events::{
    host_channel, request_channel, HostMessage, HostMessageError, HostReceiver, HostSender,
    PanelEvent, PanelRequest, RequestReceiver, RequestSender,
};
pub use state::{ApplyOutcome, FamilySync, RequestId, SyncPhase};
pub use status::{CatalogStatus, LOADING_MESSAGE, UNKNOWN_ERROR};
pub use store::{PanelStore, ProviderNotice};
