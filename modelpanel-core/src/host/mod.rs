//! Host side of catalog synchronization.
//!
//! This module provides:
//! - `CatalogSource` - Async trait for fetching catalogs and licensed features
//! - `HttpCatalogSource` - reqwest-backed source hitting each provider's API
//! - `HostBridge` - Background task turning `PanelRequest`s into `HostMessage`s

mod bridge;
mod source;

pub use bridge::HostBridge;
pub use source::{CatalogError, CatalogSource, HttpCatalogSource};
