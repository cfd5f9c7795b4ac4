//! Model metadata and catalogs.
//!
//! This module provides:
//! - `ModelInfo` - Per-model metadata (limits, capabilities, pricing)
//! - `ModelCatalog` - Host-synchronized model list for one provider family
//! - `known` - Compiled-in model tables for fixed-list providers

mod catalog;
mod info;
pub mod known;

pub use catalog::{CatalogFamily, CatalogLookup, ModelCatalog, NoCatalogs};
pub use info::ModelInfo;
