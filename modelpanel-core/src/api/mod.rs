//! Provider configuration types.
//!
//! This module provides:
//! - `ApiProvider` - Known provider identifiers (plus unknown pass-through)
//! - `ApiConfiguration` - The user's possibly-partial provider configuration
//! - `profiles` - Static per-provider field table (placeholders, defaults)

mod configuration;
pub mod profiles;
mod provider;

pub use configuration::ApiConfiguration;
pub use profiles::{profile_for, ModelSource, ProviderProfile, TokenLimitDefaults};
pub use provider::ApiProvider;
