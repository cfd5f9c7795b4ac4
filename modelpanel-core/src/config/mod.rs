//! Persisted panel settings.

mod settings;

pub use settings::{Settings, Theme, DEFAULT_REQUEST_TIMEOUT_SECS};
