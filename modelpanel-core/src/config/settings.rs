//! Panel settings, stored in SQLite as a single JSON value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::ApiConfiguration;
use crate::db::Database;

const SETTINGS_KEY: &str = "settings";
const API_CONFIGURATION_FIELD: &str = "api_configuration";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Theme Selection
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &[Self::Dark, Self::Light]
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => write!(f, "Dark"),
            Self::Light => write!(f, "Light"),
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Everything the panel persists between runs.
///
/// Catalogs and license state are not here; they are re-fetched per panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `None` until the user saves a provider for the first time.
    pub api_configuration: Option<ApiConfiguration>,
    pub theme: Theme,
    /// Refresh the license list and the selected family's catalog when a panel opens.
    pub refresh_on_open: bool,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_configuration: None,
            theme: Theme::default(),
            refresh_on_open: true,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Load from `db`, falling back to defaults when missing or unreadable.
    ///
    /// A field holding a value of the wrong type is dropped on its own; the
    /// rest of the stored settings survive.
    pub fn load(db: &Database) -> Self {
        match db.get_setting(SETTINGS_KEY) {
            Ok(Some(json)) => match Self::parse_stored(&json) {
                Ok(mut loaded) => {
                    loaded.validate();
                    loaded
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    fn parse_stored(json: &str) -> Result<Self, serde_json::Error> {
        let mut value: Value = serde_json::from_str(json)?;
        if let Value::Object(fields) = &mut value {
            if let Some(Value::Object(config)) = fields.get_mut(API_CONFIGURATION_FIELD) {
                retain_readable::<ApiConfiguration>(config);
            }
            retain_readable::<Settings>(fields);
        }
        serde_json::from_value(value)
    }

    pub fn save(&self, db: &Database) -> anyhow::Result<()> {
        let json = serde_json::to_string(self)?;
        db.set_setting(SETTINGS_KEY, &json)?;
        tracing::debug!("Settings saved");
        Ok(())
    }

    /// Clamp numeric fields and drop blank base URLs.
    pub fn validate(&mut self) {
        self.request_timeout_secs = self.request_timeout_secs.clamp(5, 120);

        if let Some(config) = self.api_configuration.as_mut() {
            for url in [
                &mut config.open_ai_base_url,
                &mut config.ollama_base_url,
                &mut config.lm_studio_base_url,
                &mut config.lite_llm_base_url,
                &mut config.constructory_base_url,
            ] {
                if url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                    *url = None;
                }
            }
        }
    }
}

/// Drop every entry of `fields` that `T` cannot read on its own.
fn retain_readable<T: DeserializeOwned>(fields: &mut Map<String, Value>) {
    fields.retain(|key, value| {
        let single = Map::from_iter([(key.clone(), value.clone())]);
        match serde_json::from_value::<T>(Value::Object(single)) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(field = %key, error = %e, "Dropping unreadable stored setting");
                false
            }
        }
    });
}
