//! Model metadata.

use serde::{Deserialize, Serialize};

/// Metadata for one selectable model.
///
/// Every field is optional: host catalogs frequently carry only an id and a
/// description, and stored per-provider overrides only set what the user typed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_images: Option<bool>,
    #[serde(default)]
    pub supports_prompt_cache: bool,
    /// USD per million input tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_price: Option<f64>,
    /// USD per million output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_price: Option<f64>,
}

impl ModelInfo {
    /// Minimal info carrying only an id, used for name-only catalogs.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Defaults for OpenAI-compatible endpoints where nothing is known about the model.
    pub fn openai_sane_defaults() -> Self {
        Self {
            max_tokens: None,
            context_window: Some(128_000),
            supports_images: Some(true),
            supports_prompt_cache: false,
            input_price: Some(0.0),
            output_price: Some(0.0),
            ..Default::default()
        }
    }

    /// Label shown in model dropdowns.
    pub fn display_label<'a>(&'a self, fallback_id: &'a str) -> &'a str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(fallback_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_minimal_catalog_entry() {
        let info: ModelInfo =
            serde_json::from_str(r#"{"id":"model-1","description":"Model 1"}"#).unwrap();
        assert_eq!(info.id.as_deref(), Some("model-1"));
        assert_eq!(info.description.as_deref(), Some("Model 1"));
        assert!(info.max_tokens.is_none());
        assert!(!info.supports_prompt_cache);
    }

    #[test]
    fn test_camel_case_keys() {
        let info: ModelInfo = serde_json::from_str(
            r#"{"maxTokens":4000,"contextWindow":32000,"supportsImages":false}"#,
        )
        .unwrap();
        assert_eq!(info.max_tokens, Some(4000));
        assert_eq!(info.context_window, Some(32_000));
        assert_eq!(info.supports_images, Some(false));
    }

    #[test]
    fn test_display_label_falls_back_to_id() {
        let info = ModelInfo::with_id("m");
        assert_eq!(info.display_label("m"), "m");

        let described = ModelInfo {
            description: Some("Fast model".to_string()),
            ..Default::default()
        };
        assert_eq!(described.display_label("m"), "Fast model");
    }
}
