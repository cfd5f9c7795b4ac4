//! Resolution of the effective provider and model.
//!
//! [`normalize_api_configuration`] turns a possibly-absent, possibly-partial
//! [`ApiConfiguration`] into a [`ResolvedSelection`]. The routine is pure: it
//! never fails and never mutates its input.
//!
//! Provider resolution:
//! 1. An explicit, non-empty `apiProvider` is honored as-is, licensed or not.
//!    An unlicensed privileged selection is surfaced as a notice by the panel
//!    rather than replaced here.
//! 2. Otherwise the privileged provider if licensed, else the baseline one.
//!
//! Model resolution then follows the provider's [`ModelSource`].

use crate::api::{profile_for, ApiConfiguration, ApiProvider, ModelSource};
use crate::models::known::{self, StaticModel};
use crate::models::{CatalogFamily, CatalogLookup, ModelInfo, NoCatalogs};

/// The effective selection shown by the panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedSelection {
    pub selected_provider: ApiProvider,
    pub selected_model_id: Option<String>,
    pub selected_model_info: Option<ModelInfo>,
}

/// Resolve provider and model without any host catalogs.
pub fn normalize_api_configuration(
    config: Option<&ApiConfiguration>,
    is_licensed: bool,
) -> ResolvedSelection {
    normalize_with_catalogs(config, is_licensed, &NoCatalogs)
}

/// Resolve provider and model, consulting synchronized catalogs for model info.
pub fn normalize_with_catalogs(
    config: Option<&ApiConfiguration>,
    is_licensed: bool,
    catalogs: &dyn CatalogLookup,
) -> ResolvedSelection {
    let selected_provider = resolve_provider(config, is_licensed);
    let configured_id = config.and_then(|c| c.model_id_for(&selected_provider));

    let profile = profile_for(&selected_provider);
    let (selected_model_id, selected_model_info) = if profile.is_generic() {
        (configured_id.map(str::to_string), None)
    } else {
        match profile.model_source {
            ModelSource::Static { models, default_id } => {
                resolve_static(models, default_id, configured_id)
            }
            ModelSource::Catalog {
                family,
                default_id,
                ..
            } => resolve_catalog(family, default_id, configured_id, config, catalogs),
            ModelSource::FreeText => (
                configured_id.map(str::to_string),
                free_text_info(&selected_provider, config),
            ),
        }
    };

    ResolvedSelection {
        selected_provider,
        selected_model_id,
        selected_model_info,
    }
}

fn resolve_provider(config: Option<&ApiConfiguration>, is_licensed: bool) -> ApiProvider {
    if let Some(explicit) = config.and_then(ApiConfiguration::explicit_provider) {
        return explicit.clone();
    }
    if is_licensed {
        ApiProvider::PRIVILEGED
    } else {
        ApiProvider::BASELINE
    }
}

fn resolve_static(
    models: &'static [StaticModel],
    default_id: &'static str,
    configured_id: Option<&str>,
) -> (Option<String>, Option<ModelInfo>) {
    let model = configured_id
        .and_then(|id| known::find(models, id))
        .or_else(|| known::find(models, default_id));
    match model {
        Some(model) => (Some(model.id.to_string()), Some(model.to_info())),
        None => (Some(default_id.to_string()), None),
    }
}

fn resolve_catalog(
    family: CatalogFamily,
    default_id: Option<&'static str>,
    configured_id: Option<&str>,
    config: Option<&ApiConfiguration>,
    catalogs: &dyn CatalogLookup,
) -> (Option<String>, Option<ModelInfo>) {
    let Some(id) = configured_id.or(default_id) else {
        return (None, None);
    };

    let from_catalog = catalogs.catalog(family).and_then(|c| c.get(id)).cloned();
    let stored = config.and_then(|c| match family {
        CatalogFamily::OpenRouter => c.open_router_model_info.clone(),
        CatalogFamily::Requesty => c.requesty_model_info.clone(),
        _ => None,
    });
    let fallback = default_id
        .filter(|default| *default == id)
        .map(|_| known::router_default_info());

    (Some(id.to_string()), from_catalog.or(stored).or(fallback))
}

fn free_text_info(provider: &ApiProvider, config: Option<&ApiConfiguration>) -> Option<ModelInfo> {
    match provider {
        ApiProvider::OpenAi => Some(
            config
                .and_then(|c| c.open_ai_model_info.clone())
                .unwrap_or_else(ModelInfo::openai_sane_defaults),
        ),
        ApiProvider::Fireworks => {
            let limits = profile_for(provider).token_limits;
            let max_tokens = config
                .and_then(|c| c.fireworks_model_max_completion_tokens)
                .or(limits.map(|l| l.max_completion_tokens));
            let context_window = config
                .and_then(|c| c.fireworks_model_max_tokens)
                .or(limits.map(|l| l.max_tokens));
            Some(ModelInfo {
                max_tokens,
                context_window,
                ..ModelInfo::openai_sane_defaults()
            })
        }
        ApiProvider::Together | ApiProvider::LiteLlm => Some(ModelInfo::openai_sane_defaults()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelCatalog;
    use std::collections::HashMap;

    fn config_with_provider(provider: &str) -> ApiConfiguration {
        ApiConfiguration {
            api_provider: Some(ApiProvider::parse_lossy(provider)),
            ..Default::default()
        }
    }

    // -------------------------------------------------------------------------
    // Provider Selection
    // -------------------------------------------------------------------------

    #[test]
    fn test_defaults_to_constructory_when_licensed() {
        let result = normalize_api_configuration(None, true);
        assert_eq!(result.selected_provider, ApiProvider::Constructory);
    }

    #[test]
    fn test_defaults_to_anthropic_without_license() {
        let result = normalize_api_configuration(None, false);
        assert_eq!(result.selected_provider, ApiProvider::Anthropic);
    }

    #[test]
    fn test_explicit_provider_beats_license_default() {
        let config = config_with_provider("anthropic");
        let result = normalize_api_configuration(Some(&config), true);
        assert_eq!(result.selected_provider, ApiProvider::Anthropic);
    }

    #[test]
    fn test_default_applies_when_only_other_fields_present() {
        let config = ApiConfiguration {
            api_model_id: Some("some-model".to_string()),
            ..Default::default()
        };
        let result = normalize_api_configuration(Some(&config), true);
        assert_eq!(result.selected_provider, ApiProvider::Constructory);
    }

    #[test]
    fn test_explicit_constructory_preserved_without_license() {
        let config = config_with_provider("constructory");
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(result.selected_provider, ApiProvider::Constructory);
    }

    #[test]
    fn test_empty_provider_uses_default() {
        let config = config_with_provider("");
        assert_eq!(
            normalize_api_configuration(Some(&config), false).selected_provider,
            ApiProvider::Anthropic
        );
        assert_eq!(
            normalize_api_configuration(Some(&config), true).selected_provider,
            ApiProvider::Constructory
        );
    }

    #[test]
    fn test_unknown_provider_is_explicit() {
        let mut config = config_with_provider("vscode-lm");
        config.api_model_id = Some("copilot/gpt-4o".to_string());
        let result = normalize_api_configuration(Some(&config), true);

        assert_eq!(
            result.selected_provider,
            ApiProvider::Other("vscode-lm".to_string())
        );
        assert_eq!(result.selected_model_id.as_deref(), Some("copilot/gpt-4o"));
        assert!(result.selected_model_info.is_none());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let config = config_with_provider("requesty");
        let before = config.clone();
        let _ = normalize_api_configuration(Some(&config), true);
        assert_eq!(config, before);
    }

    // -------------------------------------------------------------------------
    // Model Selection
    // -------------------------------------------------------------------------

    #[test]
    fn test_nebius_defaults_model() {
        let config = ApiConfiguration {
            api_provider: Some(ApiProvider::Nebius),
            nebius_api_key: Some(String::new()),
            ..Default::default()
        };
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            result.selected_model_id.as_deref(),
            Some("Qwen/Qwen2.5-32B-Instruct-fast")
        );
        assert_eq!(
            result.selected_model_info.and_then(|i| i.context_window),
            Some(32_768)
        );
    }

    #[test]
    fn test_static_provider_rejects_unknown_model() {
        let mut config = config_with_provider("anthropic");
        config.api_model_id = Some("not-a-claude".to_string());
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            result.selected_model_id.as_deref(),
            Some(known::ANTHROPIC_DEFAULT_MODEL)
        );

        config.api_model_id = Some("claude-3-5-haiku-20241022".to_string());
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            result.selected_model_id.as_deref(),
            Some("claude-3-5-haiku-20241022")
        );
    }

    #[test]
    fn test_free_text_model_stays_unset() {
        let config = ApiConfiguration {
            api_provider: Some(ApiProvider::Together),
            together_model_id: Some(String::new()),
            ..Default::default()
        };
        let result = normalize_api_configuration(Some(&config), false);
        assert!(result.selected_model_id.is_none());
    }

    #[test]
    fn test_constructory_without_model_stays_unset() {
        let result = normalize_api_configuration(None, true);
        assert!(result.selected_model_id.is_none());
        assert!(result.selected_model_info.is_none());
    }

    #[test]
    fn test_fireworks_limits_flow_into_info() {
        let config = ApiConfiguration {
            api_provider: Some(ApiProvider::Fireworks),
            fireworks_model_id: Some("accounts/fireworks/models/llama".to_string()),
            fireworks_model_max_completion_tokens: Some(2000),
            fireworks_model_max_tokens: Some(4000),
            ..Default::default()
        };
        let result = normalize_api_configuration(Some(&config), false);
        let info = result.selected_model_info.unwrap();
        assert_eq!(info.max_tokens, Some(2000));
        assert_eq!(info.context_window, Some(4000));
    }

    #[test]
    fn test_openai_uses_stored_info_or_sane_defaults() {
        let mut config = config_with_provider("openai");
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            result.selected_model_info,
            Some(ModelInfo::openai_sane_defaults())
        );

        config.open_ai_model_info = Some(ModelInfo {
            context_window: Some(8192),
            supports_images: Some(false),
            ..Default::default()
        });
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            result.selected_model_info.and_then(|i| i.context_window),
            Some(8192)
        );
    }

    #[test]
    fn test_catalog_provides_model_info() {
        let mut config = config_with_provider("constructory");
        config.constructor_model_id = Some("model-2".to_string());

        let mut catalogs = HashMap::new();
        catalogs.insert(
            CatalogFamily::Constructory,
            serde_json::from_str::<ModelCatalog>(
                r#"{"model-2": {"id": "model-2", "description": "Model 2"}}"#,
            )
            .unwrap(),
        );

        let result = normalize_with_catalogs(Some(&config), false, &catalogs);
        assert_eq!(result.selected_model_id.as_deref(), Some("model-2"));
        assert_eq!(
            result
                .selected_model_info
                .and_then(|i| i.description),
            Some("Model 2".to_string())
        );
    }

    #[test]
    fn test_requesty_falls_back_to_default() {
        let config = config_with_provider("requesty");
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            result.selected_model_id.as_deref(),
            Some(known::REQUESTY_DEFAULT_MODEL)
        );
        assert!(result.selected_model_info.is_some());
    }

    #[test]
    fn test_requesty_prefers_catalog_over_stored_info() {
        let mut config = config_with_provider("requesty");
        config.requesty_model_id = Some("openai/gpt-4o".to_string());
        config.requesty_model_info = Some(ModelInfo {
            description: Some("stale".to_string()),
            ..Default::default()
        });

        let without = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            without.selected_model_info.and_then(|i| i.description),
            Some("stale".to_string())
        );

        let mut catalogs = HashMap::new();
        catalogs.insert(
            CatalogFamily::Requesty,
            [(
                "openai/gpt-4o".to_string(),
                ModelInfo {
                    description: Some("fresh".to_string()),
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect::<ModelCatalog>(),
        );
        let with = normalize_with_catalogs(Some(&config), false, &catalogs);
        assert_eq!(
            with.selected_model_info.and_then(|i| i.description),
            Some("fresh".to_string())
        );
    }

    #[test]
    fn test_openrouter_uses_stored_info_then_default() {
        let config = config_with_provider("openrouter");
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(result.selected_provider, ApiProvider::OpenRouter);
        assert_eq!(
            result.selected_model_id.as_deref(),
            Some(known::OPENROUTER_DEFAULT_MODEL)
        );
        assert_eq!(result.selected_model_info, Some(known::router_default_info()));

        let mut config = config_with_provider("openrouter");
        config.open_router_model_id = Some("google/gemini-2.0-flash".to_string());
        config.open_router_model_info = Some(ModelInfo {
            context_window: Some(1_000_000),
            ..Default::default()
        });
        let result = normalize_api_configuration(Some(&config), false);
        assert_eq!(
            result.selected_model_id.as_deref(),
            Some("google/gemini-2.0-flash")
        );
        assert_eq!(
            result.selected_model_info.and_then(|i| i.context_window),
            Some(1_000_000)
        );
    }

    #[test]
    fn test_local_providers_keep_stored_id() {
        let mut ollama = config_with_provider("ollama");
        ollama.ollama_model_id = Some("llama3:8b".to_string());
        let result = normalize_api_configuration(Some(&ollama), true);
        assert_eq!(result.selected_provider, ApiProvider::Ollama);
        assert_eq!(result.selected_model_id.as_deref(), Some("llama3:8b"));
        assert!(result.selected_model_info.is_none());

        let mut lm_studio = config_with_provider("lmstudio");
        lm_studio.lm_studio_model_id = Some("qwen2.5-7b-instruct".to_string());
        let result = normalize_api_configuration(Some(&lm_studio), false);
        assert_eq!(result.selected_provider, ApiProvider::LmStudio);
        assert_eq!(
            result.selected_model_id.as_deref(),
            Some("qwen2.5-7b-instruct")
        );
        assert!(result.selected_model_info.is_none());
    }

    #[test]
    fn test_local_providers_without_model_stay_unset() {
        for provider in ["ollama", "lmstudio"] {
            let result = normalize_api_configuration(Some(&config_with_provider(provider)), false);
            assert!(result.selected_model_id.is_none(), "{provider}");
            assert!(result.selected_model_info.is_none(), "{provider}");
        }
    }

    #[test]
    fn test_local_catalog_supplies_info() {
        let mut config = config_with_provider("ollama");
        config.ollama_model_id = Some("qwen2".to_string());

        let mut catalogs = HashMap::new();
        catalogs.insert(
            CatalogFamily::Ollama,
            ModelCatalog::from_names(["llama3", "qwen2"]),
        );
        let result = normalize_with_catalogs(Some(&config), false, &catalogs);
        assert_eq!(
            result.selected_model_info.and_then(|i| i.id),
            Some("qwen2".to_string())
        );
    }
}
