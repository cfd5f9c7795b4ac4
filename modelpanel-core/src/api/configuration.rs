//! The user's provider configuration record.

use serde::{Deserialize, Serialize};

use super::provider::ApiProvider;
use crate::models::ModelInfo;

/// Provider configuration as stored by the panel.
///
/// Every field is optional and the record may be entirely absent; JSON keys
/// are camelCase to match the host's configuration format. Only the fields of
/// the selected provider are consulted when resolving a selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_provider: Option<ApiProvider>,
    /// Model id for fixed-list providers (anthropic, gemini, nebius, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_router_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_router_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_router_model_info: Option<ModelInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ai_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ai_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ai_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ai_model_info: Option<ModelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ai_native_api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lm_studio_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lm_studio_model_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_seek_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mistral_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xai_api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requesty_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requesty_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requesty_model_info: Option<ModelInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub together_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub together_model_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fireworks_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fireworks_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fireworks_model_max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fireworks_model_max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nebius_api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lite_llm_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lite_llm_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lite_llm_model_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructory_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructory_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor_model_id: Option<String>,
}

impl ApiConfiguration {
    /// The explicitly chosen provider, ignoring empty identifiers.
    pub fn explicit_provider(&self) -> Option<&ApiProvider> {
        self.api_provider.as_ref().filter(|p| p.is_set())
    }

    /// The stored model id for `provider`, empty strings treated as unset.
    pub fn model_id_for(&self, provider: &ApiProvider) -> Option<&str> {
        let field = match provider {
            ApiProvider::OpenRouter => &self.open_router_model_id,
            ApiProvider::OpenAi => &self.open_ai_model_id,
            ApiProvider::Ollama => &self.ollama_model_id,
            ApiProvider::LmStudio => &self.lm_studio_model_id,
            ApiProvider::Requesty => &self.requesty_model_id,
            ApiProvider::Together => &self.together_model_id,
            ApiProvider::Fireworks => &self.fireworks_model_id,
            ApiProvider::LiteLlm => &self.lite_llm_model_id,
            ApiProvider::Constructory => &self.constructor_model_id,
            ApiProvider::Anthropic
            | ApiProvider::OpenAiNative
            | ApiProvider::Gemini
            | ApiProvider::DeepSeek
            | ApiProvider::Mistral
            | ApiProvider::Xai
            | ApiProvider::Nebius
            | ApiProvider::Other(_) => &self.api_model_id,
        };
        field.as_deref().filter(|id| !id.is_empty())
    }

    /// Store a model id for `provider` in the field that provider reads.
    pub fn set_model_id(&mut self, provider: &ApiProvider, id: impl Into<String>) {
        let id = Some(id.into());
        match provider {
            ApiProvider::OpenRouter => self.open_router_model_id = id,
            ApiProvider::OpenAi => self.open_ai_model_id = id,
            ApiProvider::Ollama => self.ollama_model_id = id,
            ApiProvider::LmStudio => self.lm_studio_model_id = id,
            ApiProvider::Requesty => self.requesty_model_id = id,
            ApiProvider::Together => self.together_model_id = id,
            ApiProvider::Fireworks => self.fireworks_model_id = id,
            ApiProvider::LiteLlm => self.lite_llm_model_id = id,
            ApiProvider::Constructory => self.constructor_model_id = id,
            _ => self.api_model_id = id,
        }
    }

    /// Mutable access to the api key field `provider` uses, if it has one.
    pub fn api_key_mut(&mut self, provider: &ApiProvider) -> Option<&mut Option<String>> {
        match provider {
            ApiProvider::Anthropic => Some(&mut self.api_key),
            ApiProvider::OpenRouter => Some(&mut self.open_router_api_key),
            ApiProvider::OpenAi => Some(&mut self.open_ai_api_key),
            ApiProvider::OpenAiNative => Some(&mut self.open_ai_native_api_key),
            ApiProvider::Gemini => Some(&mut self.gemini_api_key),
            ApiProvider::DeepSeek => Some(&mut self.deep_seek_api_key),
            ApiProvider::Mistral => Some(&mut self.mistral_api_key),
            ApiProvider::Xai => Some(&mut self.xai_api_key),
            ApiProvider::Requesty => Some(&mut self.requesty_api_key),
            ApiProvider::Together => Some(&mut self.together_api_key),
            ApiProvider::Fireworks => Some(&mut self.fireworks_api_key),
            ApiProvider::Nebius => Some(&mut self.nebius_api_key),
            ApiProvider::LiteLlm => Some(&mut self.lite_llm_api_key),
            ApiProvider::Constructory => Some(&mut self.constructory_api_key),
            ApiProvider::Ollama | ApiProvider::LmStudio | ApiProvider::Other(_) => None,
        }
    }

    /// Mutable access to the base URL field `provider` uses, if it has one.
    pub fn base_url_mut(&mut self, provider: &ApiProvider) -> Option<&mut Option<String>> {
        match provider {
            ApiProvider::OpenAi => Some(&mut self.open_ai_base_url),
            ApiProvider::Ollama => Some(&mut self.ollama_base_url),
            ApiProvider::LmStudio => Some(&mut self.lm_studio_base_url),
            ApiProvider::LiteLlm => Some(&mut self.lite_llm_base_url),
            ApiProvider::Constructory => Some(&mut self.constructory_base_url),
            _ => None,
        }
    }
}
