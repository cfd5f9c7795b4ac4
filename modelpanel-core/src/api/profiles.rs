//! Static per-provider field table.
//!
//! Which fields a provider shows, their placeholders, where its model list
//! comes from and its default model id. This is data only; the resolution
//! logic lives in [`crate::normalize`].

use super::provider::ApiProvider;
use crate::models::known::{self, StaticModel};
use crate::models::CatalogFamily;

pub const API_KEY_PLACEHOLDER: &str = "Enter API Key...";
pub const MODEL_ID_PLACEHOLDER: &str = "Enter Model ID...";
pub const MODEL_SEARCH_PLACEHOLDER: &str = "Search and select a model...";
pub const BASE_URL_PLACEHOLDER: &str = "Enter base URL...";

/// Where a provider's selectable models come from.
#[derive(Debug, Clone, Copy)]
pub enum ModelSource {
    /// Compiled-in list with a fixed default.
    Static {
        models: &'static [StaticModel],
        default_id: &'static str,
    },
    /// List synchronized from the host.
    Catalog {
        family: CatalogFamily,
        default_id: Option<&'static str>,
        /// Rendered as a search box instead of a plain dropdown.
        searchable: bool,
    },
    /// The user types the model id.
    FreeText,
}

impl ModelSource {
    /// Placeholder for the model input, when it is a text input.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Static { .. } => None,
            Self::Catalog { searchable: true, .. } => Some(MODEL_SEARCH_PLACEHOLDER),
            Self::Catalog { .. } => None,
            Self::FreeText => Some(MODEL_ID_PLACEHOLDER),
        }
    }

    /// The fixed default model id, if the provider has one.
    pub fn default_id(&self) -> Option<&'static str> {
        match self {
            Self::Static { default_id, .. } => Some(default_id),
            Self::Catalog { default_id, .. } => *default_id,
            Self::FreeText => None,
        }
    }
}

/// Defaults for providers that expose numeric token limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimitDefaults {
    pub max_completion_tokens: u32,
    pub max_tokens: u32,
}

/// Field layout and model defaults for one provider.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub provider: ApiProvider,
    pub label: &'static str,
    pub has_api_key: bool,
    /// Base URL default for providers with a base URL field; empty when
    /// there is no default.
    pub base_url: Option<&'static str>,
    pub model_source: ModelSource,
    pub token_limits: Option<TokenLimitDefaults>,
    /// Shows the collapsible "Model Configuration" section.
    pub custom_model_info: bool,
}

const fn profile(
    provider: ApiProvider,
    label: &'static str,
    has_api_key: bool,
    base_url: Option<&'static str>,
    model_source: ModelSource,
) -> ProviderProfile {
    ProviderProfile {
        provider,
        label,
        has_api_key,
        base_url,
        model_source,
        token_limits: None,
        custom_model_info: false,
    }
}

impl ProviderProfile {
    const fn with_token_limits(mut self, limits: TokenLimitDefaults) -> Self {
        self.token_limits = Some(limits);
        self
    }

    const fn with_custom_model_info(mut self) -> Self {
        self.custom_model_info = true;
        self
    }
}

const fn fixed(models: &'static [StaticModel], default_id: &'static str) -> ModelSource {
    ModelSource::Static { models, default_id }
}

const fn synced(
    family: CatalogFamily,
    default_id: Option<&'static str>,
    searchable: bool,
) -> ModelSource {
    ModelSource::Catalog {
        family,
        default_id,
        searchable,
    }
}

static PROVIDER_PROFILES: [ProviderProfile; 16] = [
    profile(
        ApiProvider::Constructory,
        "Constructory",
        true,
        Some(""),
        synced(CatalogFamily::Constructory, None, false),
    ),
    profile(
        ApiProvider::Anthropic,
        "Anthropic",
        true,
        None,
        fixed(known::ANTHROPIC_MODELS, known::ANTHROPIC_DEFAULT_MODEL),
    ),
    profile(
        ApiProvider::OpenRouter,
        "OpenRouter",
        true,
        None,
        synced(
            CatalogFamily::OpenRouter,
            Some(known::OPENROUTER_DEFAULT_MODEL),
            true,
        ),
    ),
    profile(
        ApiProvider::Requesty,
        "Requesty",
        true,
        None,
        synced(
            CatalogFamily::Requesty,
            Some(known::REQUESTY_DEFAULT_MODEL),
            true,
        ),
    ),
    profile(
        ApiProvider::OpenAi,
        "OpenAI Compatible",
        true,
        Some("https://api.openai.com/v1"),
        ModelSource::FreeText,
    )
    .with_custom_model_info(),
    profile(
        ApiProvider::OpenAiNative,
        "OpenAI",
        true,
        None,
        fixed(known::OPENAI_NATIVE_MODELS, known::OPENAI_NATIVE_DEFAULT_MODEL),
    ),
    profile(
        ApiProvider::Gemini,
        "Google Gemini",
        true,
        None,
        fixed(known::GEMINI_MODELS, known::GEMINI_DEFAULT_MODEL),
    ),
    profile(
        ApiProvider::DeepSeek,
        "DeepSeek",
        true,
        None,
        fixed(known::DEEPSEEK_MODELS, known::DEEPSEEK_DEFAULT_MODEL),
    ),
    profile(
        ApiProvider::Mistral,
        "Mistral",
        true,
        None,
        fixed(known::MISTRAL_MODELS, known::MISTRAL_DEFAULT_MODEL),
    ),
    profile(
        ApiProvider::Xai,
        "xAI",
        true,
        None,
        fixed(known::XAI_MODELS, known::XAI_DEFAULT_MODEL),
    ),
    profile(
        ApiProvider::Together,
        "Together",
        true,
        None,
        ModelSource::FreeText,
    ),
    profile(
        ApiProvider::Fireworks,
        "Fireworks",
        true,
        None,
        ModelSource::FreeText,
    )
    .with_token_limits(TokenLimitDefaults {
        max_completion_tokens: 2000,
        max_tokens: 4000,
    }),
    profile(
        ApiProvider::Nebius,
        "Nebius AI Studio",
        true,
        None,
        fixed(known::NEBIUS_MODELS, known::NEBIUS_DEFAULT_MODEL),
    ),
    profile(
        ApiProvider::LiteLlm,
        "LiteLLM",
        true,
        Some("http://localhost:4000"),
        ModelSource::FreeText,
    ),
    profile(
        ApiProvider::Ollama,
        "Ollama",
        false,
        Some("http://localhost:11434"),
        synced(CatalogFamily::Ollama, None, false),
    ),
    profile(
        ApiProvider::LmStudio,
        "LM Studio",
        false,
        Some("http://localhost:1234"),
        synced(CatalogFamily::LmStudio, None, false),
    ),
];

/// Minimal field set for identifiers the panel has no profile for. Its
/// `provider` is a placeholder and must not be read.
static GENERIC_PROFILE: ProviderProfile = ProviderProfile {
    provider: ApiProvider::Anthropic,
    label: "Other",
    has_api_key: false,
    base_url: None,
    model_source: ModelSource::FreeText,
    token_limits: None,
    custom_model_info: false,
};

/// All provider profiles in display order.
pub fn profiles() -> &'static [ProviderProfile] {
    &PROVIDER_PROFILES
}

/// Profile for a provider. Unknown providers get the generic field set;
/// check [`ProviderProfile::is_generic`] before trusting `provider`.
pub fn profile_for(provider: &ApiProvider) -> &'static ProviderProfile {
    PROVIDER_PROFILES
        .iter()
        .find(|p| &p.provider == provider)
        .unwrap_or(&GENERIC_PROFILE)
}

impl ProviderProfile {
    pub fn is_generic(&self) -> bool {
        std::ptr::eq(self, &GENERIC_PROFILE)
    }

    pub fn api_key_placeholder(&self) -> Option<&'static str> {
        self.has_api_key.then_some(API_KEY_PLACEHOLDER)
    }
}
