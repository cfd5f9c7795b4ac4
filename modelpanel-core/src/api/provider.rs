//! Provider identifiers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier for one upstream model-serving integration.
///
/// Serialized as the lowercase identifier string used in stored
/// configuration (`"anthropic"`, `"openai-native"`, ...). Identifiers the
/// panel does not know survive a round-trip as [`ApiProvider::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ApiProvider {
    /// Anthropic API (baseline provider).
    #[default]
    Anthropic,
    OpenRouter,
    /// OpenAI-compatible endpoint with a custom base URL.
    OpenAi,
    /// OpenAI's own API.
    OpenAiNative,
    Ollama,
    LmStudio,
    Gemini,
    DeepSeek,
    Mistral,
    Xai,
    Requesty,
    Together,
    Fireworks,
    Nebius,
    LiteLlm,
    /// License-gated provider.
    Constructory,
    /// Any identifier not listed above.
    Other(String),
}

impl ApiProvider {
    /// Provider selected when no license is held and nothing is configured.
    pub const BASELINE: ApiProvider = ApiProvider::Anthropic;

    /// Provider selected when the license is held and nothing is configured.
    pub const PRIVILEGED: ApiProvider = ApiProvider::Constructory;

    /// All known providers, in display order.
    pub fn all() -> &'static [ApiProvider] {
        &[
            Self::Constructory,
            Self::Anthropic,
            Self::OpenRouter,
            Self::Requesty,
            Self::OpenAi,
            Self::OpenAiNative,
            Self::Gemini,
            Self::DeepSeek,
            Self::Mistral,
            Self::Xai,
            Self::Together,
            Self::Fireworks,
            Self::Nebius,
            Self::LiteLlm,
            Self::Ollama,
            Self::LmStudio,
        ]
    }

    /// Wire identifier for this provider.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenRouter => "openrouter",
            Self::OpenAi => "openai",
            Self::OpenAiNative => "openai-native",
            Self::Ollama => "ollama",
            Self::LmStudio => "lmstudio",
            Self::Gemini => "gemini",
            Self::DeepSeek => "deepseek",
            Self::Mistral => "mistral",
            Self::Xai => "xai",
            Self::Requesty => "requesty",
            Self::Together => "together",
            Self::Fireworks => "fireworks",
            Self::Nebius => "nebius",
            Self::LiteLlm => "litellm",
            Self::Constructory => "constructory",
            Self::Other(id) => id,
        }
    }

    /// Parse a wire identifier. Never fails: unknown identifiers become
    /// [`ApiProvider::Other`].
    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "anthropic" => Self::Anthropic,
            "openrouter" => Self::OpenRouter,
            "openai" => Self::OpenAi,
            "openai-native" => Self::OpenAiNative,
            "ollama" => Self::Ollama,
            "lmstudio" => Self::LmStudio,
            "gemini" => Self::Gemini,
            "deepseek" => Self::DeepSeek,
            "mistral" => Self::Mistral,
            "xai" => Self::Xai,
            "requesty" => Self::Requesty,
            "together" => Self::Together,
            "fireworks" => Self::Fireworks,
            "nebius" => Self::Nebius,
            "litellm" => Self::LiteLlm,
            "constructory" => Self::Constructory,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether availability of this provider is gated by a license.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::Constructory)
    }

    /// An explicit selection must carry a non-empty identifier.
    pub fn is_set(&self) -> bool {
        !self.as_str().trim().is_empty()
    }
}

impl fmt::Display for ApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ApiProvider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiProvider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_lossy(&s))
    }
}
