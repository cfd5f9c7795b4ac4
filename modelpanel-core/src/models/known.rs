//! Built-in model tables for providers with a fixed model list.

use super::info::ModelInfo;

/// A compiled-in model entry.
#[derive(Debug, Clone, Copy)]
pub struct StaticModel {
    pub id: &'static str,
    pub max_tokens: u32,
    pub context_window: u32,
    pub supports_images: bool,
    pub supports_prompt_cache: bool,
    pub input_price: f64,
    pub output_price: f64,
}

impl StaticModel {
    pub fn to_info(&self) -> ModelInfo {
        ModelInfo {
            id: Some(self.id.to_string()),
            description: None,
            max_tokens: Some(self.max_tokens),
            context_window: Some(self.context_window),
            supports_images: Some(self.supports_images),
            supports_prompt_cache: self.supports_prompt_cache,
            input_price: Some(self.input_price),
            output_price: Some(self.output_price),
        }
    }
}

/// Find a model by id in a static table.
pub fn find(models: &'static [StaticModel], id: &str) -> Option<&'static StaticModel> {
    models.iter().find(|m| m.id == id)
}

const fn model(
    id: &'static str,
    max_tokens: u32,
    context_window: u32,
    supports_images: bool,
    supports_prompt_cache: bool,
    input_price: f64,
    output_price: f64,
) -> StaticModel {
    StaticModel {
        id,
        max_tokens,
        context_window,
        supports_images,
        supports_prompt_cache,
        input_price,
        output_price,
    }
}

pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";

pub const ANTHROPIC_MODELS: &[StaticModel] = &[
    model("claude-3-7-sonnet-20250219", 8192, 200_000, true, true, 3.0, 15.0),
    model("claude-3-5-sonnet-20241022", 8192, 200_000, true, true, 3.0, 15.0),
    model("claude-3-5-haiku-20241022", 8192, 200_000, false, true, 0.8, 4.0),
    model("claude-3-opus-20240229", 4096, 200_000, true, true, 15.0, 75.0),
];

pub const OPENAI_NATIVE_DEFAULT_MODEL: &str = "gpt-4o";

pub const OPENAI_NATIVE_MODELS: &[StaticModel] = &[
    model("gpt-4o", 4096, 128_000, true, true, 2.5, 10.0),
    model("gpt-4o-mini", 16_384, 128_000, true, true, 0.15, 0.6),
    model("o3-mini", 100_000, 200_000, false, true, 1.1, 4.4),
];

pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash-001";

pub const GEMINI_MODELS: &[StaticModel] = &[
    model("gemini-2.0-flash-001", 8192, 1_048_576, true, false, 0.0, 0.0),
    model("gemini-1.5-pro-002", 8192, 2_097_152, true, false, 0.0, 0.0),
];

pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

pub const DEEPSEEK_MODELS: &[StaticModel] = &[
    model("deepseek-chat", 8000, 64_000, false, true, 0.27, 1.1),
    model("deepseek-reasoner", 8000, 64_000, false, true, 0.55, 2.19),
];

pub const MISTRAL_DEFAULT_MODEL: &str = "codestral-latest";

pub const MISTRAL_MODELS: &[StaticModel] = &[
    model("codestral-latest", 256_000, 256_000, false, false, 0.3, 0.9),
    model("mistral-large-2411", 131_000, 131_000, false, false, 2.0, 6.0),
];

pub const XAI_DEFAULT_MODEL: &str = "grok-3-beta";

pub const XAI_MODELS: &[StaticModel] = &[
    model("grok-3-beta", 8192, 131_072, false, false, 3.0, 15.0),
    model("grok-3-mini-beta", 8192, 131_072, false, false, 0.3, 0.5),
];

pub const NEBIUS_DEFAULT_MODEL: &str = "Qwen/Qwen2.5-32B-Instruct-fast";

pub const NEBIUS_MODELS: &[StaticModel] = &[
    model("Qwen/Qwen2.5-32B-Instruct-fast", 8192, 32_768, false, false, 0.13, 0.4),
    model("Qwen/Qwen2.5-Coder-32B-Instruct-fast", 128_000, 128_000, false, false, 0.1, 0.3),
    model("deepseek-ai/DeepSeek-V3", 32_000, 96_000, false, false, 0.5, 1.5),
    model("meta-llama/Llama-3.3-70B-Instruct-fast", 32_000, 96_000, false, false, 0.25, 0.75),
];

pub const OPENROUTER_DEFAULT_MODEL: &str = "anthropic/claude-3.7-sonnet";

pub const REQUESTY_DEFAULT_MODEL: &str = "anthropic/claude-3-7-sonnet-latest";

/// Fallback info for the router defaults before any catalog has arrived.
pub fn router_default_info() -> ModelInfo {
    ModelInfo {
        description: Some("Claude 3.7 Sonnet".to_string()),
        ..ANTHROPIC_MODELS[0].to_info()
    }
}
