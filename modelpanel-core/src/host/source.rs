//! Where catalogs and licenses come from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::api::{profile_for, ApiConfiguration};
use crate::models::{CatalogFamily, ModelCatalog, ModelInfo};

const REQUESTY_MODELS_URL: &str = "https://router.requesty.ai/v1/models";
const OPENROUTER_MODELS_URL: &str = "https://openrouter.ai/api/v1/models";

/// Failure fetching a catalog or the license list.
///
/// `Display` of [`CatalogError::Api`] is the server's own message so that
/// license denials reach the panel unchanged.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("API Error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0} base URL is not configured")]
    MissingBaseUrl(&'static str),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Source of model catalogs and licensed features.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(
        &self,
        family: CatalogFamily,
        configuration: &ApiConfiguration,
    ) -> Result<ModelCatalog, CatalogError>;

    async fn fetch_licenses(
        &self,
        configuration: &ApiConfiguration,
    ) -> Result<Vec<String>, CatalogError>;
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Fetches catalogs directly from each provider's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        bearer: Option<&str>,
    ) -> Result<T, CatalogError> {
        debug!(%url, "Fetching");
        let mut request = self.client.get(url).header("Content-Type", "application/json");
        if let Some(token) = bearer.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(
        &self,
        family: CatalogFamily,
        configuration: &ApiConfiguration,
    ) -> Result<ModelCatalog, CatalogError> {
        let url = catalog_url(family, configuration)?;
        let catalog = match family {
            CatalogFamily::Constructory => {
                let body: ListResponse<ConstructoryModel> = self
                    .get_json(url, configuration.constructory_api_key.as_deref())
                    .await?;
                body.data.into_iter().map(ConstructoryModel::into_entry).collect()
            }
            CatalogFamily::Requesty => {
                let body: ListResponse<RequestyModel> = self
                    .get_json(url, configuration.requesty_api_key.as_deref())
                    .await?;
                body.data.into_iter().map(RequestyModel::into_entry).collect()
            }
            CatalogFamily::OpenRouter => {
                let body: ListResponse<OpenRouterModel> = self
                    .get_json(url, configuration.open_router_api_key.as_deref())
                    .await?;
                body.data.into_iter().map(OpenRouterModel::into_entry).collect()
            }
            CatalogFamily::Ollama => {
                let body: OllamaTags = self.get_json(url, None).await?;
                ModelCatalog::from_names(body.models.into_iter().map(|m| m.name))
            }
            CatalogFamily::LmStudio => {
                let body: ListResponse<NamedModel> = self.get_json(url, None).await?;
                ModelCatalog::from_names(body.data.into_iter().map(|m| m.id))
            }
        };
        Ok(catalog)
    }

    async fn fetch_licenses(
        &self,
        configuration: &ApiConfiguration,
    ) -> Result<Vec<String>, CatalogError> {
        let base = constructory_base(configuration)?;
        let url = join(&base, "licenses")?;
        let body: LicenseResponse = self
            .get_json(url, configuration.constructory_api_key.as_deref())
            .await?;
        Ok(body.into_features())
    }
}

// =============================================================================
// Endpoints
// =============================================================================

fn catalog_url(family: CatalogFamily, config: &ApiConfiguration) -> Result<Url, CatalogError> {
    match family {
        CatalogFamily::Requesty => parse_base(REQUESTY_MODELS_URL),
        CatalogFamily::OpenRouter => parse_base(OPENROUTER_MODELS_URL),
        CatalogFamily::Ollama => {
            let base = local_base(family, config.ollama_base_url.as_deref())?;
            join(&base, "api/tags")
        }
        CatalogFamily::LmStudio => {
            let base = local_base(family, config.lm_studio_base_url.as_deref())?;
            join(&base, "v1/models")
        }
        CatalogFamily::Constructory => {
            let base = constructory_base(config)?;
            join(&base, "models")
        }
    }
}

fn local_base(family: CatalogFamily, configured: Option<&str>) -> Result<Url, CatalogError> {
    let profile = profile_for(&family.provider());
    configured
        .filter(|u| !u.trim().is_empty())
        .or(profile.base_url.filter(|u| !u.is_empty()))
        .map(parse_base)
        .unwrap_or(Err(CatalogError::MissingBaseUrl(profile.label)))
}

fn constructory_base(config: &ApiConfiguration) -> Result<Url, CatalogError> {
    match config.constructory_base_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => parse_base(url),
        _ => Err(CatalogError::MissingBaseUrl("Constructory")),
    }
}

/// Parse a base URL, accepting only http(s) with a host.
fn parse_base(raw: &str) -> Result<Url, CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

/// Append `path` to `base`, keeping any path prefix already on the base.
fn join(base: &Url, path: &str) -> Result<Url, CatalogError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path).map_err(|e| CatalogError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Pull a human-readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorField {
        Text(String),
        Object { message: String },
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<ErrorField>,
    }

    let parsed = serde_json::from_str::<ErrorBody>(body).ok().and_then(|b| {
        b.message.or(match b.error {
            Some(ErrorField::Text(text)) => Some(text),
            Some(ErrorField::Object { message }) => Some(message),
            None => None,
        })
    });

    match parsed {
        Some(message) if !message.trim().is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!(
            "API Error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        ),
    }
}

// =============================================================================
// Response Bodies
// =============================================================================

#[derive(Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct NamedModel {
    id: String,
}

#[derive(Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaTag>,
}

#[derive(Deserialize)]
struct OllamaTag {
    name: String,
}

/// Constructory already speaks the panel's `ModelInfo` shape.
#[derive(Deserialize)]
struct ConstructoryModel {
    id: String,
    #[serde(flatten)]
    info: ModelInfo,
}

impl ConstructoryModel {
    fn into_entry(self) -> (String, ModelInfo) {
        let info = ModelInfo {
            id: Some(self.id.clone()),
            ..self.info
        };
        (self.id, info)
    }
}

#[derive(Deserialize)]
struct RequestyModel {
    id: String,
    description: Option<String>,
    context_window: Option<u32>,
    max_output_tokens: Option<u32>,
    #[serde(default)]
    supports_images: bool,
    #[serde(default)]
    supports_caching: bool,
    input_price: Option<f64>,
    output_price: Option<f64>,
}

impl RequestyModel {
    fn into_entry(self) -> (String, ModelInfo) {
        let info = ModelInfo {
            id: Some(self.id.clone()),
            description: self.description,
            max_tokens: self.max_output_tokens,
            context_window: self.context_window,
            supports_images: Some(self.supports_images),
            supports_prompt_cache: self.supports_caching,
            input_price: self.input_price.map(per_million),
            output_price: self.output_price.map(per_million),
        };
        (self.id, info)
    }
}

#[derive(Deserialize)]
struct OpenRouterModel {
    id: String,
    description: Option<String>,
    context_length: Option<u32>,
    top_provider: Option<OpenRouterTopProvider>,
    architecture: Option<OpenRouterArchitecture>,
    pricing: Option<OpenRouterPricing>,
}

#[derive(Deserialize)]
struct OpenRouterTopProvider {
    max_completion_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct OpenRouterArchitecture {
    modality: Option<String>,
}

/// Prices are per-token decimal strings.
#[derive(Deserialize)]
struct OpenRouterPricing {
    prompt: Option<String>,
    completion: Option<String>,
    input_cache_read: Option<String>,
}

impl OpenRouterModel {
    fn into_entry(self) -> (String, ModelInfo) {
        let price = |raw: Option<&String>| raw.and_then(|p| p.parse::<f64>().ok()).map(per_million);
        let pricing = self.pricing.as_ref();
        let info = ModelInfo {
            id: Some(self.id.clone()),
            description: self.description,
            max_tokens: self.top_provider.and_then(|p| p.max_completion_tokens),
            context_window: self.context_length,
            supports_images: self
                .architecture
                .and_then(|a| a.modality)
                .map(|m| m.contains("image")),
            supports_prompt_cache: pricing.is_some_and(|p| p.input_cache_read.is_some()),
            input_price: price(pricing.and_then(|p| p.prompt.as_ref())),
            output_price: price(pricing.and_then(|p| p.completion.as_ref())),
        };
        (self.id, info)
    }
}

/// Convert a per-token price to the per-million-token price shown in the panel.
fn per_million(per_token: f64) -> f64 {
    per_token * 1_000_000.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LicenseResponse {
    Wrapped { features: Vec<String> },
    Bare(Vec<String>),
}

impl LicenseResponse {
    fn into_features(self) -> Vec<String> {
        match self {
            Self::Wrapped { features } | Self::Bare(features) => features,
        }
    }
}
