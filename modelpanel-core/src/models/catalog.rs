//! Model catalogs pushed by the host, one per provider family.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::info::ModelInfo;
use crate::api::ApiProvider;

/// Provider families whose model lists are synchronized from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFamily {
    Constructory,
    Requesty,
    OpenRouter,
    Ollama,
    LmStudio,
}

impl CatalogFamily {
    pub fn all() -> &'static [CatalogFamily] {
        &[
            Self::Constructory,
            Self::Requesty,
            Self::OpenRouter,
            Self::Ollama,
            Self::LmStudio,
        ]
    }

    /// The provider whose model list this family carries.
    pub fn provider(self) -> ApiProvider {
        match self {
            Self::Constructory => ApiProvider::Constructory,
            Self::Requesty => ApiProvider::Requesty,
            Self::OpenRouter => ApiProvider::OpenRouter,
            Self::Ollama => ApiProvider::Ollama,
            Self::LmStudio => ApiProvider::LmStudio,
        }
    }

    /// Family for a provider, if its models come from the host.
    pub fn for_provider(provider: &ApiProvider) -> Option<Self> {
        match provider {
            ApiProvider::Constructory => Some(Self::Constructory),
            ApiProvider::Requesty => Some(Self::Requesty),
            ApiProvider::OpenRouter => Some(Self::OpenRouter),
            ApiProvider::Ollama => Some(Self::Ollama),
            ApiProvider::LmStudio => Some(Self::LmStudio),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constructory => "constructory",
            Self::Requesty => "requesty",
            Self::OpenRouter => "openrouter",
            Self::Ollama => "ollama",
            Self::LmStudio => "lmstudio",
        };
        f.write_str(name)
    }
}

/// Selectable models of one family, keyed by model id.
///
/// Ordered so dropdowns render deterministically. A catalog is always
/// replaced as a whole; there is no per-entry merge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog {
    models: BTreeMap<String, ModelInfo>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from model names only (ollama, lmstudio).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty())
            .map(|name| (name.clone(), ModelInfo::with_id(name)))
            .collect();
        Self { models }
    }

    pub fn get(&self, id: &str) -> Option<&ModelInfo> {
        self.models.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    /// Model ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelInfo)> {
        self.models.iter().map(|(id, info)| (id.as_str(), info))
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}

impl FromIterator<(String, ModelInfo)> for ModelCatalog {
    fn from_iter<T: IntoIterator<Item = (String, ModelInfo)>>(iter: T) -> Self {
        Self {
            models: iter.into_iter().collect(),
        }
    }
}

impl From<HashMap<String, ModelInfo>> for ModelCatalog {
    fn from(map: HashMap<String, ModelInfo>) -> Self {
        map.into_iter().collect()
    }
}

/// Read access to the current catalog of each family.
pub trait CatalogLookup {
    fn catalog(&self, family: CatalogFamily) -> Option<&ModelCatalog>;
}

/// Lookup with no catalogs loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCatalogs;

impl CatalogLookup for NoCatalogs {
    fn catalog(&self, _family: CatalogFamily) -> Option<&ModelCatalog> {
        None
    }
}

impl CatalogLookup for HashMap<CatalogFamily, ModelCatalog> {
    fn catalog(&self, family: CatalogFamily) -> Option<&ModelCatalog> {
        self.get(&family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_provider_mapping() {
        for family in CatalogFamily::all() {
            assert_eq!(CatalogFamily::for_provider(&family.provider()), Some(*family));
        }
        assert_eq!(CatalogFamily::for_provider(&ApiProvider::Anthropic), None);
    }

    #[test]
    fn test_catalog_deserializes_from_mapping() {
        let catalog: ModelCatalog = serde_json::from_str(
            r#"{
                "model-2": {"id": "model-2", "description": "Model 2"},
                "model-1": {"id": "model-1", "description": "Model 1"}
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["model-1", "model-2"]);
        assert_eq!(
            catalog.get("model-2").and_then(|m| m.description.as_deref()),
            Some("Model 2")
        );
    }

    #[test]
    fn test_from_names_skips_empty() {
        let catalog = ModelCatalog::from_names(["llama3", "", "mistral"]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("llama3"));
        assert_eq!(
            catalog.get("mistral").and_then(|m| m.id.as_deref()),
            Some("mistral")
        );
    }

    #[test]
    fn test_family_serde_lowercase() {
        let json = serde_json::to_string(&CatalogFamily::OpenRouter).unwrap();
        assert_eq!(json, "\"openrouter\"");
        let parsed: CatalogFamily = serde_json::from_str("\"lmstudio\"").unwrap();
        assert_eq!(parsed, CatalogFamily::LmStudio);
    }
}
