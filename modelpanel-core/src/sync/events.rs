//! Messages exchanged between the panel and the host.
//!
//! The host pushes [`HostMessage`] frames (JSON, `type`-tagged). Each frame
//! maps to exactly one [`PanelEvent`], which the panel store applies as a
//! single state transition. The panel asks the host for work with
//! [`PanelRequest`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use super::state::RequestId;
use crate::api::ApiConfiguration;
use crate::models::{CatalogFamily, ModelCatalog, ModelInfo};

/// Errors decoding a host frame.
#[derive(Debug, Error)]
pub enum HostMessageError {
    #[error("Malformed host message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Inbound frame from the host process.
///
/// Missing or `null` model mappings decode as empty catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostMessage {
    ConstructorModels {
        #[serde(default, deserialize_with = "nullable")]
        constructor_models: HashMap<String, ModelInfo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    RequestyModels {
        #[serde(default, deserialize_with = "nullable")]
        requesty_models: HashMap<String, ModelInfo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    OpenRouterModels {
        #[serde(default, deserialize_with = "nullable")]
        open_router_models: HashMap<String, ModelInfo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    OllamaModels {
        #[serde(default, deserialize_with = "nullable")]
        ollama_models: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    LmStudioModels {
        #[serde(default, deserialize_with = "nullable")]
        lm_studio_models: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    CatalogError {
        family: CatalogFamily,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<RequestId>,
    },
    LicensedFeatures {
        #[serde(default, deserialize_with = "nullable")]
        licensed_features: Vec<String>,
    },
    LicensedFeaturesLoading,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HostMessage {
    /// Decode one raw transport frame.
    pub fn from_json(frame: &str) -> Result<Self, HostMessageError> {
        Ok(serde_json::from_str(frame)?)
    }

    /// Build the success frame for a family.
    pub fn catalog(family: CatalogFamily, catalog: ModelCatalog, request_id: Option<RequestId>) -> Self {
        let mapping = || -> HashMap<String, ModelInfo> {
            catalog
                .iter()
                .map(|(id, info)| (id.to_string(), info.clone()))
                .collect()
        };
        let names = || catalog.ids().map(str::to_string).collect::<Vec<_>>();
        match family {
            CatalogFamily::Constructory => Self::ConstructorModels {
                constructor_models: mapping(),
                request_id,
            },
            CatalogFamily::Requesty => Self::RequestyModels {
                requesty_models: mapping(),
                request_id,
            },
            CatalogFamily::OpenRouter => Self::OpenRouterModels {
                open_router_models: mapping(),
                request_id,
            },
            CatalogFamily::Ollama => Self::OllamaModels {
                ollama_models: names(),
                request_id,
            },
            CatalogFamily::LmStudio => Self::LmStudioModels {
                lm_studio_models: names(),
                request_id,
            },
        }
    }

    /// The typed event this frame represents.
    pub fn into_event(self) -> PanelEvent {
        match self {
            Self::ConstructorModels {
                constructor_models,
                request_id,
            } => PanelEvent::CatalogLoaded {
                family: CatalogFamily::Constructory,
                catalog: constructor_models.into(),
                request_id,
            },
            Self::RequestyModels {
                requesty_models,
                request_id,
            } => PanelEvent::CatalogLoaded {
                family: CatalogFamily::Requesty,
                catalog: requesty_models.into(),
                request_id,
            },
            Self::OpenRouterModels {
                open_router_models,
                request_id,
            } => PanelEvent::CatalogLoaded {
                family: CatalogFamily::OpenRouter,
                catalog: open_router_models.into(),
                request_id,
            },
            Self::OllamaModels {
                ollama_models,
                request_id,
            } => PanelEvent::CatalogLoaded {
                family: CatalogFamily::Ollama,
                catalog: ModelCatalog::from_names(ollama_models),
                request_id,
            },
            Self::LmStudioModels {
                lm_studio_models,
                request_id,
            } => PanelEvent::CatalogLoaded {
                family: CatalogFamily::LmStudio,
                catalog: ModelCatalog::from_names(lm_studio_models),
                request_id,
            },
            Self::CatalogError {
                family,
                error,
                request_id,
            } => PanelEvent::CatalogFailed {
                family,
                message: error,
                request_id,
            },
            Self::LicensedFeatures { licensed_features } => {
                PanelEvent::LicenseUpdated(licensed_features)
            }
            Self::LicensedFeaturesLoading => PanelEvent::LicenseLoading,
        }
    }
}

/// Typed inbound event, one variant per state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    CatalogLoaded {
        family: CatalogFamily,
        catalog: ModelCatalog,
        request_id: Option<RequestId>,
    },
    CatalogFailed {
        family: CatalogFamily,
        message: String,
        request_id: Option<RequestId>,
    },
    LicenseUpdated(Vec<String>),
    LicenseLoading,
}

/// Outbound request from the panel to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelRequest {
    /// Fetch the catalog of `family` using the panel's current configuration.
    RefreshCatalog {
        family: CatalogFamily,
        request_id: RequestId,
        configuration: Box<ApiConfiguration>,
    },
    /// Fetch the licensed feature list.
    RefreshLicense { configuration: Box<ApiConfiguration> },
}

/// Sender for host messages.
pub type HostSender = mpsc::UnboundedSender<HostMessage>;

/// Receiver for host messages.
pub type HostReceiver = mpsc::UnboundedReceiver<HostMessage>;

/// Sender for panel requests.
pub type RequestSender = mpsc::UnboundedSender<PanelRequest>;

/// Receiver for panel requests.
pub type RequestReceiver = mpsc::UnboundedReceiver<PanelRequest>;

/// Create a channel for host-to-panel messages.
pub fn host_channel() -> (HostSender, HostReceiver) {
    mpsc::unbounded_channel()
}

/// Create a channel for panel-to-host requests.
pub fn request_channel() -> (RequestSender, RequestReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_constructor_models_frame() {
        let message = HostMessage::from_json(
            r#"{
                "type": "constructorModels",
                "constructorModels": {
                    "model-1": {"id": "model-1", "description": "Model 1"},
                    "model-2": {"id": "model-2", "description": "Model 2"}
                }
            }"#,
        )
        .unwrap();

        match message.into_event() {
            PanelEvent::CatalogLoaded {
                family,
                catalog,
                request_id,
            } => {
                assert_eq!(family, CatalogFamily::Constructory);
                assert_eq!(catalog.len(), 2);
                assert!(request_id.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_missing_or_null_mapping_is_empty_catalog() {
        for frame in [
            r#"{"type": "constructorModels"}"#,
            r#"{"type": "constructorModels", "constructorModels": null}"#,
            r#"{"type": "constructorModels", "constructorModels": {}}"#,
        ] {
            let event = HostMessage::from_json(frame).unwrap().into_event();
            assert_eq!(
                event,
                PanelEvent::CatalogLoaded {
                    family: CatalogFamily::Constructory,
                    catalog: ModelCatalog::new(),
                    request_id: None,
                }
            );
        }
    }

    #[test]
    fn test_parses_name_lists_and_request_ids() {
        let event = HostMessage::from_json(
            r#"{"type": "ollamaModels", "ollamaModels": ["llama3", "mistral"], "requestId": 7}"#,
        )
        .unwrap()
        .into_event();

        match event {
            PanelEvent::CatalogLoaded {
                family,
                catalog,
                request_id,
            } => {
                assert_eq!(family, CatalogFamily::Ollama);
                assert!(catalog.contains("llama3"));
                assert_eq!(request_id, Some(RequestId(7)));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parses_catalog_error() {
        let event = HostMessage::from_json(
            r#"{"type": "catalogError", "family": "constructory", "error": "API Error: Network timeout"}"#,
        )
        .unwrap()
        .into_event();

        assert_eq!(
            event,
            PanelEvent::CatalogFailed {
                family: CatalogFamily::Constructory,
                message: "API Error: Network timeout".to_string(),
                request_id: None,
            }
        );
    }

    #[test]
    fn test_parses_license_frames() {
        let event = HostMessage::from_json(
            r#"{"type": "licensedFeatures", "licensedFeatures": ["Research.Cline"]}"#,
        )
        .unwrap()
        .into_event();
        assert_eq!(
            event,
            PanelEvent::LicenseUpdated(vec!["Research.Cline".to_string()])
        );

        let event = HostMessage::from_json(r#"{"type": "licensedFeaturesLoading"}"#)
            .unwrap()
            .into_event();
        assert_eq!(event, PanelEvent::LicenseLoading);
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = HostMessage::from_json(r#"{"type": "somethingElse"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Malformed host message"));
    }

    #[test]
    fn test_catalog_frame_matches_wire_shape() {
        let catalog = ModelCatalog::from_names(["llama3"]);
        let message = HostMessage::catalog(CatalogFamily::Ollama, catalog, Some(RequestId(2)));
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "ollamaModels", "ollamaModels": ["llama3"], "requestId": 2})
        );
    }
}
