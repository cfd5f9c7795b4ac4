//! Task that answers panel requests with host messages.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use super::source::CatalogSource;
use crate::sync::{HostMessage, HostSender, PanelRequest, RequestReceiver};

/// Background worker standing in for the host process.
///
/// Each request is served on its own task, so responses may arrive out of
/// order; the panel's request ids sort that out. Dropping the bridge stops it
/// along with every fetch still in flight.
pub struct HostBridge {
    task: JoinHandle<()>,
}

impl HostBridge {
    pub fn spawn<S>(handle: &Handle, source: S, requests: RequestReceiver, host: HostSender) -> Self
    where
        S: CatalogSource + 'static,
    {
        let source: Arc<dyn CatalogSource> = Arc::new(source);
        let task = handle.spawn(run(source, requests, host));
        Self { task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for HostBridge {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(source: Arc<dyn CatalogSource>, mut requests: RequestReceiver, host: HostSender) {
    info!("Host bridge started");
    // Owned here so aborting the loop cancels pending fetches too
    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            request = requests.recv() => {
                let Some(request) = request else {
                    break;
                };
                let source = Arc::clone(&source);
                let host = host.clone();
                in_flight.spawn(async move {
                    for message in serve(source.as_ref(), request).await {
                        if host.send(message).is_err() {
                            debug!("Panel closed, dropping host message");
                            return;
                        }
                    }
                });
            }
            Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = result {
                    warn!(error = %e, "Host request task failed");
                }
            }
        }
    }
    info!(pending = in_flight.len(), "Host bridge stopped");
}

/// Messages produced for one request, in delivery order.
async fn serve(source: &dyn CatalogSource, request: PanelRequest) -> Vec<HostMessage> {
    match request {
        PanelRequest::RefreshCatalog {
            family,
            request_id,
            configuration,
        } => match source.fetch_catalog(family, &configuration).await {
            Ok(catalog) => {
                debug!(%family, request = %request_id, models = catalog.len(), "Catalog fetched");
                vec![HostMessage::catalog(family, catalog, Some(request_id))]
            }
            Err(e) => {
                warn!(%family, request = %request_id, error = %e, "Catalog fetch failed");
                vec![HostMessage::CatalogError {
                    family,
                    error: e.to_string(),
                    request_id: Some(request_id),
                }]
            }
        },
        PanelRequest::RefreshLicense { configuration } => {
            let licensed_features = match source.fetch_licenses(&configuration).await {
                Ok(features) => features,
                Err(e) => {
                    warn!(error = %e, "License fetch failed, treating as unlicensed");
                    Vec::new()
                }
            };
            vec![HostMessage::LicensedFeatures { licensed_features }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfiguration;
    use crate::host::CatalogError;
    use crate::models::{CatalogFamily, ModelCatalog};
    use crate::sync::{
        host_channel, request_channel, ApplyOutcome, CatalogStatus, PanelEvent, PanelStore,
        RequestId,
    };
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers from fixed data; Ollama requests are slowed down.
    struct FakeSource {
        ollama_delay: Duration,
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch_catalog(
            &self,
            family: CatalogFamily,
            configuration: &ApiConfiguration,
        ) -> Result<ModelCatalog, CatalogError> {
            match family {
                CatalogFamily::Constructory => Err(CatalogError::Api {
                    status: 403,
                    message: "Project owner don't have licence Research.Cline".to_string(),
                }),
                CatalogFamily::Ollama => {
                    tokio::time::sleep(self.ollama_delay).await;
                    let name = configuration
                        .ollama_model_id
                        .clone()
                        .unwrap_or_else(|| "llama3".to_string());
                    Ok(ModelCatalog::from_names([name]))
                }
                _ => Ok(ModelCatalog::from_names(["model-1", "model-2"])),
            }
        }

        async fn fetch_licenses(
            &self,
            _configuration: &ApiConfiguration,
        ) -> Result<Vec<String>, CatalogError> {
            Ok(vec!["Research.Cline".to_string()])
        }
    }

    fn fake() -> FakeSource {
        FakeSource {
            ollama_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_serve_catalog_success_is_tagged() {
        let messages = serve(
            &fake(),
            PanelRequest::RefreshCatalog {
                family: CatalogFamily::Requesty,
                request_id: RequestId(3),
                configuration: Box::default(),
            },
        )
        .await;

        assert_eq!(messages.len(), 1);
        match messages[0].clone().into_event() {
            PanelEvent::CatalogLoaded {
                family,
                catalog,
                request_id,
            } => {
                assert_eq!(family, CatalogFamily::Requesty);
                assert_eq!(catalog.len(), 2);
                assert_eq!(request_id, Some(RequestId(3)));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_serve_catalog_failure_keeps_server_message() {
        let messages = serve(
            &fake(),
            PanelRequest::RefreshCatalog {
                family: CatalogFamily::Constructory,
                request_id: RequestId(1),
                configuration: Box::default(),
            },
        )
        .await;

        assert_eq!(
            messages,
            vec![HostMessage::CatalogError {
                family: CatalogFamily::Constructory,
                error: "Project owner don't have licence Research.Cline".to_string(),
                request_id: Some(RequestId(1)),
            }]
        );
    }

    #[tokio::test]
    async fn test_round_trip_through_bridge_updates_store() {
        let (request_tx, request_rx) = request_channel();
        let (host_tx, mut host_rx) = host_channel();
        let _bridge = HostBridge::spawn(&Handle::current(), fake(), request_rx, host_tx);

        let mut store = PanelStore::open(None);
        request_tx.send(store.license_request()).unwrap();
        request_tx
            .send(store.refresh_request(CatalogFamily::Constructory))
            .unwrap();

        for _ in 0..2 {
            let message = host_rx.recv().await.unwrap();
            assert_eq!(store.handle(message.into_event()), ApplyOutcome::Applied);
        }

        assert!(store.license().has_constructory_license());
        assert_eq!(
            store.status(CatalogFamily::Constructory),
            CatalogStatus::LicenseRequired
        );
    }

    #[tokio::test]
    async fn test_slow_stale_response_is_dropped() {
        let (request_tx, request_rx) = request_channel();
        let (host_tx, mut host_rx) = host_channel();
        let source = FakeSource {
            ollama_delay: Duration::from_millis(50),
        };
        let _bridge = HostBridge::spawn(&Handle::current(), source, request_rx, host_tx);

        let mut store = PanelStore::open(Some(ApiConfiguration {
            ollama_model_id: Some("first".to_string()),
            ..Default::default()
        }));
        let first = store.refresh_request(CatalogFamily::Ollama);
        store.configuration_mut().ollama_model_id = Some("second".to_string());
        let second = store.refresh_request(CatalogFamily::Ollama);
        request_tx.send(first).unwrap();
        request_tx.send(second).unwrap();

        let mut outcomes = Vec::new();
        for _ in 0..2 {
            let message = host_rx.recv().await.unwrap();
            outcomes.push(store.handle(message.into_event()));
        }

        // Either order of arrival must leave the newer catalog in place.
        assert!(outcomes.contains(&ApplyOutcome::Applied));
        assert!(store.catalog_of(CatalogFamily::Ollama).contains("second"));
        assert!(!store.sync(CatalogFamily::Ollama).is_loading());
    }

    #[tokio::test]
    async fn test_dropping_bridge_cancels_in_flight_fetches() {
        let (request_tx, request_rx) = request_channel();
        let (host_tx, mut host_rx) = host_channel();
        let source = FakeSource {
            ollama_delay: Duration::from_secs(30),
        };
        let bridge = HostBridge::spawn(&Handle::current(), source, request_rx, host_tx);

        let mut store = PanelStore::open(None);
        request_tx
            .send(store.refresh_request(CatalogFamily::Ollama))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(bridge);

        // Every sender goes away once the pending fetch is cancelled
        let closed = tokio::time::timeout(Duration::from_secs(2), host_rx.recv())
            .await
            .expect("pending fetch was not cancelled");
        assert!(closed.is_none());
    }

    #[tokio::test]
    async fn test_bridge_stops_when_requests_close() {
        let (request_tx, request_rx) = request_channel();
        let (host_tx, _host_rx) = host_channel();
        let bridge = HostBridge::spawn(&Handle::current(), fake(), request_rx, host_tx);

        drop(request_tx);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(bridge.is_finished());
    }
}
