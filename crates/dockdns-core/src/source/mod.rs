//! Container endpoint source
//!
//! The ContainerSource is responsible for:
//! - Fetching a container (and, in cluster mode, service) snapshot via RuntimeClient
//! - Handing the snapshot to the pure aggregator
//! - Fanning out change notifications to subscribers
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ RuntimeClient │─── snapshot ───┐
//! └───────────────┘                │
//!                                  ▼
//!                       ┌──────────────────┐
//!                       │ ContainerSource  │──── notify ───▶ subscribers
//!                       └──────────────────┘
//!                                  │
//!                                  ▼
//!                       ┌──────────────────┐
//!                       │ resolve_endpoints│ (pure)
//!                       └──────────────────┘
//!                                  │
//!                                  ▼
//!                            Vec<Endpoint>
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Cluster mode: list services (failure disables cluster grouping for this cycle)
//! 2. List containers (failure fails the cycle)
//! 3. Resolve endpoints from the owned snapshot

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::aggregator::resolve_endpoints;
use crate::config::SourceConfig;
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::traits::{RuntimeClient, ServiceMap, index_services};

/// Change notifications delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEvent {
    /// Containers were started, stopped or relabelled
    ContainersChanged,

    /// Cluster services were created, updated or removed
    ServicesChanged,
}

/// Endpoint source backed by a container runtime
///
/// Each call to [`ContainerSource::endpoints()`] works on its own snapshot;
/// a failed fetch never affects a resolution already in flight.
pub struct ContainerSource {
    /// Runtime client for listing containers and services
    client: Arc<dyn RuntimeClient>,

    /// Whether cluster services are listed and used for grouping
    cluster_mode: bool,

    /// Notification fan-out
    event_tx: broadcast::Sender<SourceEvent>,
}

impl ContainerSource {
    /// Create a new container source
    ///
    /// # Parameters
    ///
    /// - `client`: Runtime client implementation
    /// - `config`: Source configuration
    pub fn new(client: Arc<dyn RuntimeClient>, config: SourceConfig) -> Result<Self> {
        config.validate()?;

        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);

        Ok(Self {
            client,
            cluster_mode: config.cluster_mode,
            event_tx,
        })
    }

    /// Whether this source groups by cluster service
    pub fn cluster_mode(&self) -> bool {
        self.cluster_mode
    }

    /// Fetch a snapshot and resolve it into endpoint records
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Endpoint>)`: Records for the current runtime state
    /// - `Err(Error)`: If the container listing failed
    pub async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let services = if self.cluster_mode {
            self.fetch_services().await
        } else {
            None
        };

        let containers = self.client.list_containers().await.map_err(|e| {
            Error::runtime(format!(
                "{}: failed to list containers: {}",
                self.client.client_name(),
                e
            ))
        })?;

        let endpoints = resolve_endpoints(&containers, services.as_ref());
        debug!(
            "Resolved {} endpoints from {} containers",
            endpoints.len(),
            containers.len()
        );

        Ok(endpoints)
    }

    /// List cluster services, degrading to `None` on failure
    async fn fetch_services(&self) -> Option<ServiceMap> {
        match self.client.list_services().await {
            Ok(services) => Some(index_services(services)),
            Err(e) => {
                warn!(
                    "{}: failed to list services, cluster grouping disabled for this cycle: {}",
                    self.client.client_name(),
                    e
                );
                None
            }
        }
    }

    /// Subscribe to change notifications
    ///
    /// The stream yields every notification sent after subscription.
    /// Notifications lost to lag are skipped.
    pub fn subscribe(&self) -> Pin<Box<dyn Stream<Item = SourceEvent> + Send + 'static>> {
        let stream = BroadcastStream::new(self.event_tx.subscribe()).filter_map(|event| match event {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Change subscriber lagging: {}", e);
                None
            }
        });

        Box::pin(stream)
    }

    /// Notify all current subscribers of a change
    ///
    /// Called by the runtime event watcher (an external collaborator) when
    /// containers or services change; subscribers typically trigger a fresh
    /// [`ContainerSource::endpoints()`] cycle in response.
    ///
    /// # Returns
    ///
    /// The number of subscribers the notification reached (0 if none).
    pub fn notify(&self, event: SourceEvent) -> usize {
        match self.event_tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("No subscribers for {:?}", event);
                0
            }
        }
    }
}
