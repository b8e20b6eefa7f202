// # Runtime Client Trait
//
// Defines the interface for fetching container and service snapshots from a
// container runtime.
//
// ## Implementations
//
// - Snapshot file: `dockdns_core::runtime::SnapshotFileClient`
// - Future: runtime socket API client
//
// ## Usage
//
// ```rust,ignore
// use dockdns_core::RuntimeClient;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let client = /* RuntimeClient implementation */;
//
//     for container in client.list_containers().await? {
//         println!("{:?}", container.labels);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single network attachment of a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// Address of the container on this network (may be empty)
    #[serde(rename = "IPAddress", default)]
    pub ip_address: String,
    /// Gateway of the network
    #[serde(rename = "Gateway", default)]
    pub gateway: String,
}

impl NetworkAttachment {
    /// Create a new network attachment
    pub fn new(ip_address: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            gateway: gateway.into(),
        }
    }
}

/// Network settings of a container, keyed by network name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(rename = "Networks", default)]
    pub networks: HashMap<String, NetworkAttachment>,
}

/// Point-in-time view of one container as listed by the runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    /// Runtime container id
    #[serde(rename = "Id", default)]
    pub id: String,

    /// Labels attached to the container
    #[serde(rename = "Labels", default)]
    pub labels: HashMap<String, String>,

    /// Network attachments
    #[serde(rename = "NetworkSettings", default)]
    pub network_settings: NetworkSettings,
}

impl ContainerSnapshot {
    /// Create an empty container snapshot
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Attach the container to a network
    pub fn with_network(
        mut self,
        name: impl Into<String>,
        ip_address: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        self.network_settings
            .networks
            .insert(name.into(), NetworkAttachment::new(ip_address, gateway));
        self
    }

    /// Network attachments keyed by network name
    pub fn networks(&self) -> &HashMap<String, NetworkAttachment> {
        &self.network_settings.networks
    }
}

/// A cluster-orchestrated service as listed by the runtime
///
/// Only the id is interpreted; the remaining metadata is carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service id (join key for task containers)
    #[serde(rename = "ID")]
    pub id: String,

    /// Service spec as reported by the runtime
    #[serde(rename = "Spec", default)]
    pub spec: serde_json::Value,

    /// Endpoint metadata (ports, mode, virtual addresses)
    #[serde(rename = "Endpoint", default)]
    pub endpoint: serde_json::Value,
}

impl ServiceDescriptor {
    /// Create a descriptor with no metadata
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Service descriptors keyed by service id
pub type ServiceMap = HashMap<String, ServiceDescriptor>;

/// Index a service listing by id
pub fn index_services(services: Vec<ServiceDescriptor>) -> ServiceMap {
    services
        .into_iter()
        .map(|service| (service.id.clone(), service))
        .collect()
}

/// Trait for container runtime clients
///
/// A runtime client performs the I/O needed to list containers and
/// services. It owns connection setup, authentication and version
/// negotiation; callers only see finished snapshots.
///
/// # Responsibilities
///
/// - ✅ List running containers with labels and network attachments
/// - ✅ List cluster services (cluster mode only)
/// - ❌ Interpret labels or build DNS records (owned by the aggregator)
/// - ❌ Retry failed listings (a failed cycle is simply reported)
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// List containers in the runtime's scan order
    async fn list_containers(&self) -> Result<Vec<ContainerSnapshot>, crate::Error>;

    /// List cluster services
    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>, crate::Error>;

    /// Name used in log output
    fn client_name(&self) -> &'static str;
}
