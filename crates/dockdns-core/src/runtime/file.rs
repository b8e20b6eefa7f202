// # Snapshot File Client
//
// File-based implementation of RuntimeClient.
//
// ## Purpose
//
// Serves container and service listings from a JSON document on disk.
// Useful for dry runs, fixtures, and runtimes exported by another tool.
// The file is re-read on every call, so edits take effect on the next cycle.
//
// ## File Format
//
// ```json
// {
//   "containers": [
//     {
//       "Id": "4f2c...",
//       "Labels": { "external-dns.alpha.kubernetes.io/hostname": "web.example.local" },
//       "NetworkSettings": {
//         "Networks": { "bridge": { "IPAddress": "172.17.0.2", "Gateway": "172.17.0.1" } }
//       }
//     }
//   ],
//   "services": [ { "ID": "jqz4hrd4c51w164rpvi2fdbqz" } ]
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::runtime_client::{ContainerSnapshot, RuntimeClient, ServiceDescriptor};

/// Serializable snapshot file format
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub containers: Vec<ContainerSnapshot>,
    #[serde(default)]
    pub services: Vec<ServiceDescriptor>,
}

/// Runtime client reading snapshots from a JSON file
///
/// # Example
///
/// ```rust,no_run
/// use dockdns_core::runtime::SnapshotFileClient;
/// use dockdns_core::traits::RuntimeClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SnapshotFileClient::new("/var/lib/dockdns/snapshot.json");
///
///     for container in client.list_containers().await? {
///         println!("{}", container.id);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotFileClient {
    path: PathBuf,
}

impl SnapshotFileClient {
    /// Create a client for the snapshot file at `path`
    ///
    /// The file is not touched until the first listing.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SnapshotFile, Error> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::runtime(format!(
                "Failed to read snapshot {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let snapshot: SnapshotFile = serde_json::from_str(&content)?;
        tracing::debug!(
            "Loaded snapshot {}: {} containers, {} services",
            self.path.display(),
            snapshot.containers.len(),
            snapshot.services.len()
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl RuntimeClient for SnapshotFileClient {
    async fn list_containers(&self) -> Result<Vec<ContainerSnapshot>, Error> {
        Ok(self.load().await?.containers)
    }

    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>, Error> {
        Ok(self.load().await?.services)
    }

    fn client_name(&self) -> &'static str {
        "snapshot-file"
    }
}
