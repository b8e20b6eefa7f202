// # dockdns-core
//
// Core library translating container runtime state into DNS endpoint records.
//
// ## Architecture Overview
//
// This library provides the functionality for container-driven DNS records:
// - **RuntimeClient**: Trait for listing containers and cluster services
// - **annotations**: Label parsing (hostnames, TTL, targets, provider options)
// - **network**: Address selection from container network attachments
// - **aggregator**: Compose / cluster grouping and representative merge
// - **endpoint**: Endpoint records and record-type inference
// - **ContainerSource**: Fetch → resolve cycle and change notifications
//
// ## Design Principles
//
// 1. **Pure Core**: Resolution is a synchronous function over a snapshot
// 2. **Determinism**: Same snapshot → same records, same order
// 3. **No Silent Ambiguity**: Several networks without a preference yield no target
// 4. **Library-First**: All core functionality can be used as a library

pub mod aggregator;
pub mod annotations;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod network;
pub mod runtime;
pub mod source;
pub mod traits;

// Re-export core types for convenience
pub use aggregator::resolve_endpoints;
pub use config::SourceConfig;
pub use endpoint::{Endpoint, RecordType, infer_record_type};
pub use error::{Error, Result};
pub use runtime::SnapshotFileClient;
pub use source::{ContainerSource, SourceEvent};
pub use traits::{ContainerSnapshot, RuntimeClient, ServiceDescriptor, ServiceMap};
