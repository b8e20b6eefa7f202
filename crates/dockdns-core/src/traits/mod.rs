//! Core traits for the dockdns system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`RuntimeClient`]: Fetch container and service snapshots from a runtime

pub mod runtime_client;

pub use runtime_client::{
    ContainerSnapshot, NetworkAttachment, NetworkSettings, RuntimeClient, ServiceDescriptor,
    ServiceMap, index_services,
};
