//! Test doubles and common utilities for contract tests
//!
//! This module provides a scripted runtime client and the container
//! fixtures shared by the contract tests.

#![allow(dead_code)]

use dockdns_core::annotations::{
    CLUSTER_SERVICE_ID_LABEL, CLUSTER_SERVICE_NAME_LABEL, COMPOSE_SERVICE_LABEL, HOSTNAME_KEY,
    TARGET_KEY, TTL_KEY,
};
use dockdns_core::error::Result;
use dockdns_core::traits::{ContainerSnapshot, RuntimeClient, ServiceDescriptor};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const CLUSTER_SERVICE_A: &str = "jqz4hrd4c51w164rpvi2fdbqz";
pub const CLUSTER_SERVICE_B: &str = "2xbz9m0akcoggmuna2dajn334";

/// A runtime client serving fixed listings, with switchable failures
pub struct ScriptedRuntime {
    containers: Mutex<Vec<ContainerSnapshot>>,
    services: Vec<ServiceDescriptor>,
    fail_containers: AtomicBool,
    fail_services: AtomicBool,
    container_calls: Arc<AtomicUsize>,
    service_calls: Arc<AtomicUsize>,
}

impl ScriptedRuntime {
    pub fn new(containers: Vec<ContainerSnapshot>, services: Vec<ServiceDescriptor>) -> Self {
        Self {
            containers: Mutex::new(containers),
            services,
            fail_containers: AtomicBool::new(false),
            fail_services: AtomicBool::new(false),
            container_calls: Arc::new(AtomicUsize::new(0)),
            service_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make subsequent container listings fail (or succeed again)
    pub fn fail_containers(&self, fail: bool) {
        self.fail_containers.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent service listings fail (or succeed again)
    pub fn fail_services(&self, fail: bool) {
        self.fail_services.store(fail, Ordering::SeqCst);
    }

    /// Replace the container listing
    pub fn set_containers(&self, containers: Vec<ContainerSnapshot>) {
        *self.containers.lock().unwrap() = containers;
    }

    pub fn container_calls(&self) -> usize {
        self.container_calls.load(Ordering::SeqCst)
    }

    pub fn service_calls(&self) -> usize {
        self.service_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RuntimeClient for ScriptedRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerSnapshot>> {
        self.container_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_containers.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("runtime socket unavailable").into());
        }
        Ok(self.containers.lock().unwrap().clone())
    }

    async fn list_services(&self) -> Result<Vec<ServiceDescriptor>> {
        self.service_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_services.load(Ordering::SeqCst) {
            return Err(dockdns_core::Error::runtime("node is not a swarm manager"));
        }
        Ok(self.services.clone())
    }

    fn client_name(&self) -> &'static str {
        "scripted"
    }
}

/// A container attached to a single network
pub fn container_on(network: &str, ip: &str) -> ContainerSnapshot {
    ContainerSnapshot::new(format!("{}-{}", network, ip)).with_network(network, ip, "172.17.0.1")
}

/// Standalone container: `gateway.example.local` on the default bridge
pub fn standalone_gateway() -> ContainerSnapshot {
    container_on("bridge", "172.17.0.2")
        .with_label("maintainer", "Author Name <author@example.local>")
        .with_label(HOSTNAME_KEY, "gateway.example.local")
}

/// Compose member pointing at `gateway.example.local` explicitly
pub fn whoami(ip: &str) -> ContainerSnapshot {
    container_on("ns_default", ip)
        .with_label(HOSTNAME_KEY, "whoami.example.local")
        .with_label(TARGET_KEY, "gateway.example.local")
        .with_label(TTL_KEY, "1700")
        .with_label(COMPOSE_SERVICE_LABEL, "whoami")
}

/// Compose member resolved from its network address
pub fn whoami_beta(ip: &str) -> ContainerSnapshot {
    container_on("ns_default", ip)
        .with_label(HOSTNAME_KEY, "whoami-beta.example.local")
        .with_label(TTL_KEY, "1500")
        .with_label(COMPOSE_SERVICE_LABEL, "whoami2")
}

/// Cluster task without a hostname annotation
pub fn swarm_task_unnamed(ip: &str) -> ContainerSnapshot {
    container_on("ingress", ip)
        .with_label("com.docker.swarm.node.id", "")
        .with_label(CLUSTER_SERVICE_ID_LABEL, CLUSTER_SERVICE_A)
        .with_label(CLUSTER_SERVICE_NAME_LABEL, "whoami-swarm")
        .with_label("com.docker.swarm.task", "")
}

/// Cluster task with a hostname annotation
pub fn swarm_task(ip: &str) -> ContainerSnapshot {
    container_on("ingress", ip)
        .with_label(HOSTNAME_KEY, "whoami-swarm.example.local")
        .with_label("com.docker.swarm.node.id", "")
        .with_label(CLUSTER_SERVICE_ID_LABEL, CLUSTER_SERVICE_B)
        .with_label(CLUSTER_SERVICE_NAME_LABEL, "whoami-swarm2")
        .with_label("com.docker.swarm.task", "")
}

/// Standalone and compose containers (no cluster labels)
pub fn compose_fixture() -> Vec<ContainerSnapshot> {
    vec![
        standalone_gateway(),
        whoami("172.18.0.2"),
        whoami("172.18.0.3"),
        whoami("172.18.0.4"),
        whoami_beta("172.19.0.2"),
        whoami_beta("172.19.0.3"),
        whoami_beta("172.19.0.4"),
    ]
}

/// Compose fixture followed by two cluster services' tasks
pub fn full_fixture() -> Vec<ContainerSnapshot> {
    let mut containers = compose_fixture();
    containers.extend([
        swarm_task_unnamed("10.0.0.4"),
        swarm_task_unnamed("10.0.0.5"),
        swarm_task("10.0.0.6"),
        swarm_task("10.0.0.7"),
    ]);
    containers
}

/// Descriptors for both cluster services in the full fixture
pub fn fixture_services() -> Vec<ServiceDescriptor> {
    let endpoint = serde_json::json!({
        "Spec": { "Mode": "vip" },
        "Ports": [{ "Protocol": "tcp", "TargetPort": 5000, "PublishedPort": 5000 }]
    });
    vec![
        ServiceDescriptor {
            endpoint: endpoint.clone(),
            ..ServiceDescriptor::new(CLUSTER_SERVICE_A)
        },
        ServiceDescriptor {
            endpoint,
            ..ServiceDescriptor::new(CLUSTER_SERVICE_B)
        },
    ]
}
