//! Grouping aggregator
//!
//! Turns a container snapshot list into endpoint records.
//!
//! ## Flow
//!
//! ```text
//! containers ──▶ parse annotations ──▶ resolve target ──▶ classify
//!                                                            │
//!            ┌───────────────────────┬───────────────────────┤
//!            ▼                       ▼                       ▼
//!       standalone             compose group          cluster group
//!     (emit at once)        (merge, emit after)   (gate on service, merge,
//!                                                      emit after)
//! ```
//!
//! Standalone records are emitted during the scan. Compose groups follow in
//! first-seen order, then cluster groups in first-seen order.
//!
//! Resolution is a pure function of its inputs: no I/O, no shared state.

mod groups;

pub use groups::OrderedGroups;

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::annotations::{self, CLUSTER_SERVICE_NAME_LABEL, ProviderSpecific};
use crate::endpoint::{Endpoint, endpoint_for_hostname};
use crate::network;
use crate::traits::{ContainerSnapshot, ServiceMap};

/// Per-container aggregation unit, alive for one resolution pass
#[derive(Debug, Clone)]
struct PendingState<'a> {
    ttl: u32,
    targets: Vec<String>,
    provider_specific: ProviderSpecific,
    set_identifier: Option<String>,
    /// Targets were derived from the network attachments
    has_fallback_target: bool,
    labels: &'a HashMap<String, String>,
}

impl PendingState<'_> {
    /// Fold a sibling into this representative
    ///
    /// Only network-derived sibling targets are appended; explicit targets
    /// of siblings repeat the representative's own.
    fn absorb(self, sibling: Self) -> Self {
        if !sibling.has_fallback_target {
            return self;
        }
        let mut targets = self.targets;
        targets.extend(sibling.targets);
        Self { targets, ..self }
    }

    fn emit(&self, endpoints: &mut Vec<Endpoint>) {
        for hostname in annotations::hostnames(self.labels) {
            if let Some(endpoint) = endpoint_for_hostname(
                &hostname,
                &self.targets,
                self.ttl,
                &self.provider_specific,
                self.set_identifier.as_deref(),
            ) {
                endpoints.push(endpoint);
            }
        }
    }
}

/// Merge a group into its representative (the first member)
fn merge_group(members: Vec<PendingState<'_>>) -> Option<PendingState<'_>> {
    let mut members = members.into_iter();
    let representative = members.next()?;
    Some(members.fold(representative, PendingState::absorb))
}

/// Parse one container into a pending state
///
/// Returns `None` when the container must be skipped: malformed TTL
/// (logged) or no resolvable target (silent).
fn pending_state(container: &ContainerSnapshot) -> Option<PendingState<'_>> {
    let labels = &container.labels;

    let ttl = match annotations::ttl(labels) {
        Ok(ttl) => ttl.unwrap_or(0),
        Err(e) => {
            warn!("Skipping container {}: {}", container.id, e);
            return None;
        }
    };

    let mut targets = annotations::explicit_targets(labels);
    let mut has_fallback_target = false;
    if targets.is_empty() {
        let preferred = annotations::preferred_network(labels);
        if let Some(ip) = network::resolve_target(container.networks(), preferred) {
            targets.push(ip);
            has_fallback_target = true;
        }
    }

    if targets.is_empty() {
        debug!("Container {} has no target, skipping", container.id);
        return None;
    }

    let (provider_specific, set_identifier) = annotations::provider_specific(labels);

    Some(PendingState {
        ttl,
        targets,
        provider_specific,
        set_identifier,
        has_fallback_target,
        labels,
    })
}

/// Resolve endpoint records from a container snapshot
///
/// # Parameters
///
/// - `containers`: Containers in runtime scan order
/// - `services`: Cluster services keyed by id. `Some` enables cluster
///   grouping; `None` means the runtime is not in cluster mode (or the
///   service listing was unavailable this cycle).
///
/// # Returns
///
/// Endpoint records in deterministic order for the given inputs.
pub fn resolve_endpoints(
    containers: &[ContainerSnapshot],
    services: Option<&ServiceMap>,
) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();
    let mut compose_groups = OrderedGroups::new();
    let mut cluster_groups = OrderedGroups::new();

    for container in containers {
        let Some(state) = pending_state(container) else {
            continue;
        };

        let cluster_id = services
            .is_some()
            .then(|| annotations::cluster_service_id(&container.labels))
            .flatten();

        if let Some(id) = cluster_id {
            cluster_groups.push(id, state);
        } else if let Some(name) = annotations::compose_service(&container.labels) {
            compose_groups.push(name, state);
        } else {
            state.emit(&mut endpoints);
        }
    }

    debug!(
        "Scanned {} containers: {} compose groups, {} cluster groups",
        containers.len(),
        compose_groups.len(),
        cluster_groups.len()
    );

    for (_, members) in compose_groups.into_ordered() {
        if let Some(representative) = merge_group(members) {
            representative.emit(&mut endpoints);
        }
    }

    for (id, members) in cluster_groups.into_ordered() {
        if !services.is_some_and(|services| services.contains_key(&id)) {
            debug!("No descriptor for cluster service {}, dropping group", id);
            continue;
        }
        if let Some(representative) = merge_group(members) {
            debug!(
                "Cluster service {} ({})",
                id,
                representative
                    .labels
                    .get(CLUSTER_SERVICE_NAME_LABEL)
                    .map(String::as_str)
                    .unwrap_or("unnamed")
            );
            representative.emit(&mut endpoints);
        }
    }

    endpoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{
        CLUSTER_SERVICE_ID_LABEL, COMPOSE_SERVICE_LABEL, HOSTNAME_KEY, TARGET_KEY, TTL_KEY,
    };
    use crate::endpoint::RecordType;

    fn container(ip: &str) -> ContainerSnapshot {
        ContainerSnapshot::new(format!("c-{}", ip)).with_network("ns_default", ip, "172.18.0.1")
    }

    #[test]
    fn absorb_skips_explicit_sibling_targets() {
        let labels = HashMap::new();
        let state = |target: &str, fallback: bool| PendingState {
            ttl: 0,
            targets: vec![target.to_string()],
            provider_specific: ProviderSpecific::new(),
            set_identifier: None,
            has_fallback_target: fallback,
            labels: &labels,
        };

        let merged = merge_group(vec![
            state("10.0.0.1", true),
            state("gateway.example.local", false),
            state("10.0.0.3", true),
        ])
        .unwrap();
        assert_eq!(merged.targets, vec!["10.0.0.1", "10.0.0.3"]);
    }

    #[test]
    fn merge_of_empty_group_is_none() {
        assert!(merge_group(Vec::new()).is_none());
    }

    #[test]
    fn bad_ttl_skips_container_for_its_group() {
        let containers = vec![
            container("172.19.0.2")
                .with_label(HOSTNAME_KEY, "web.example.local")
                .with_label(TTL_KEY, "soon")
                .with_label(COMPOSE_SERVICE_LABEL, "web"),
            container("172.19.0.3")
                .with_label(HOSTNAME_KEY, "web.example.local")
                .with_label(COMPOSE_SERVICE_LABEL, "web"),
        ];

        let endpoints = resolve_endpoints(&containers, None);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].targets, vec!["172.19.0.3"]);
    }

    #[test]
    fn compose_label_applies_when_cluster_mode_is_off() {
        let containers = vec![
            container("10.0.0.4")
                .with_label(HOSTNAME_KEY, "svc.example.local")
                .with_label(CLUSTER_SERVICE_ID_LABEL, "svc-1")
                .with_label(COMPOSE_SERVICE_LABEL, "svc"),
            container("10.0.0.5")
                .with_label(HOSTNAME_KEY, "svc.example.local")
                .with_label(CLUSTER_SERVICE_ID_LABEL, "svc-1")
                .with_label(COMPOSE_SERVICE_LABEL, "svc"),
        ];

        let endpoints = resolve_endpoints(&containers, None);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].targets, vec!["10.0.0.4", "10.0.0.5"]);
    }

    #[test]
    fn cluster_group_takes_precedence_in_cluster_mode() {
        let containers = vec![
            container("10.0.0.4")
                .with_label(HOSTNAME_KEY, "svc.example.local")
                .with_label(CLUSTER_SERVICE_ID_LABEL, "svc-1")
                .with_label(COMPOSE_SERVICE_LABEL, "svc"),
        ];

        // Cluster mode without a descriptor for svc-1 drops the group
        // instead of falling back to the compose group.
        let services = ServiceMap::new();
        assert!(resolve_endpoints(&containers, Some(&services)).is_empty());
    }

    #[test]
    fn representative_options_win() {
        let containers = vec![
            container("172.20.0.2")
                .with_label(HOSTNAME_KEY, "api.example.local")
                .with_label(TTL_KEY, "60")
                .with_label(COMPOSE_SERVICE_LABEL, "api"),
            container("172.20.0.3")
                .with_label(HOSTNAME_KEY, "other.example.local")
                .with_label(TTL_KEY, "120")
                .with_label(COMPOSE_SERVICE_LABEL, "api"),
        ];

        let endpoints = resolve_endpoints(&containers, None);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].dns_name, "api.example.local");
        assert_eq!(endpoints[0].record_ttl, 60);
        assert_eq!(endpoints[0].record_type, RecordType::A);
        assert_eq!(endpoints[0].targets, vec!["172.20.0.2", "172.20.0.3"]);
    }

    #[test]
    fn explicit_representative_with_fallback_sibling_becomes_alias() {
        let containers = vec![
            container("172.21.0.2")
                .with_label(HOSTNAME_KEY, "mix.example.local")
                .with_label(TARGET_KEY, "lb.example.local")
                .with_label(COMPOSE_SERVICE_LABEL, "mix"),
            container("172.21.0.3")
                .with_label(HOSTNAME_KEY, "mix.example.local")
                .with_label(COMPOSE_SERVICE_LABEL, "mix"),
        ];

        let endpoints = resolve_endpoints(&containers, None);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].record_type, RecordType::Cname);
        assert_eq!(endpoints[0].targets, vec!["lb.example.local"]);
    }
}
