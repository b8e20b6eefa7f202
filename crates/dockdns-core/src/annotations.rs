//! Annotation parsing
//!
//! Extracts DNS intent (hostnames, TTL, explicit targets, provider-specific
//! options, set identifier, preferred network) from a container label map.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// Prefix shared by all DNS annotations
pub const ANNOTATION_PREFIX: &str = "external-dns.alpha.kubernetes.io/";

/// Comma-separated DNS names
pub const HOSTNAME_KEY: &str = "external-dns.alpha.kubernetes.io/hostname";

/// Comma-separated explicit targets
pub const TARGET_KEY: &str = "external-dns.alpha.kubernetes.io/target";

/// Record TTL in seconds
pub const TTL_KEY: &str = "external-dns.alpha.kubernetes.io/ttl";

/// Set identifier for provider routing policies
pub const SET_IDENTIFIER_KEY: &str = "external-dns.alpha.kubernetes.io/set-identifier";

/// Cloudflare proxy toggle, passed through under its full key
pub const CLOUDFLARE_PROXIED_KEY: &str = "external-dns.alpha.kubernetes.io/cloudflare-proxied";

/// Preferred network for address resolution
pub const NETWORK_KEY: &str = "external-dns/network";

/// Compose service name label (compose grouping key)
pub const COMPOSE_SERVICE_LABEL: &str = "com.docker.compose.service";

/// Cluster service id label (cluster grouping key)
pub const CLUSTER_SERVICE_ID_LABEL: &str = "com.docker.swarm.service.id";

/// Cluster service name label (informational)
pub const CLUSTER_SERVICE_NAME_LABEL: &str = "com.docker.swarm.service.name";

/// Largest accepted TTL
pub const MAX_TTL: u32 = i32::MAX as u32;

/// Annotation prefixes whose options are forwarded as `<provider>/<option>`
const PROVIDER_PREFIXES: &[&str] = &["aws", "scw"];

/// Provider-specific options, ordered by key
pub type ProviderSpecific = BTreeMap<String, String>;

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim().trim_end_matches('.'))
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hostnames from the hostname annotation, in annotation order
///
/// An empty list means the container requests no record.
pub fn hostnames(labels: &HashMap<String, String>) -> Vec<String> {
    labels
        .get(HOSTNAME_KEY)
        .map(|value| split_list(value))
        .unwrap_or_default()
}

/// TTL from the TTL annotation
///
/// Returns `Ok(None)` when the annotation is absent and
/// [`Error::InvalidTtl`] when it is present but not an integer in
/// `0..=MAX_TTL`.
pub fn ttl(labels: &HashMap<String, String>) -> Result<Option<u32>> {
    let Some(raw) = labels.get(TTL_KEY) else {
        return Ok(None);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|e| Error::invalid_ttl(TTL_KEY, raw.as_str(), format!("{}", e)))?;

    if value < 0 || value > i64::from(MAX_TTL) {
        return Err(Error::invalid_ttl(
            TTL_KEY,
            raw.as_str(),
            format!("must be between 0 and {}", MAX_TTL),
        ));
    }

    Ok(Some(value as u32))
}

/// Explicit targets from the target annotation (possibly empty)
pub fn explicit_targets(labels: &HashMap<String, String>) -> Vec<String> {
    labels
        .get(TARGET_KEY)
        .map(|value| split_list(value))
        .unwrap_or_default()
}

/// Provider-specific options and the optional set identifier
pub fn provider_specific(labels: &HashMap<String, String>) -> (ProviderSpecific, Option<String>) {
    let mut options = ProviderSpecific::new();

    if let Some(proxied) = labels.get(CLOUDFLARE_PROXIED_KEY) {
        options.insert(CLOUDFLARE_PROXIED_KEY.to_string(), proxied.clone());
    }

    for (key, value) in labels {
        let Some(option) = key.strip_prefix(ANNOTATION_PREFIX) else {
            continue;
        };
        for provider in PROVIDER_PREFIXES {
            if let Some(attr) = option
                .strip_prefix(provider)
                .and_then(|rest| rest.strip_prefix('-'))
                && !attr.is_empty()
            {
                options.insert(format!("{}/{}", provider, attr), value.clone());
            }
        }
    }

    let set_identifier = labels
        .get(SET_IDENTIFIER_KEY)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    (options, set_identifier)
}

/// Preferred network name, if annotated
pub fn preferred_network(labels: &HashMap<String, String>) -> Option<&str> {
    labels.get(NETWORK_KEY).map(String::as_str)
}

/// Compose service name, treating an empty value as absent
pub fn compose_service(labels: &HashMap<String, String>) -> Option<&str> {
    labels
        .get(COMPOSE_SERVICE_LABEL)
        .map(String::as_str)
        .filter(|name| !name.is_empty())
}

/// Cluster service id, treating an empty value as absent
pub fn cluster_service_id(labels: &HashMap<String, String>) -> Option<&str> {
    labels
        .get(CLUSTER_SERVICE_ID_LABEL)
        .map(String::as_str)
        .filter(|id| !id.is_empty())
}
