//! Endpoint records and record-type inference
//!
//! An [`Endpoint`] is the unit handed to the downstream record
//! synchronization controller: one DNS name, its targets, a record type and
//! the options attached to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

use crate::annotations::ProviderSpecific;

/// DNS record type of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// Address record (IPv4)
    A,
    /// Address record (IPv6)
    Aaaa,
    /// Alias record pointing at another name
    Cname,
}

impl RecordType {
    /// Whether this is an address record (A or AAAA)
    pub fn is_address(&self) -> bool {
        matches!(self, RecordType::A | RecordType::Aaaa)
    }

    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS endpoint record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified record name
    pub dns_name: String,
    /// Ordered record targets
    pub targets: Vec<String>,
    /// Inferred record type
    pub record_type: RecordType,
    /// Set identifier (empty when unset)
    pub set_identifier: String,
    /// TTL in seconds (0 means provider default)
    #[serde(rename = "recordTTL")]
    pub record_ttl: u32,
    /// Labels for the synchronization controller (always empty here)
    pub labels: BTreeMap<String, String>,
    /// Provider-specific options
    pub provider_specific: ProviderSpecific,
}

/// Infer the record type for a target list and return the targets it keeps
///
/// - All targets are IP literals: an address record keeping every target.
///   The type is `AAAA` when every literal is IPv6 and `A` otherwise.
/// - Any target is not an IP literal: an alias record carrying only the
///   first non-literal target.
///
/// Returns `None` for an empty target list.
pub fn infer_record_type(targets: &[String]) -> Option<(RecordType, Vec<String>)> {
    let parsed: Vec<Option<IpAddr>> = targets
        .iter()
        .map(|target| target.parse::<IpAddr>().ok())
        .collect();

    if let Some(alias) = targets
        .iter()
        .zip(&parsed)
        .find_map(|(target, ip)| ip.is_none().then_some(target))
    {
        return Some((RecordType::Cname, vec![alias.clone()]));
    }

    if parsed.is_empty() {
        return None;
    }

    let record_type = if parsed.iter().flatten().all(IpAddr::is_ipv6) {
        RecordType::Aaaa
    } else {
        RecordType::A
    };

    Some((record_type, targets.to_vec()))
}

/// Build the endpoint for one hostname
///
/// Returns `None` when there is nothing to point at.
pub fn endpoint_for_hostname(
    hostname: &str,
    targets: &[String],
    ttl: u32,
    provider_specific: &ProviderSpecific,
    set_identifier: Option<&str>,
) -> Option<Endpoint> {
    let (record_type, targets) = infer_record_type(targets)?;

    Some(Endpoint {
        dns_name: hostname.to_string(),
        targets,
        record_type,
        set_identifier: set_identifier.unwrap_or_default().to_string(),
        record_ttl: ttl,
        labels: BTreeMap::new(),
        provider_specific: provider_specific.clone(),
    })
}
