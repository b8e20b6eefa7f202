//! Network target resolution
//!
//! Picks a container address from its network attachments when no explicit
//! target annotation exists. Ambiguity is never resolved silently: with no
//! preference and several attachments, no target is produced.

use std::collections::HashMap;

use crate::traits::NetworkAttachment;

/// Resolve the address target of a container
///
/// - With a preferred network, only that attachment is considered.
/// - Without one, the sole attachment is used if there is exactly one.
///
/// Attachments without an address never yield a target.
pub fn resolve_target(
    networks: &HashMap<String, NetworkAttachment>,
    preferred: Option<&str>,
) -> Option<String> {
    let attachment = match preferred {
        Some(name) => networks.get(name)?,
        None if networks.len() == 1 => networks.values().next()?,
        None => return None,
    };

    let ip = attachment.ip_address.trim();
    (!ip.is_empty()).then(|| ip.to_string())
}
