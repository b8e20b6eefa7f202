//! Configuration types for the dockdns system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Container source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Whether the runtime runs in cluster (orchestrated) mode
    ///
    /// When enabled, services are listed every cycle and task containers are
    /// grouped by cluster service id.
    #[serde(default)]
    pub cluster_mode: bool,

    /// Capacity of the change notification channel
    ///
    /// Subscribers that fall further behind than this lose the oldest
    /// notifications.
    ///
    /// Default: 16 notifications
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl SourceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            cluster_mode: false,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Enable or disable cluster mode
    pub fn with_cluster_mode(mut self, cluster_mode: bool) -> Self {
        self.cluster_mode = cluster_mode;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_event_channel_capacity() -> usize {
    16
}
