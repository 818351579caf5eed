//! Permission engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the resolver and the admin permission API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Route of the page whose grants authorize role and permission administration.
    #[serde(default = "default_role_management_route")]
    pub role_management_route: String,
    /// Timeout for a single hierarchy lookup in milliseconds.
    ///
    /// A lookup that does not answer in time is treated as a deny.
    #[serde(default = "default_hierarchy_timeout")]
    pub hierarchy_timeout_ms: u64,
}

impl AccessConfig {
    /// The hierarchy lookup timeout as a [`Duration`].
    pub fn hierarchy_timeout(&self) -> Duration {
        Duration::from_millis(self.hierarchy_timeout_ms)
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            role_management_route: default_role_management_route(),
            hierarchy_timeout_ms: default_hierarchy_timeout(),
        }
    }
}

fn default_role_management_route() -> String {
    "/settings/roles".to_string()
}

fn default_hierarchy_timeout() -> u64 {
    500
}
