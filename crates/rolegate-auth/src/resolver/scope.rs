//! Record-level data-scope enforcement.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use rolegate_core::traits::HierarchyLookup;
use rolegate_core::types::UserId;
use rolegate_entity::permission::{AccessDecision, DataScope};

/// Decides whether a resolved decision covers a record owned by someone.
///
/// The hierarchy is consulted only for `subordinates` scope when the actor
/// is not the owner. A lookup that errors or outlives `timeout` denies.
#[derive(Clone)]
pub struct ScopeChecker {
    hierarchy: Arc<dyn HierarchyLookup>,
    timeout: Duration,
}

impl std::fmt::Debug for ScopeChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeChecker")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ScopeChecker {
    /// Creates a checker that bounds each hierarchy lookup by `timeout`.
    pub fn new(hierarchy: Arc<dyn HierarchyLookup>, timeout: Duration) -> Self {
        Self { hierarchy, timeout }
    }

    /// Whether `actor` may act on a record owned by `owner` under `decision`.
    pub async fn allows(&self, decision: &AccessDecision, actor: UserId, owner: UserId) -> bool {
        match decision.data_scope {
            DataScope::All => true,
            DataScope::Own => actor == owner,
            DataScope::Subordinates if actor == owner => true,
            DataScope::Subordinates => self.manages(actor, owner).await,
        }
    }

    async fn manages(&self, actor: UserId, owner: UserId) -> bool {
        match tokio::time::timeout(self.timeout, self.hierarchy.is_manager_of(actor, owner)).await {
            Ok(Ok(manages)) => manages,
            Ok(Err(e)) => {
                warn!(actor = %actor, owner = %owner, error = %e, "Hierarchy lookup failed, denying");
                false
            }
            Err(_) => {
                warn!(
                    actor = %actor,
                    owner = %owner,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Hierarchy lookup timed out, denying"
                );
                false
            }
        }
    }
}
