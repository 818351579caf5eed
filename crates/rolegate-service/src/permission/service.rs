//! Permission-set reads and full-set replacement.

use std::sync::Arc;

use tracing::info;

use rolegate_auth::PermissionResolver;
use rolegate_core::result::AppResult;
use rolegate_core::types::RoleId;
use rolegate_database::PermissionStore;
use rolegate_entity::permission::{Capability, PagePermission, PermissionSet};

use crate::context::RequestContext;
use crate::guard::AdminGuard;

/// Reads and replaces role permission sets.
///
/// Reads go straight to the store so the returned version token is current.
#[derive(Clone)]
pub struct PermissionService {
    /// Permission store.
    permissions: Arc<dyn PermissionStore>,
    /// Resolver, for catalog checks and cache invalidation.
    resolver: Arc<PermissionResolver>,
    /// Admin authorization.
    guard: Arc<AdminGuard>,
}

impl std::fmt::Debug for PermissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionService").finish()
    }
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(
        permissions: Arc<dyn PermissionStore>,
        resolver: Arc<PermissionResolver>,
        guard: Arc<AdminGuard>,
    ) -> Self {
        Self {
            permissions,
            resolver,
            guard,
        }
    }

    /// The role's current set and version. Requires the role-management page to be visible.
    pub async fn get_role_permissions(
        &self,
        ctx: &RequestContext,
        role_id: RoleId,
    ) -> AppResult<PermissionSet> {
        self.guard.require(ctx, Capability::View).await?;
        self.permissions.get_permissions(role_id).await
    }

    /// Replaces the role's full set. Requires `can_assign`.
    ///
    /// Every entry must name a catalog page. With `expected_version` set, a
    /// concurrent change fails with `Conflict` and nothing is written.
    pub async fn replace_role_permissions(
        &self,
        ctx: &RequestContext,
        role_id: RoleId,
        entries: &[PagePermission],
        expected_version: Option<i64>,
    ) -> AppResult<PermissionSet> {
        self.guard.require(ctx, Capability::Assign).await?;
        for entry in entries {
            self.resolver.catalog().require_page(entry.page_id)?;
        }

        let set = self
            .permissions
            .set_permissions(role_id, entries, expected_version)
            .await?;
        self.resolver.cache().invalidate_permissions(role_id).await;

        info!(
            actor_id = %ctx.user_id,
            role_id = %role_id,
            version = set.version,
            entries = set.entries.len(),
            "Role permissions replaced"
        );
        Ok(set)
    }
}
