//! Effective page access for a user holding any number of roles.
//!
//! Resolution:
//! 1. The page must exist in the catalog (`NotFound` otherwise).
//! 2. Unknown role ids are ignored and inactive roles are skipped.
//! 3. The remaining roles' grants on the page are merged most-permissively.
//! 4. No grant at all is a deny.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::{PageId, RoleId, UserId};
use rolegate_entity::catalog::{Catalog, Page};
use rolegate_entity::permission::{AccessDecision, Capability, PermissionSet};

use super::cache::PermissionCache;

/// A catalog page together with the caller's effective access to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAccess {
    /// The page.
    pub page: Page,
    /// Merged access to it.
    pub decision: AccessDecision,
}

/// Resolves effective access decisions against the catalog and the role stores.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    catalog: Arc<Catalog>,
    cache: Arc<PermissionCache>,
}

impl PermissionResolver {
    /// Creates a resolver over `catalog`, reading through `cache`.
    pub fn new(catalog: Arc<Catalog>, cache: Arc<PermissionCache>) -> Self {
        Self { catalog, cache }
    }

    /// The catalog this resolver checks pages against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The read-through cache, for invalidation after writes.
    pub fn cache(&self) -> &PermissionCache {
        &self.cache
    }

    /// Effective access of `user_id` to `page_id` through `role_ids`.
    pub async fn resolve(
        &self,
        user_id: UserId,
        page_id: PageId,
        role_ids: &[RoleId],
    ) -> AppResult<AccessDecision> {
        self.catalog.require_page(page_id)?;
        let sets = self.active_sets(role_ids).await?;
        let decision = AccessDecision::merge(sets.iter().filter_map(|s| s.entry_for(page_id)));
        debug!(
            user_id = %user_id,
            page_id = %page_id,
            roles = role_ids.len(),
            can_view = decision.can_view,
            can_edit = decision.can_edit,
            can_assign = decision.can_assign,
            data_scope = %decision.data_scope,
            "Resolved page access"
        );
        Ok(decision)
    }

    /// Same as [`resolve`](Self::resolve), addressing the page by route.
    pub async fn resolve_route(
        &self,
        user_id: UserId,
        route: &str,
        role_ids: &[RoleId],
    ) -> AppResult<AccessDecision> {
        let page_id = self.catalog.require_route(route)?.id;
        self.resolve(user_id, page_id, role_ids).await
    }

    /// Every catalog page visible to the user, in page id order.
    ///
    /// Loads each held role's permission set once for all pages.
    pub async fn visible_pages(
        &self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> AppResult<Vec<PageAccess>> {
        let sets = self.active_sets(role_ids).await?;
        let visible: Vec<PageAccess> = self
            .catalog
            .pages()
            .iter()
            .map(|page| PageAccess {
                page: page.clone(),
                decision: AccessDecision::merge(sets.iter().filter_map(|s| s.entry_for(page.id))),
            })
            .filter(|access| access.decision.is_visible())
            .collect();
        debug!(user_id = %user_id, visible = visible.len(), "Resolved visible pages");
        Ok(visible)
    }

    /// Resolves and fails with `Forbidden` unless `capability` is granted.
    pub async fn require(
        &self,
        user_id: UserId,
        page_id: PageId,
        role_ids: &[RoleId],
        capability: Capability,
    ) -> AppResult<AccessDecision> {
        let decision = self.resolve(user_id, page_id, role_ids).await?;
        require_capability(&decision, capability)?;
        Ok(decision)
    }

    async fn active_sets(&self, role_ids: &[RoleId]) -> AppResult<Vec<PermissionSet>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }
        let roles = self.cache.roles(role_ids).await?;
        try_join_all(
            roles
                .iter()
                .filter(|role| role.is_active)
                .map(|role| self.cache.permission_set(role.id)),
        )
        .await
    }
}

/// Fails with `Forbidden` unless `decision` grants `capability`.
pub fn require_capability(decision: &AccessDecision, capability: Capability) -> AppResult<()> {
    if decision.allows(capability) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Missing {capability} permission on this page"
        )))
    }
}
