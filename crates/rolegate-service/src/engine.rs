//! Wiring of the resolver and admin services from configuration.

use std::sync::Arc;

use tracing::info;

use rolegate_auth::{PermissionCache, PermissionResolver, ScopeChecker};
use rolegate_cache::CacheManager;
use rolegate_core::config::AccessConfig;
use rolegate_core::result::AppResult;
use rolegate_core::traits::HierarchyLookup;
use rolegate_core::types::{PageId, RoleId, UserId};
use rolegate_database::{PermissionStore, RoleStore};
use rolegate_entity::catalog::Catalog;
use rolegate_entity::permission::AccessDecision;

use crate::catalog::CatalogService;
use crate::guard::AdminGuard;
use crate::permission::PermissionService;
use crate::role::RoleService;

/// The permission engine: request-time resolution plus the admin API.
#[derive(Debug, Clone)]
pub struct AccessServices {
    /// Request-time resolver.
    pub resolver: Arc<PermissionResolver>,
    /// Record-level scope checks.
    pub scope: Arc<ScopeChecker>,
    /// Role administration.
    pub roles: RoleService,
    /// Permission-set administration.
    pub permissions: PermissionService,
    /// Catalog listings.
    pub catalog: CatalogService,
}

impl AccessServices {
    /// Builds every service over the given collaborators.
    ///
    /// Fails with `Configuration` if `catalog` lacks the role-management page.
    pub fn build(
        config: &AccessConfig,
        catalog: Catalog,
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        cache: CacheManager,
        hierarchy: Arc<dyn HierarchyLookup>,
    ) -> AppResult<Self> {
        let catalog = Arc::new(catalog);
        let cache = Arc::new(PermissionCache::new(
            Arc::clone(&roles),
            Arc::clone(&permissions),
            Arc::new(cache),
        ));
        let resolver = Arc::new(PermissionResolver::new(Arc::clone(&catalog), cache));
        let guard = Arc::new(AdminGuard::from_config(Arc::clone(&resolver), config)?);
        let scope = Arc::new(ScopeChecker::new(hierarchy, config.hierarchy_timeout()));

        info!(
            pages = catalog.pages().len(),
            role_management_page = %guard.page_id(),
            hierarchy_timeout_ms = config.hierarchy_timeout_ms,
            "Permission engine initialized"
        );

        Ok(Self {
            roles: RoleService::new(roles, Arc::clone(&resolver), Arc::clone(&guard)),
            permissions: PermissionService::new(permissions, Arc::clone(&resolver), Arc::clone(&guard)),
            catalog: CatalogService::new(catalog, guard),
            resolver,
            scope,
        })
    }

    /// Effective access of `user_id` to `page_id`.
    pub async fn resolve(
        &self,
        user_id: UserId,
        page_id: PageId,
        role_ids: &[RoleId],
    ) -> AppResult<AccessDecision> {
        self.resolver.resolve(user_id, page_id, role_ids).await
    }

    /// Whether `decision` lets `actor` act on a record owned by `owner`.
    pub async fn scope_allows(&self, decision: &AccessDecision, actor: UserId, owner: UserId) -> bool {
        self.scope.allows(decision, actor, owner).await
    }
}
