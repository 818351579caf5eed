//! Authorization of admin calls against the role-management page.

use std::sync::Arc;

use tracing::warn;

use rolegate_auth::PermissionResolver;
use rolegate_core::config::AccessConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::PageId;
use rolegate_entity::permission::{AccessDecision, Capability};

use crate::context::RequestContext;

/// Checks the actor's grants on the role-management page.
///
/// The page is an ordinary catalog page, so admin rights are themselves
/// role permissions resolved by the same engine.
#[derive(Debug, Clone)]
pub struct AdminGuard {
    resolver: Arc<PermissionResolver>,
    page_id: PageId,
}

impl AdminGuard {
    /// Binds the guard to the page declared at `access.role_management_route`.
    ///
    /// Fails with `Configuration` if the catalog has no such page.
    pub fn from_config(resolver: Arc<PermissionResolver>, config: &AccessConfig) -> AppResult<Self> {
        let route = config.role_management_route.as_str();
        let page_id = resolver
            .catalog()
            .page_by_route(route)
            .map(|p| p.id)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Role-management route '{route}' is not declared in the catalog"
                ))
            })?;
        Ok(Self { resolver, page_id })
    }

    /// The role-management page.
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Fails with `Forbidden` unless the actor holds `capability` on the page.
    pub async fn require(&self, ctx: &RequestContext, capability: Capability) -> AppResult<AccessDecision> {
        self.resolver
            .require(ctx.user_id, self.page_id, &ctx.role_ids, capability)
            .await
            .inspect_err(|e| {
                if e.is_forbidden() {
                    warn!(actor_id = %ctx.user_id, %capability, "Admin call denied");
                }
            })
    }
}
