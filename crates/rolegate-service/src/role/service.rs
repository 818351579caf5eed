//! Role CRUD gated on the role-management page.

use std::sync::Arc;

use tracing::info;

use rolegate_auth::PermissionResolver;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::RoleId;
use rolegate_database::RoleStore;
use rolegate_entity::permission::Capability;
use rolegate_entity::role::{CreateRole, Role, UpdateRole};

use crate::context::RequestContext;
use crate::guard::AdminGuard;

/// Manages the role lifecycle.
#[derive(Clone)]
pub struct RoleService {
    /// Role store.
    roles: Arc<dyn RoleStore>,
    /// Resolver, for cache invalidation.
    resolver: Arc<PermissionResolver>,
    /// Admin authorization.
    guard: Arc<AdminGuard>,
}

impl std::fmt::Debug for RoleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleService").finish()
    }
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(
        roles: Arc<dyn RoleStore>,
        resolver: Arc<PermissionResolver>,
        guard: Arc<AdminGuard>,
    ) -> Self {
        Self {
            roles,
            resolver,
            guard,
        }
    }

    /// Lists all roles. Requires the role-management page to be visible.
    pub async fn list_roles(&self, ctx: &RequestContext) -> AppResult<Vec<Role>> {
        self.guard.require(ctx, Capability::View).await?;
        self.roles.list_roles().await
    }

    /// Gets one role by id.
    pub async fn get_role(&self, ctx: &RequestContext, role_id: RoleId) -> AppResult<Role> {
        self.guard.require(ctx, Capability::View).await?;
        self.roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))
    }

    /// Creates a role. Requires `can_edit`.
    pub async fn create_role(&self, ctx: &RequestContext, req: CreateRole) -> AppResult<Role> {
        self.guard.require(ctx, Capability::Edit).await?;
        let role = self.roles.create_role(req).await?;
        info!(actor_id = %ctx.user_id, role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    /// Updates a role. Requires `can_edit`.
    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        role_id: RoleId,
        patch: UpdateRole,
    ) -> AppResult<Role> {
        self.guard.require(ctx, Capability::Edit).await?;
        let role = self.roles.update_role(role_id, patch).await?;
        self.resolver.cache().invalidate_role(role_id).await;
        info!(
            actor_id = %ctx.user_id,
            role_id = %role_id,
            name = %role.name,
            is_active = role.is_active,
            "Role updated"
        );
        Ok(role)
    }

    /// Deletes a role and all of its permission rows. Requires `can_edit`.
    pub async fn delete_role(&self, ctx: &RequestContext, role_id: RoleId) -> AppResult<()> {
        self.guard.require(ctx, Capability::Edit).await?;
        self.roles.delete_role(role_id).await?;
        self.resolver.cache().invalidate_role(role_id).await;
        info!(actor_id = %ctx.user_id, role_id = %role_id, "Role deleted");
        Ok(())
    }
}
