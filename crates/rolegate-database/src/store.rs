//! Storage traits for roles, permission sets, and the page catalog.
//!
//! Every mutating method runs in a single storage transaction: either all of
//! its effects commit or none do.

use async_trait::async_trait;

use rolegate_core::result::AppResult;
use rolegate_core::types::{PageId, RoleId};
use rolegate_entity::catalog::Catalog;
use rolegate_entity::permission::{PagePermission, PermissionSet, RolePermission};
use rolegate_entity::role::{CreateRole, Role, UpdateRole};

/// CRUD lifecycle for roles.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Creates an active role. Fails with `Conflict` if the name is taken
    /// (case-insensitive) and `Validation` if it is blank or too long.
    async fn create_role(&self, req: CreateRole) -> AppResult<Role>;

    /// Applies a partial update. Fails with `NotFound` for an unknown id and
    /// `Conflict` on a rename collision.
    async fn update_role(&self, id: RoleId, patch: UpdateRole) -> AppResult<Role>;

    /// Deletes the role and every permission row referencing it, atomically.
    /// Fails with `NotFound` for an unknown id, leaving storage unchanged.
    async fn delete_role(&self, id: RoleId) -> AppResult<()>;

    /// Finds one role.
    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>>;

    /// Finds the given roles; unknown ids are omitted.
    async fn find_roles(&self, ids: &[RoleId]) -> AppResult<Vec<Role>>;

    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;
}

/// Persistence of per-role permission sets.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Returns the role's full set. A role with nothing configured (or an
    /// unknown role) yields an empty set at version `0`.
    async fn get_permissions(&self, role_id: RoleId) -> AppResult<PermissionSet>;

    /// Replaces the role's full set with `entries` (de-duplicated by page,
    /// last wins) and advances its version by one.
    ///
    /// If `expected_version` is given and differs from the stored version the
    /// call fails with `Conflict` and nothing is written. Fails with
    /// `NotFound` for an unknown role or a page missing from the catalog.
    async fn set_permissions(
        &self,
        role_id: RoleId,
        entries: &[PagePermission],
        expected_version: Option<i64>,
    ) -> AppResult<PermissionSet>;

    /// Rows for `page_id` held by any of the given *active* roles.
    async fn permissions_for_page(
        &self,
        role_ids: &[RoleId],
        page_id: PageId,
    ) -> AppResult<Vec<RolePermission>>;
}

/// Persistence of the deployment catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Reads the stored catalog.
    async fn load_catalog(&self) -> AppResult<Catalog>;

    /// Makes storage match `catalog`: upserts every department and page and
    /// removes the ones no longer declared (with their permission rows).
    ///
    /// Every role that lost rows has its permission version advanced in the
    /// same transaction; those roles are returned, ordered by id.
    async fn sync_catalog(&self, catalog: &Catalog) -> AppResult<Vec<RoleId>>;
}
