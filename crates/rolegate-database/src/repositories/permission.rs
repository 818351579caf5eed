//! Role permission repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::{PageId, RoleId};
use rolegate_entity::permission::{PagePermission, PermissionSet, RolePermission};

use crate::error::db_error;
use crate::store::PermissionStore;

/// Repository for per-role permission sets.
///
/// Rows live in `role_permissions` keyed by `(role_id, page_id)`; the set
/// version is `roles.permissions_version`, locked with `FOR UPDATE` while a
/// replace is in progress.
#[derive(Debug, Clone)]
pub struct RolePermissionRepository {
    pool: PgPool,
}

impl RolePermissionRepository {
    /// Create a new role permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count rows referencing `role_id`, regardless of whether the role exists.
    pub async fn count_rows_for_role(&self, role_id: RoleId) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count role permissions", e))
    }
}

#[async_trait]
impl PermissionStore for RolePermissionRepository {
    async fn get_permissions(&self, role_id: RoleId) -> AppResult<PermissionSet> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        // Version and rows must come from the same snapshot.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to set isolation level", e))?;

        let version: Option<i64> =
            sqlx::query_scalar("SELECT permissions_version FROM roles WHERE id = $1")
                .bind(role_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to load permission version", e))?;

        let Some(version) = version else {
            return Ok(PermissionSet::empty(role_id));
        };

        let entries = sqlx::query_as::<_, RolePermission>(
            "SELECT role_id, page_id, can_view, can_edit, can_assign, data_scope \
             FROM role_permissions WHERE role_id = $1 ORDER BY page_id ASC",
        )
        .bind(role_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to load role permissions", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to finish permission read", e))?;

        Ok(PermissionSet {
            role_id,
            version,
            entries,
        })
    }

    async fn set_permissions(
        &self,
        role_id: RoleId,
        entries: &[PagePermission],
        expected_version: Option<i64>,
    ) -> AppResult<PermissionSet> {
        let rows = PagePermission::normalize(role_id, entries);
        if rows.len() != entries.len() {
            debug!(
                role_id = %role_id,
                supplied = entries.len(),
                kept = rows.len(),
                "Duplicate page entries collapsed"
            );
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let current: i64 =
            sqlx::query_scalar("SELECT permissions_version FROM roles WHERE id = $1 FOR UPDATE")
                .bind(role_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to lock permission set", e))?
                .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))?;

        if let Some(expected) = expected_version {
            if expected != current {
                return Err(AppError::conflict(format!(
                    "Permission set for role {role_id} changed (expected version {expected}, \
                     found {current}); re-read and retry"
                )));
            }
        }

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to clear role permissions", e))?;

        for row in &rows {
            sqlx::query(
                "INSERT INTO role_permissions \
                 (role_id, page_id, can_view, can_edit, can_assign, data_scope) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(row.role_id)
            .bind(row.page_id)
            .bind(row.can_view)
            .bind(row.can_edit)
            .bind(row.can_assign)
            .bind(row.data_scope)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                let err = db_error("Failed to insert role permission", e);
                if err.is_not_found() {
                    AppError::not_found(format!("Page {} not found", row.page_id))
                } else {
                    err
                }
            })?;
        }

        let version: i64 = sqlx::query_scalar(
            "UPDATE roles SET permissions_version = permissions_version + 1 \
             WHERE id = $1 RETURNING permissions_version",
        )
        .bind(role_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to advance permission version", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit permission set", e))?;

        info!(role_id = %role_id, version, entries = rows.len(), "Permission set replaced");

        Ok(PermissionSet {
            role_id,
            version,
            entries: rows,
        })
    }

    async fn permissions_for_page(
        &self,
        role_ids: &[RoleId],
        page_id: PageId,
    ) -> AppResult<Vec<RolePermission>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, RolePermission>(
            "SELECT rp.role_id, rp.page_id, rp.can_view, rp.can_edit, rp.can_assign, rp.data_scope \
             FROM role_permissions rp \
             INNER JOIN roles r ON r.id = rp.role_id \
             WHERE rp.role_id = ANY($1) AND rp.page_id = $2 AND r.is_active = TRUE",
        )
        .bind(role_ids.to_vec())
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load page permissions", e))
    }
}
