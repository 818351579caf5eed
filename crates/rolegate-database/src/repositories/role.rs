//! Role repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::RoleId;
use rolegate_entity::role::{CreateRole, Role, UpdateRole};

use crate::error::db_error;
use crate::store::RoleStore;

const ROLE_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

/// Repository for role CRUD backed by the `roles` table.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn name_conflict(name: &str, err: AppError) -> AppError {
    if err.is_conflict() {
        AppError::conflict(format!("Role name '{name}' already exists"))
    } else {
        err
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn create_role(&self, req: CreateRole) -> AppResult<Role> {
        let role = Role::from_request(req.validated()?);

        let created = sqlx::query_as::<_, Role>(&format!(
            "INSERT INTO roles (id, name, description, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {ROLE_COLUMNS}"
        ))
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.is_active)
        .bind(role.created_at)
        .bind(role.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_conflict(&role.name, db_error("Failed to create role", e)))?;

        info!(role_id = %created.id, name = %created.name, "Role created");
        Ok(created)
    }

    async fn update_role(&self, id: RoleId, patch: UpdateRole) -> AppResult<Role> {
        let patch = patch.validated()?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let mut role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to load role", e))?
        .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;

        role.apply(&patch);

        let updated = sqlx::query_as::<_, Role>(&format!(
            "UPDATE roles SET name = $2, description = $3, is_active = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {ROLE_COLUMNS}"
        ))
        .bind(id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.is_active)
        .bind(role.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| name_conflict(&role.name, db_error("Failed to update role", e)))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit role update", e))?;

        info!(role_id = %id, name = %updated.name, is_active = updated.is_active, "Role updated");
        Ok(updated)
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let revoked = sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete role permissions", e))?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete role", e))?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls back the permission delete.
            return Err(AppError::not_found(format!("Role {id} not found")));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit role deletion", e))?;

        info!(role_id = %id, revoked, "Role deleted");
        Ok(())
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find role", e))
    }

    async fn find_roles(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find roles", e))
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles ORDER BY LOWER(name) ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list roles", e))
    }
}
