//! Catalog repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use rolegate_core::result::AppResult;
use rolegate_core::types::{DepartmentId, PageId, RoleId};
use rolegate_entity::catalog::{Catalog, Department, Page};

use crate::error::db_error;
use crate::store::CatalogStore;

/// Repository mirroring the deployment catalog into `departments` and `pages`.
///
/// The tables exist so `role_permissions.page_id` can carry a foreign key;
/// the configuration stays the source of truth.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for CatalogRepository {
    async fn load_catalog(&self) -> AppResult<Catalog> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT id, name, description FROM departments ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list departments", e))?;

        let pages = sqlx::query_as::<_, Page>(
            "SELECT id, name, route, department_id FROM pages ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list pages", e))?;

        Catalog::new(departments, pages)
    }

    async fn sync_catalog(&self, catalog: &Catalog) -> AppResult<Vec<RoleId>> {
        let page_ids: Vec<PageId> = catalog.pages().iter().map(|p| p.id).collect();
        let department_ids: Vec<DepartmentId> =
            catalog.departments().iter().map(|d| d.id).collect();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        // Rows on undeclared pages go with them by cascade; their sets change.
        let mut affected: Vec<RoleId> = sqlx::query_scalar(
            "UPDATE roles SET permissions_version = permissions_version + 1 \
             WHERE id IN (SELECT DISTINCT role_id FROM role_permissions \
             WHERE NOT (page_id = ANY($1))) RETURNING id",
        )
        .bind(&page_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to advance affected permission versions", e))?;

        let removed_pages = sqlx::query("DELETE FROM pages WHERE NOT (id = ANY($1))")
            .bind(&page_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to remove undeclared pages", e))?
            .rows_affected();

        for department in catalog.departments() {
            sqlx::query(
                "INSERT INTO departments (id, name, description) VALUES ($1, $2, $3) \
                 ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, \
                 description = EXCLUDED.description",
            )
            .bind(department.id)
            .bind(&department.name)
            .bind(&department.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to upsert department", e))?;
        }

        // Route uniqueness is deferred to commit so routes may move between pages.
        for page in catalog.pages() {
            sqlx::query(
                "INSERT INTO pages (id, name, route, department_id) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, \
                 route = EXCLUDED.route, department_id = EXCLUDED.department_id",
            )
            .bind(page.id)
            .bind(&page.name)
            .bind(&page.route)
            .bind(page.department_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to upsert page", e))?;
        }

        let removed_departments =
            sqlx::query("DELETE FROM departments WHERE NOT (id = ANY($1))")
                .bind(&department_ids)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to remove undeclared departments", e))?
                .rows_affected();

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit catalog sync", e))?;

        info!(
            pages = page_ids.len(),
            departments = department_ids.len(),
            removed_pages,
            removed_departments,
            affected_roles = affected.len(),
            "Catalog synchronized"
        );
        affected.sort();
        Ok(affected)
    }
}
