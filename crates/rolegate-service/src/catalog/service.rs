//! Read-only catalog listings for the admin screens.

use std::collections::BTreeMap;
use std::sync::Arc;

use rolegate_core::result::AppResult;
use rolegate_core::types::DepartmentId;
use rolegate_entity::catalog::{Catalog, Department, Page};
use rolegate_entity::permission::Capability;

use crate::context::RequestContext;
use crate::guard::AdminGuard;

/// Lists pages and departments. Requires the role-management page to be visible.
#[derive(Debug, Clone)]
pub struct CatalogService {
    catalog: Arc<Catalog>,
    guard: Arc<AdminGuard>,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(catalog: Arc<Catalog>, guard: Arc<AdminGuard>) -> Self {
        Self { catalog, guard }
    }

    /// All pages, in id order.
    pub async fn list_pages(&self, ctx: &RequestContext) -> AppResult<Vec<Page>> {
        self.guard.require(ctx, Capability::View).await?;
        Ok(self.catalog.pages().to_vec())
    }

    /// All departments, in id order.
    pub async fn list_departments(&self, ctx: &RequestContext) -> AppResult<Vec<Department>> {
        self.guard.require(ctx, Capability::View).await?;
        Ok(self.catalog.departments().to_vec())
    }

    /// Pages grouped by department; key `0` holds the unassigned ones.
    pub async fn grouped_pages(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<BTreeMap<DepartmentId, Vec<Page>>> {
        self.guard.require(ctx, Capability::View).await?;
        Ok(self.catalog.grouped_pages())
    }
}
