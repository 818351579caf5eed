//! Protected page entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rolegate_core::config::PageConfig;
use rolegate_core::types::{DepartmentId, PageId};

/// A protected resource, identified uniquely by its route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Page {
    /// Page identifier (> 0).
    pub id: PageId,
    /// Display name.
    pub name: String,
    /// Unique application route.
    pub route: String,
    /// Owning department, or `None` for "Unassigned".
    pub department_id: Option<DepartmentId>,
}

impl Page {
    /// The key this page is grouped under for display.
    pub fn group_key(&self) -> DepartmentId {
        self.department_id.unwrap_or(DepartmentId::UNASSIGNED)
    }
}

impl From<&PageConfig> for Page {
    fn from(config: &PageConfig) -> Self {
        Self {
            id: PageId(config.id),
            name: config.name.clone(),
            route: config.route.clone(),
            department_id: config
                .department_id
                .filter(|id| *id != 0)
                .map(DepartmentId),
        }
    }
}
