//! Deployment-time catalog of departments and protected pages.

use serde::{Deserialize, Serialize};

/// The `[catalog]` section: reference data loaded once at process start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Declared departments.
    #[serde(default)]
    pub departments: Vec<DepartmentConfig>,
    /// Declared protected pages.
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

/// A `[[catalog.departments]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentConfig {
    /// Department id (> 0; `0` is reserved for "Unassigned").
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A `[[catalog.pages]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page id (> 0).
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique route identifying the page.
    pub route: String,
    /// Owning department, if any.
    #[serde(default)]
    pub department_id: Option<i64>,
}
