//! Immutable catalog snapshot.
//!
//! The catalog is loaded once at process start (from configuration or from
//! storage) and shared read-only for the lifetime of a resolver. Adding a
//! protected page is a redeployment, not a runtime operation.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use rolegate_core::config::CatalogConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::{DepartmentId, PageId};

use super::department::Department;
use super::page::Page;

/// Validated set of departments and pages with lookup indexes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "CatalogParts", try_from = "CatalogParts")]
pub struct Catalog {
    departments: Vec<Department>,
    pages: Vec<Page>,
    page_index: HashMap<PageId, usize>,
    route_index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct CatalogParts {
    departments: Vec<Department>,
    pages: Vec<Page>,
}

impl From<Catalog> for CatalogParts {
    fn from(catalog: Catalog) -> Self {
        Self {
            departments: catalog.departments,
            pages: catalog.pages,
        }
    }
}

impl TryFrom<CatalogParts> for Catalog {
    type Error = AppError;

    fn try_from(parts: CatalogParts) -> Result<Self, Self::Error> {
        Catalog::new(parts.departments, parts.pages)
    }
}

impl Catalog {
    /// Builds a catalog, validating ids, routes, and department references.
    ///
    /// Departments and pages are kept sorted by id.
    pub fn new(mut departments: Vec<Department>, mut pages: Vec<Page>) -> AppResult<Self> {
        departments.sort_by_key(|d| d.id);
        pages.sort_by_key(|p| p.id);

        let mut department_ids = HashSet::new();
        for department in &departments {
            if department.id.get() <= 0 {
                return Err(AppError::validation(format!(
                    "Department '{}' must have a positive id, got {}",
                    department.name, department.id
                )));
            }
            if !department_ids.insert(department.id) {
                return Err(AppError::validation(format!(
                    "Duplicate department id {}",
                    department.id
                )));
            }
        }

        let mut page_index = HashMap::with_capacity(pages.len());
        let mut route_index = HashMap::with_capacity(pages.len());
        for (idx, page) in pages.iter_mut().enumerate() {
            if page.id.get() <= 0 {
                return Err(AppError::validation(format!(
                    "Page '{}' must have a positive id, got {}",
                    page.route, page.id
                )));
            }
            if page.route.trim().is_empty() {
                return Err(AppError::validation(format!("Page {} has an empty route", page.id)));
            }
            if page.department_id.is_some_and(|id| id.is_unassigned()) {
                page.department_id = None;
            }
            if let Some(department_id) = page.department_id {
                if !department_ids.contains(&department_id) {
                    return Err(AppError::validation(format!(
                        "Page '{}' references unknown department {}",
                        page.route, department_id
                    )));
                }
            }
            if page_index.insert(page.id, idx).is_some() {
                return Err(AppError::validation(format!("Duplicate page id {}", page.id)));
            }
            if route_index.insert(page.route.clone(), idx).is_some() {
                return Err(AppError::validation(format!(
                    "Duplicate page route '{}'",
                    page.route
                )));
            }
        }

        Ok(Self {
            departments,
            pages,
            page_index,
            route_index,
        })
    }

    /// Builds a catalog from the `[catalog]` configuration section.
    pub fn from_config(config: &CatalogConfig) -> AppResult<Self> {
        Self::new(
            config.departments.iter().map(Department::from).collect(),
            config.pages.iter().map(Page::from).collect(),
        )
    }

    /// All departments, ordered by id.
    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// All pages, ordered by id.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Looks up a page by id.
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.page_index.get(&id).map(|idx| &self.pages[*idx])
    }

    /// Looks up a page by route.
    pub fn page_by_route(&self, route: &str) -> Option<&Page> {
        self.route_index.get(route).map(|idx| &self.pages[*idx])
    }

    /// Looks up a page by id, failing with `NotFound`.
    pub fn require_page(&self, id: PageId) -> AppResult<&Page> {
        self.page(id)
            .ok_or_else(|| AppError::not_found(format!("Page {id} not found")))
    }

    /// Looks up a page by route, failing with `NotFound`.
    pub fn require_route(&self, route: &str) -> AppResult<&Page> {
        self.page_by_route(route)
            .ok_or_else(|| AppError::not_found(format!("Page with route '{route}' not found")))
    }

    /// Whether the catalog declares the page.
    pub fn contains_page(&self, id: PageId) -> bool {
        self.page_index.contains_key(&id)
    }

    /// Pages grouped by department for display.
    ///
    /// Pages without a department are grouped under
    /// [`DepartmentId::UNASSIGNED`]. Departments without pages are omitted.
    pub fn grouped_pages(&self) -> BTreeMap<DepartmentId, Vec<Page>> {
        let mut groups: BTreeMap<DepartmentId, Vec<Page>> = BTreeMap::new();
        for page in &self.pages {
            groups.entry(page.group_key()).or_default().push(page.clone());
        }
        groups
    }
}
