//! In-memory implementation of the role, permission, and catalog stores.
//!
//! All state lives behind a single `tokio::sync::RwLock`, so every mutating
//! call is applied under one write lock and is atomic with respect to every
//! other call. State is lost when the process exits; this backend exists for
//! tests and local development.
//!
//! [`InMemoryStore::set_available`] simulates a storage outage: while
//! unavailable every call fails with `ServiceUnavailable`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::{PageId, RoleId};
use rolegate_entity::catalog::Catalog;
use rolegate_entity::permission::{PagePermission, PermissionSet, RolePermission};
use rolegate_entity::role::{CreateRole, Role, UpdateRole};

use crate::store::{CatalogStore, PermissionStore, RoleStore};

#[derive(Debug, Default)]
struct MemoryState {
    catalog: Catalog,
    roles: HashMap<RoleId, Role>,
    versions: HashMap<RoleId, i64>,
    permissions: HashMap<RoleId, BTreeMap<PageId, RolePermission>>,
}

impl MemoryState {
    fn name_taken(&self, name: &str, except: Option<RoleId>) -> bool {
        self.roles
            .values()
            .any(|r| Some(r.id) != except && r.name_matches(name))
    }

    fn permission_set(&self, role_id: RoleId) -> PermissionSet {
        let Some(version) = self.versions.get(&role_id) else {
            return PermissionSet::empty(role_id);
        };
        PermissionSet {
            role_id,
            version: *version,
            entries: self
                .permissions
                .get(&role_id)
                .map(|rows| rows.values().copied().collect())
                .unwrap_or_default(),
        }
    }
}

/// In-memory store implementing [`RoleStore`], [`PermissionStore`], and [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
    available: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Creates an empty store with an empty catalog.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Creates a store whose catalog is already synchronized to `catalog`.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                catalog,
                ..MemoryState::default()
            })),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Toggles the simulated storage outage.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of permission rows referencing `role_id`, whether or not the role exists.
    pub async fn row_count_for_role(&self, role_id: RoleId) -> usize {
        self.state
            .read()
            .await
            .permissions
            .get(&role_id)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    /// Total number of permission rows across all roles.
    pub async fn total_rows(&self) -> usize {
        self.state
            .read()
            .await
            .permissions
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::service_unavailable("In-memory store is unavailable"))
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleStore for InMemoryStore {
    async fn create_role(&self, req: CreateRole) -> AppResult<Role> {
        self.ensure_available()?;
        let req = req.validated()?;
        let mut state = self.state.write().await;
        if state.name_taken(&req.name, None) {
            return Err(AppError::conflict(format!(
                "Role name '{}' already exists",
                req.name
            )));
        }
        let role = Role::from_request(req);
        state.roles.insert(role.id, role.clone());
        state.versions.insert(role.id, 0);
        info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    async fn update_role(&self, id: RoleId, patch: UpdateRole) -> AppResult<Role> {
        self.ensure_available()?;
        let patch = patch.validated()?;
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&id) {
            return Err(AppError::not_found(format!("Role {id} not found")));
        }
        if let Some(name) = &patch.name {
            if state.name_taken(name, Some(id)) {
                return Err(AppError::conflict(format!("Role name '{name}' already exists")));
            }
        }
        let role = state
            .roles
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;
        role.apply(&patch);
        let updated = role.clone();
        info!(role_id = %id, name = %updated.name, is_active = updated.is_active, "Role updated");
        Ok(updated)
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<()> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        if state.roles.remove(&id).is_none() {
            return Err(AppError::not_found(format!("Role {id} not found")));
        }
        state.versions.remove(&id);
        let revoked = state.permissions.remove(&id).map(|rows| rows.len()).unwrap_or(0);
        info!(role_id = %id, revoked, "Role deleted");
        Ok(())
    }

    async fn find_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        self.ensure_available()?;
        Ok(self.state.read().await.roles.get(&id).cloned())
    }

    async fn find_roles(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(ids.iter().filter_map(|id| state.roles.get(id).cloned()).collect())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.ensure_available()?;
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by_key(|r| r.name.to_lowercase());
        Ok(roles)
    }
}

#[async_trait]
impl PermissionStore for InMemoryStore {
    async fn get_permissions(&self, role_id: RoleId) -> AppResult<PermissionSet> {
        self.ensure_available()?;
        Ok(self.state.read().await.permission_set(role_id))
    }

    async fn set_permissions(
        &self,
        role_id: RoleId,
        entries: &[PagePermission],
        expected_version: Option<i64>,
    ) -> AppResult<PermissionSet> {
        self.ensure_available()?;
        let rows = PagePermission::normalize(role_id, entries);
        let mut state = self.state.write().await;

        let current = *state
            .versions
            .get(&role_id)
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))?;

        if let Some(expected) = expected_version {
            if expected != current {
                return Err(AppError::conflict(format!(
                    "Permission set for role {role_id} changed (expected version {expected}, \
                     found {current}); re-read and retry"
                )));
            }
        }

        if let Some(missing) = rows.iter().find(|r| !state.catalog.contains_page(r.page_id)) {
            return Err(AppError::not_found(format!("Page {} not found", missing.page_id)));
        }

        let version = current + 1;
        state
            .permissions
            .insert(role_id, rows.iter().map(|r| (r.page_id, *r)).collect());
        state.versions.insert(role_id, version);

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
        self.ensure_available()?;
        let state = self.state.read().await;
        Ok(role_ids
            .iter()
            .filter(|id| state.roles.get(id).is_some_and(|r| r.is_active))
            .filter_map(|id| state.permissions.get(id)?.get(&page_id).copied())
            .collect())
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn load_catalog(&self) -> AppResult<Catalog> {
        self.ensure_available()?;
        Ok(self.state.read().await.catalog.clone())
    }

    async fn sync_catalog(&self, catalog: &Catalog) -> AppResult<Vec<RoleId>> {
        self.ensure_available()?;
        let mut state = self.state.write().await;
        let mut affected = Vec::new();
        for (role_id, rows) in state.permissions.iter_mut() {
            let before = rows.len();
            rows.retain(|page_id, _| catalog.contains_page(*page_id));
            if rows.len() != before {
                affected.push(*role_id);
            }
        }
        for role_id in &affected {
            if let Some(version) = state.versions.get_mut(role_id) {
                *version += 1;
            }
        }
        affected.sort();
        state.catalog = catalog.clone();
        info!(
            pages = catalog.pages().len(),
            departments = catalog.departments().len(),
            affected_roles = affected.len(),
            "Catalog synchronized"
        );
        Ok(affected)
    }
}
