//! Read-through cache of roles and permission sets.
//!
//! Entries are keyed by role id and only ever invalidated, never patched.
//! Each role carries a generation that every invalidation advances. A fill
//! that loaded from the store before an invalidation evicts what it wrote
//! once it sees the generation moved, so a revoked set is never served
//! after `invalidate_*` returns. Cache failures are logged and the store is
//! read instead.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use rolegate_cache::CacheManager;
use rolegate_cache::keys;
use rolegate_core::result::AppResult;
use rolegate_core::traits::CacheProvider;
use rolegate_core::types::RoleId;
use rolegate_database::{PermissionStore, RoleStore};
use rolegate_entity::permission::PermissionSet;
use rolegate_entity::role::Role;

/// Role and permission-set reads backed by the stores, cached per role.
#[derive(Clone)]
pub struct PermissionCache {
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    cache: Arc<CacheManager>,
    generations: Arc<DashMap<RoleId, u64>>,
}

impl std::fmt::Debug for PermissionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionCache")
            .field("tracked_roles", &self.generations.len())
            .finish()
    }
}

impl PermissionCache {
    /// Creates a cache in front of the given stores.
    pub fn new(
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            roles,
            permissions,
            cache,
            generations: Arc::new(DashMap::new()),
        }
    }

    /// Loads the given roles, omitting unknown ids. Only misses reach the store.
    pub async fn roles(&self, ids: &[RoleId]) -> AppResult<Vec<Role>> {
        let mut found: HashMap<RoleId, Role> = HashMap::with_capacity(ids.len());
        let mut misses = Vec::new();
        for id in ids {
            if found.contains_key(id) || misses.iter().any(|(m, _)| m == id) {
                continue;
            }
            match self.read::<Role>(&keys::role_by_id(*id)).await {
                Some(role) => {
                    found.insert(*id, role);
                }
                None => misses.push((*id, self.generation(*id))),
            }
        }

        if !misses.is_empty() {
            let miss_ids: Vec<RoleId> = misses.iter().map(|(id, _)| *id).collect();
            for role in self.roles.find_roles(&miss_ids).await? {
                if let Some((_, loaded_at)) = misses.iter().find(|(id, _)| *id == role.id) {
                    self.fill(role.id, *loaded_at, &keys::role_by_id(role.id), &role)
                        .await;
                }
                found.insert(role.id, role);
            }
        }

        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| found.remove(id))
            .collect())
    }

    /// Loads one role's permission set.
    pub async fn permission_set(&self, role_id: RoleId) -> AppResult<PermissionSet> {
        let key = keys::role_permissions(role_id);
        if let Some(set) = self.read::<PermissionSet>(&key).await {
            return Ok(set);
        }
        let loaded_at = self.generation(role_id);
        let set = self.permissions.get_permissions(role_id).await?;
        self.fill(role_id, loaded_at, &key, &set).await;
        Ok(set)
    }

    /// Drops the cached permission set of `role_id`.
    pub async fn invalidate_permissions(&self, role_id: RoleId) {
        self.advance(role_id);
        self.remove(&keys::role_permissions(role_id)).await;
    }

    /// Drops every cached entry derived from `role_id`.
    pub async fn invalidate_role(&self, role_id: RoleId) {
        self.advance(role_id);
        for key in keys::role_keys(role_id) {
            self.remove(&key).await;
        }
    }

    fn generation(&self, role_id: RoleId) -> u64 {
        self.generations.get(&role_id).map(|g| *g).unwrap_or(0)
    }

    fn advance(&self, role_id: RoleId) {
        *self.generations.entry(role_id).or_insert(0) += 1;
    }

    /// Writes a value loaded while the role was at generation `loaded_at`.
    ///
    /// Invalidation advances the generation before removing keys, so either
    /// the removal lands after this write or the re-check below sees the
    /// new generation and evicts.
    async fn fill<T: serde::Serialize + Send + Sync>(
        &self,
        role_id: RoleId,
        loaded_at: u64,
        key: &str,
        value: &T,
    ) {
        if self.generation(role_id) != loaded_at {
            debug!(key, "Skipping fill raced by invalidation");
            return;
        }
        self.write(key, value).await;
        if self.generation(role_id) != loaded_at {
            debug!(key, "Evicting fill raced by invalidation");
            self.remove(key).await;
        }
    }

    async fn read<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.cache.get_json::<T>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    async fn write<T: serde::Serialize + Send + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set_json(key, value).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    async fn remove(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(key, error = %e, "Cache invalidation failed");
        }
    }
}
