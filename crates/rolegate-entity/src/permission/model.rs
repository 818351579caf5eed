//! Role permission rows and the per-role permission set aggregate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rolegate_core::types::{PageId, RoleId};

use super::scope::DataScope;

/// The grant of capabilities and data scope for one (role, page) pair.
///
/// At most one row exists per `(role_id, page_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RolePermission {
    /// Role the grant belongs to.
    pub role_id: RoleId,
    /// Page the grant applies to.
    pub page_id: PageId,
    /// May open the page.
    pub can_view: bool,
    /// May modify the page's records.
    pub can_edit: bool,
    /// May assign the page's records to others.
    pub can_assign: bool,
    /// Which records the grant exposes.
    pub data_scope: DataScope,
}

impl RolePermission {
    /// Whether the grant makes the page visible: any capability implies view.
    pub fn is_visible(&self) -> bool {
        self.can_view || self.can_edit || self.can_assign
    }
}

/// One entry of a "replace the permission set" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePermission {
    /// Page the grant applies to.
    pub page_id: PageId,
    /// May open the page.
    #[serde(default)]
    pub can_view: bool,
    /// May modify the page's records.
    #[serde(default)]
    pub can_edit: bool,
    /// May assign the page's records to others.
    #[serde(default)]
    pub can_assign: bool,
    /// Which records the grant exposes.
    #[serde(default)]
    pub data_scope: DataScope,
}

impl PagePermission {
    /// A grant with every capability and `all` scope.
    pub fn full(page_id: PageId) -> Self {
        Self {
            page_id,
            can_view: true,
            can_edit: true,
            can_assign: true,
            data_scope: DataScope::All,
        }
    }

    /// Binds the entry to a role.
    pub fn for_role(&self, role_id: RoleId) -> RolePermission {
        RolePermission {
            role_id,
            page_id: self.page_id,
            can_view: self.can_view,
            can_edit: self.can_edit,
            can_assign: self.can_assign,
            data_scope: self.data_scope,
        }
    }

    /// De-duplicates entries by page (the last entry for a page wins) and binds
    /// them to `role_id`, ordered by page id.
    pub fn normalize(role_id: RoleId, entries: &[PagePermission]) -> Vec<RolePermission> {
        let mut by_page: BTreeMap<PageId, RolePermission> = BTreeMap::new();
        for entry in entries {
            by_page.insert(entry.page_id, entry.for_role(role_id));
        }
        by_page.into_values().collect()
    }
}

impl From<RolePermission> for PagePermission {
    fn from(row: RolePermission) -> Self {
        Self {
            page_id: row.page_id,
            can_view: row.can_view,
            can_edit: row.can_edit,
            can_assign: row.can_assign,
            data_scope: row.data_scope,
        }
    }
}

/// A role's complete permission table with its version token.
///
/// `version` starts at `0` and advances by one on every committed replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    /// Owning role.
    pub role_id: RoleId,
    /// Optimistic-concurrency token.
    pub version: i64,
    /// Rows ordered by page id, one per page.
    pub entries: Vec<RolePermission>,
}

impl PermissionSet {
    /// An empty set at version `0`.
    pub fn empty(role_id: RoleId) -> Self {
        Self {
            role_id,
            version: 0,
            entries: Vec::new(),
        }
    }

    /// The row for `page_id`, if configured.
    pub fn entry_for(&self, page_id: PageId) -> Option<&RolePermission> {
        self.entries
            .binary_search_by_key(&page_id, |e| e.page_id)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Whether nothing is configured for the role.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
