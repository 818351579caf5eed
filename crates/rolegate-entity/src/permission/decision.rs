//! Effective access decision produced by merging a user's role grants.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::RolePermission;
use super::scope::DataScope;

/// The merged capability set and data scope for one user on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessDecision {
    /// May open the page.
    pub can_view: bool,
    /// May modify the page's records.
    pub can_edit: bool,
    /// May assign the page's records to others.
    pub can_assign: bool,
    /// Widest data scope among the contributing grants.
    pub data_scope: DataScope,
}

impl AccessDecision {
    /// The deny-all decision returned when no grant applies.
    pub fn deny() -> Self {
        Self::default()
    }

    /// Merges grants most-permissively.
    ///
    /// Flags are OR-ed, the scope is the maximum rank, and view is forced on
    /// whenever edit or assign is granted. An empty iterator yields [`deny`](Self::deny).
    pub fn merge<'a, I>(grants: I) -> Self
    where
        I: IntoIterator<Item = &'a RolePermission>,
    {
        let mut decision = grants
            .into_iter()
            .fold(Self::deny(), |acc, grant| Self {
                can_view: acc.can_view || grant.can_view,
                can_edit: acc.can_edit || grant.can_edit,
                can_assign: acc.can_assign || grant.can_assign,
                data_scope: acc.data_scope.widest(grant.data_scope),
            });
        if decision.can_edit || decision.can_assign {
            decision.can_view = true;
        }
        decision
    }

    /// Whether the page may be rendered at all.
    pub fn is_visible(&self) -> bool {
        self.can_view || self.can_edit || self.can_assign
    }

    /// Whether the decision grants `capability`.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.is_visible(),
            Capability::Edit => self.can_edit,
            Capability::Assign => self.can_assign,
        }
    }
}

/// One of the three capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// View the page.
    View,
    /// Edit the page's records.
    Edit,
    /// Assign the page's records.
    Assign,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Edit => write!(f, "edit"),
            Self::Assign => write!(f, "assign"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_core::types::{PageId, RoleId};

    fn grant(view: bool, edit: bool, assign: bool, scope: DataScope) -> RolePermission {
        RolePermission {
            role_id: RoleId::new(),
            page_id: PageId(1),
            can_view: view,
            can_edit: edit,
            can_assign: assign,
            data_scope: scope,
        }
    }

    #[test]
    fn test_empty_merge_is_deny() {
        let decision = AccessDecision::merge(std::iter::empty());
        assert_eq!(decision, AccessDecision::deny());
        assert_eq!(decision.data_scope, DataScope::Own);
        assert!(!decision.is_visible());
    }

    #[test]
    fn test_most_permissive_wins() {
        let restrictive = grant(true, false, false, DataScope::Own);
        let permissive = grant(false, true, false, DataScope::All);
        let decision = AccessDecision::merge([&restrictive, &permissive]);
        assert!(decision.can_edit);
        assert!(!decision.can_assign);
        assert_eq!(decision.data_scope, DataScope::All);
    }

    #[test]
    fn test_edit_or_assign_forces_view() {
        let edit_only = grant(false, true, false, DataScope::Own);
        assert!(AccessDecision::merge([&edit_only]).can_view);

        let assign_only = grant(false, false, true, DataScope::Own);
        assert!(AccessDecision::merge([&assign_only]).can_view);

        let nothing = grant(false, false, false, DataScope::All);
        let decision = AccessDecision::merge([&nothing]);
        assert!(!decision.can_view);
        assert_eq!(decision.data_scope, DataScope::All);
    }

    #[test]
    fn test_allows_capability() {
        let decision = AccessDecision::merge([&grant(false, false, true, DataScope::Own)]);
        assert!(decision.allows(Capability::View));
        assert!(decision.allows(Capability::Assign));
        assert!(!decision.allows(Capability::Edit));
    }
}
