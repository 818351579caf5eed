//! Cache key builders for all Rolegate cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use rolegate_core::types::RoleId;

/// Prefix applied to all Rolegate cache keys.
const PREFIX: &str = "rolegate";

// ── Role keys ──────────────────────────────────────────────

/// Cache key for a role entity by ID.
pub fn role_by_id(role_id: RoleId) -> String {
    format!("{PREFIX}:role:{role_id}")
}

/// Cache key for the full permission set of a role.
pub fn role_permissions(role_id: RoleId) -> String {
    format!("{PREFIX}:perm:{role_id}")
}

/// Every key derived from one role.
pub fn role_keys(role_id: RoleId) -> [String; 2] {
    [role_by_id(role_id), role_permissions(role_id)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nil_role() -> RoleId {
        "00000000-0000-0000-0000-000000000000"
            .parse()
            .expect("nil uuid parses")
    }

    #[test]
    fn test_role_keys() {
        let id = nil_role();
        assert_eq!(
            role_by_id(id),
            "rolegate:role:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            role_permissions(id),
            "rolegate:perm:00000000-0000-0000-0000-000000000000"
        );
    }
}
