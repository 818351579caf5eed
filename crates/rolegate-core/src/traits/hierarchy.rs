//! Organizational hierarchy collaborator.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::UserId;

/// Answers "does this user manage that user?".
///
/// Provided by the organizational/employee subsystem; the permission engine
/// only consumes it, and only when evaluating `subordinates` data scope.
/// Implementations may block on network I/O; callers wrap every call in a
/// timeout and treat errors as a deny.
#[async_trait]
pub trait HierarchyLookup: Send + Sync + 'static {
    /// Returns `true` if `manager_id` manages `employee_id` (directly or transitively,
    /// as defined by the provider).
    async fn is_manager_of(&self, manager_id: UserId, employee_id: UserId) -> AppResult<bool>;
}
