//! Request context carrying the acting user and the roles they hold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_core::types::{RoleId, UserId};

/// Context for the current authenticated request.
///
/// Built by the identity layer and passed into service methods so that
/// every operation knows *who* is acting and through *which* roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Roles assigned to the user.
    pub role_ids: Vec<RoleId>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role_ids: Vec<RoleId>) -> Self {
        Self {
            user_id,
            role_ids,
            request_time: Utc::now(),
        }
    }
}
