//! Department entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rolegate_core::config::DepartmentConfig;
use rolegate_core::types::DepartmentId;

/// A grouping label for pages. Has no effect on resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Department {
    /// Department identifier (> 0).
    pub id: DepartmentId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl From<&DepartmentConfig> for Department {
    fn from(config: &DepartmentConfig) -> Self {
        Self {
            id: DepartmentId(config.id),
            name: config.name.clone(),
            description: config.description.clone(),
        }
    }
}
