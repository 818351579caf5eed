//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_core::types::RoleId;

/// Maximum length of a role name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a role description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A named bundle of page permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// `false` marks the role retired; its grants no longer apply.
    pub is_active: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Builds a new active role from a validated creation request.
    pub fn from_request(req: CreateRole) -> Self {
        let now = Utc::now();
        Self {
            id: RoleId::new(),
            name: req.name,
            description: req.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `other` collides with this role's name (case-insensitive).
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }

    /// Applies a validated patch in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: &UpdateRole) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    /// Role name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateRole {
    /// Trims and validates the request.
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            description: self.description.map(|d| validate_description(&d)).transpose()?,
        })
    }
}

/// Partial update for a role. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRole {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateRole {
    /// Trims and validates the patch.
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            name: self.name.map(|n| validate_name(&n)).transpose()?,
            description: self.description.map(|d| validate_description(&d)).transpose()?,
            is_active: self.is_active,
        })
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Role name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Role name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: &str) -> AppResult<String> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation(format!(
            "Role description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(description.to_string())
}
