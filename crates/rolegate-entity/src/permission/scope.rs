//! Data-visibility scope tiers.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How much of a page's underlying data a grant exposes.
///
/// Ranked `All > Subordinates > Own`; when several grants apply, the widest wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "data_scope", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DataScope {
    /// The actor's own records only.
    #[default]
    #[serde(rename = "self")]
    #[sqlx(rename = "self")]
    Own,
    /// Own records plus those of employees the actor manages.
    Subordinates,
    /// Every record.
    All,
}

impl DataScope {
    /// Ordinal used for most-permissive merging.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Own => 0,
            Self::Subordinates => 1,
            Self::All => 2,
        }
    }

    /// The wider of two scopes.
    pub fn widest(self, other: Self) -> Self {
        if other.rank() > self.rank() { other } else { self }
    }

    /// Return the scope as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Own => "self",
            Self::Subordinates => "subordinates",
            Self::All => "all",
        }
    }
}

impl PartialOrd for DataScope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DataScope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataScope {
    type Err = rolegate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self" | "own" => Ok(Self::Own),
            "subordinates" => Ok(Self::Subordinates),
            "all" => Ok(Self::All),
            _ => Err(rolegate_core::AppError::validation(format!(
                "Invalid data scope: '{s}'. Expected one of: self, subordinates, all"
            ))),
        }
    }
}
