//! Roles, account status, and the role score table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mod,
    Registered,
}

/// Indexed by `Role as usize`, in declaration order.
const ROLE_SCORES: [u8; 3] = [15, 14, 13];

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Mod, Role::Registered];

    pub const fn score(self) -> u8 {
        ROLE_SCORES[self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Mod => "mod",
            Role::Registered => "registered",
        }
    }
}

/// Score for a role name as it appears on the wire. Unknown names score
/// zero and therefore never satisfy any defined role.
pub fn score_of(name: &str) -> u8 {
    name.parse::<Role>().map(Role::score).unwrap_or(0)
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "mod" => Ok(Role::Mod),
            "registered" => Ok(Role::Registered),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A `Passive` account cannot authenticate, even with a well-formed token.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Passive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Passive => "passive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores() {
        assert_eq!(Role::Admin.score(), 15);
        assert_eq!(Role::Mod.score(), 14);
        assert_eq!(Role::Registered.score(), 13);
    }

    #[test]
    fn test_score_of_unknown_is_zero() {
        assert_eq!(score_of("mod"), 14);
        assert_eq!(score_of("superuser"), 0);
        assert_eq!(score_of("Admin"), 0);
        assert_eq!(score_of(""), 0);
    }

    #[test]
    fn test_role_round_trips_through_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::Mod).unwrap(), "\"mod\"");
        assert_eq!(
            serde_json::from_str::<Status>("\"passive\"").unwrap(),
            Status::Passive
        );
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }
}
