use std::str::FromStr;

use curatia_core::{AppError, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Kind of agent an access grant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// A single user identified by its user key.
    User,
    /// A named group of users.
    Group,
}

impl AgentType {
    /// Returns a stable storage value for this agent type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl FromStr for AgentType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            _ => Err(AppError::Validation(format!(
                "unknown agent type '{value}'"
            ))),
        }
    }
}

/// Level of access an access grant confers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Full edit rights over deposited items.
    Manage,
    /// Right to deposit new items.
    Deposit,
    /// Read-only access to deposited items.
    View,
}

impl AccessLevel {
    /// Returns a stable storage value for this access level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manage => "manage",
            Self::Deposit => "deposit",
            Self::View => "view",
        }
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manage" => Ok(Self::Manage),
            "deposit" => Ok(Self::Deposit),
            "view" => Ok(Self::View),
            _ => Err(AppError::Validation(format!(
                "unknown access level '{value}'"
            ))),
        }
    }
}

/// One discrete access grant owned by a permission template.
///
/// Grants are immutable value objects; callers replace them instead of
/// editing them in place. Duplicates are allowed at storage and collapsed
/// when the template aggregates them into effective access lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Kind of agent granted access.
    pub agent_type: AgentType,
    /// Opaque agent identifier (user key or group name).
    pub agent_id: NonEmptyString,
    /// Level of access conferred.
    pub access: AccessLevel,
}

impl AccessGrant {
    /// Creates a grant from its three mandatory fields.
    pub fn new(
        agent_type: AgentType,
        agent_id: impl Into<String>,
        access: AccessLevel,
    ) -> curatia_core::AppResult<Self> {
        Ok(Self {
            agent_type,
            agent_id: NonEmptyString::new(agent_id)?,
            access,
        })
    }
}

/// Visibility of a container or of items deposited into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Readable by anyone.
    Public,
    /// Readable by any signed-in user.
    Authenticated,
    /// Readable only by explicitly granted agents.
    Restricted,
}

/// Reserved pseudo-group identifiers stripped from aggregated read groups.
///
/// These markers stand for "everyone" and "all registered users". They are
/// never carried as ordinary grants; access propagation may re-introduce at
/// most one of them from the target container's own visibility.
pub const RESERVED_READ_GROUPS: [&str; 2] = ["public", "authenticated"];

impl Visibility {
    /// Returns a stable storage value for this visibility.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Authenticated => "authenticated",
            Self::Restricted => "restricted",
        }
    }

    /// Returns the reserved read-group marker equivalent to this
    /// visibility, if one exists.
    #[must_use]
    pub fn group_marker(&self) -> Option<&'static str> {
        match self {
            Self::Public => Some("public"),
            Self::Authenticated => Some("authenticated"),
            Self::Restricted => None,
        }
    }
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "public" => Ok(Self::Public),
            "authenticated" => Ok(Self::Authenticated),
            "restricted" => Ok(Self::Restricted),
            _ => Err(AppError::Validation(format!(
                "unknown visibility '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AccessLevel, AgentType, RESERVED_READ_GROUPS, Visibility};

    #[test]
    fn agent_type_roundtrip_storage_value() {
        let restored = AgentType::from_str(AgentType::Group.as_str());
        assert!(restored.is_ok());
        assert_eq!(restored.unwrap_or(AgentType::User), AgentType::Group);
    }

    #[test]
    fn unknown_access_level_is_rejected() {
        assert!(AccessLevel::from_str("owner").is_err());
    }

    #[test]
    fn group_markers_match_reserved_read_groups() {
        assert_eq!(Visibility::Public.group_marker(), Some("public"));
        assert_eq!(Visibility::Authenticated.group_marker(), Some("authenticated"));
        assert_eq!(Visibility::Restricted.group_marker(), None);
        for marker in [Visibility::Public, Visibility::Authenticated]
            .iter()
            .filter_map(Visibility::group_marker)
        {
            assert!(RESERVED_READ_GROUPS.contains(&marker));
        }
    }
}
