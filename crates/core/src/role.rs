//! Team roles and permission predicates.
//!
//! The display strings double as the wire values — the frontend renders
//! them verbatim.

use serde::{Deserialize, Serialize};

/// Role of a member within a team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum TeamRole {
    #[serde(rename = "Account Owner")]
    AccountOwner,
    #[serde(rename = "Account Manager")]
    AccountManager,
    #[serde(rename = "Project Owner")]
    ProjectOwner,
    #[serde(rename = "Team Member")]
    TeamMember,
}

impl TeamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountOwner => "Account Owner",
            Self::AccountManager => "Account Manager",
            Self::ProjectOwner => "Project Owner",
            Self::TeamMember => "Team Member",
        }
    }

    /// Account Owner / Account Manager — may use the manager god-view and
    /// administer team membership.
    pub fn is_account_admin(&self) -> bool {
        matches!(self, Self::AccountOwner | Self::AccountManager)
    }

    /// Roles allowed to create and update projects and objectives.
    pub fn can_manage_projects(&self) -> bool {
        matches!(
            self,
            Self::AccountOwner | Self::AccountManager | Self::ProjectOwner
        )
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeamRole {
    type Err = crate::journey::UnknownJourneyValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Account Owner" => Ok(Self::AccountOwner),
            "Account Manager" => Ok(Self::AccountManager),
            "Project Owner" => Ok(Self::ProjectOwner),
            "Team Member" => Ok(Self::TeamMember),
            other => Err(crate::journey::UnknownJourneyValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_matrix() {
        assert!(TeamRole::AccountOwner.is_account_admin());
        assert!(TeamRole::AccountManager.is_account_admin());
        assert!(!TeamRole::ProjectOwner.is_account_admin());
        assert!(!TeamRole::TeamMember.is_account_admin());

        assert!(TeamRole::ProjectOwner.can_manage_projects());
        assert!(!TeamRole::TeamMember.can_manage_projects());
    }

    #[test]
    fn wire_strings_round_trip() {
        for role in [
            TeamRole::AccountOwner,
            TeamRole::AccountManager,
            TeamRole::ProjectOwner,
            TeamRole::TeamMember,
        ] {
            assert_eq!(role.as_str().parse::<TeamRole>().unwrap(), role);
        }
        assert!("owner".parse::<TeamRole>().is_err());
    }
}
