//! Principals, roles and stored identity records

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

use crate::error::IdentityError;

/// Back-office role
///
/// Role names travel inside tokens as plain strings (`"CLAIMS_OFFICER"`),
/// so the string form is part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Underwriter,
    ClaimsOfficer,
    Agent,
    Accountant,
    Customer,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Manager,
        Role::Underwriter,
        Role::ClaimsOfficer,
        Role::Agent,
        Role::Accountant,
        Role::Customer,
    ];

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Underwriter => "UNDERWRITER",
            Role::ClaimsOfficer => "CLAIMS_OFFICER",
            Role::Agent => "AGENT",
            Role::Accountant => "ACCOUNTANT",
            Role::Customer => "CUSTOMER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// An identity as held by the identity store
///
/// Credentials are verified elsewhere; this record only carries what is
/// needed to build a [`Principal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Creates an active record with the given roles
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            id: UserId::new_v7(),
            username: username.into(),
            email: email.into(),
            roles: roles.into_iter().collect(),
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    /// Returns true if `login` names this record by username or email
    ///
    /// Usernames compare exactly; email addresses compare case-insensitively.
    pub fn matches_login(&self, login: &str) -> bool {
        self.username == login || self.email.eq_ignore_ascii_case(login)
    }
}

/// The authenticated identity and role set bound to one request
///
/// Fields are private: a principal cannot be altered once built. The role set
/// is never empty and holds each role at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    id: UserId,
    username: String,
    email: String,
    roles: BTreeSet<Role>,
    active: bool,
}

impl Principal {
    /// Builds a principal, rejecting an empty username or role set
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
        active: bool,
    ) -> Result<Self, IdentityError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(IdentityError::invalid_record(format!("{} has an empty username", id)));
        }

        let roles: BTreeSet<Role> = roles.into_iter().collect();
        if roles.is_empty() {
            return Err(IdentityError::invalid_record(format!("{} has no roles", username)));
        }

        Ok(Self {
            id,
            username,
            email: email.into(),
            roles,
            active,
        })
    }

    /// Builds a principal from a stored record
    pub fn from_record(record: &IdentityRecord) -> Result<Self, IdentityError> {
        Self::new(
            record.id,
            record.username.clone(),
            record.email.clone(),
            record.roles.iter().copied(),
            record.is_active,
        )
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Role names in their wire form, in a stable order
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }

    /// Checks if the principal holds `required`; admins hold every role
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.contains(&required) || self.roles.contains(&Role::Admin)
    }

    /// Checks if the principal holds any of `required`
    pub fn has_any_role(&self, required: &[Role]) -> bool {
        required.iter().any(|r| self.has_role(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_wire_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.as_str())
            );
        }
        assert!("claims_officer".parse::<Role>().is_err());
    }

    #[test]
    fn test_principal_deduplicates_roles() {
        let principal = Principal::new(
            UserId::new(),
            "somchai",
            "somchai@example.co.th",
            [Role::Agent, Role::Agent, Role::Underwriter],
            true,
        )
        .unwrap();

        assert_eq!(principal.roles().len(), 2);
        assert_eq!(principal.role_names(), vec!["UNDERWRITER", "AGENT"]);
    }

    #[test]
    fn test_principal_requires_roles() {
        let result = Principal::new(UserId::new(), "somchai", "s@example.co.th", [], true);
        assert!(matches!(result, Err(IdentityError::InvalidRecord(_))));
    }

    #[test]
    fn test_admin_has_every_role() {
        let admin = Principal::new(UserId::new(), "root", "root@example.co.th", [Role::Admin], true).unwrap();
        assert!(admin.has_role(Role::ClaimsOfficer));

        let agent = Principal::new(UserId::new(), "a", "a@example.co.th", [Role::Agent], true).unwrap();
        assert!(!agent.has_role(Role::ClaimsOfficer));
        assert!(agent.has_any_role(&[Role::ClaimsOfficer, Role::Agent]));
    }

    #[test]
    fn test_matches_login() {
        let record = IdentityRecord::new("somchai", "Somchai@Example.co.th", [Role::Customer]);
        assert!(record.matches_login("somchai"));
        assert!(record.matches_login("somchai@example.co.th"));
        assert!(!record.matches_login("SOMCHAI"));
    }
}
