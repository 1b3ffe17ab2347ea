//! Test Data Builders
//!
//! Builders let tests state only the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::UserId;
use domain_identity::{IdentityError, IdentityRecord, Principal, Role};

/// Builder for identity records
pub struct IdentityRecordBuilder {
    id: UserId,
    username: String,
    email: String,
    roles: Vec<Role>,
    is_active: bool,
    updated_at: DateTime<Utc>,
}

impl Default for IdentityRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityRecordBuilder {
    /// Creates a builder for an active customer
    pub fn new() -> Self {
        Self {
            id: UserId::new_v7(),
            username: "test.user".to_string(),
            email: "test.user@example.co.th".to_string(),
            roles: vec![Role::Customer],
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    /// Sets the id
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    /// Sets the username
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Replaces the roles
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Marks the record deactivated
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Builds the record
    pub fn build(self) -> IdentityRecord {
        IdentityRecord {
            id: self.id,
            username: self.username,
            email: self.email,
            roles: self.roles,
            is_active: self.is_active,
            updated_at: self.updated_at,
        }
    }

    /// Builds a principal from the same data
    pub fn build_principal(self) -> Result<Principal, IdentityError> {
        Principal::from_record(&self.build())
    }
}
