//! Principal resolution
//!
//! Turns a stored identity into the [`Principal`] bound to a request. Every
//! call goes back to the identity store: tokens do not carry the active flag,
//! so a deactivated account is refused on its very next request even while
//! it still holds an unexpired token.

use std::sync::Arc;

use tracing::{debug, warn};

use core_kernel::{PortError, UserId};

use crate::error::IdentityError;
use crate::ports::IdentityStore;
use crate::principal::{IdentityRecord, Principal};

/// Resolves logins and ids into principals
#[derive(Clone)]
pub struct PrincipalResolver {
    store: Arc<dyn IdentityStore>,
}

impl PrincipalResolver {
    /// Creates a resolver backed by `store`
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Resolves a username or email address into an active principal
    ///
    /// # Errors
    ///
    /// * `IdentityError::NotFound` - no identity matches
    /// * `IdentityError::Deactivated` - the identity's active flag is false
    /// * `IdentityError::InvalidRecord` - the record has no roles
    /// * `IdentityError::Store` - the store failed
    pub async fn resolve(&self, username_or_email: &str) -> Result<Principal, IdentityError> {
        let login = username_or_email.trim();
        if login.is_empty() {
            return Err(IdentityError::not_found("<empty login>"));
        }

        let record = self
            .store
            .find_by_login(login)
            .await
            .map_err(|e| Self::lookup_failed(e, login))?;

        Self::into_principal(record, login)
    }

    /// Resolves an identity id into an active principal
    ///
    /// Fails the same way as [`PrincipalResolver::resolve`].
    pub async fn resolve_by_id(&self, id: UserId) -> Result<Principal, IdentityError> {
        let key = id.to_string();
        let record = self
            .store
            .find_by_id(id)
            .await
            .map_err(|e| Self::lookup_failed(e, &key))?;

        Self::into_principal(record, &key)
    }

    fn into_principal(record: IdentityRecord, key: &str) -> Result<Principal, IdentityError> {
        if !record.is_active {
            warn!(lookup = %key, user_id = %record.id, "Rejected deactivated identity");
            return Err(IdentityError::Deactivated(record.username));
        }

        let principal = Principal::from_record(&record).map_err(|e| {
            warn!(lookup = %key, error = %e, "Stored identity cannot form a principal");
            e
        })?;

        debug!(
            user_id = %principal.id(),
            roles = ?principal.role_names(),
            "Resolved principal"
        );
        Ok(principal)
    }

    fn lookup_failed(error: PortError, key: &str) -> IdentityError {
        if error.is_not_found() {
            warn!(lookup = %key, "Identity not found");
            IdentityError::not_found(key)
        } else {
            warn!(lookup = %key, error = %error, "Identity store lookup failed");
            IdentityError::Store(error)
        }
    }
}

impl std::fmt::Debug for PrincipalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalResolver").finish_non_exhaustive()
    }
}
