//! Identity Domain Ports
//!
//! The identity store is an external collaborator: a user table, a directory
//! service, or an in-memory fixture in tests. [`IdentityStore`] is the port
//! the resolver depends on; adapters implement it.
//!
//! ```rust,ignore
//! use domain_identity::{PrincipalResolver, IdentityStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn IdentityStore> = Arc::new(PostgresIdentityStore::new(pool));
//! let resolver = PrincipalResolver::new(store);
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, UserId};

use crate::principal::IdentityRecord;

/// Read access to stored identities
///
/// Implementations must read through to the backing store on every call:
/// the active flag is re-checked per request and must never be served from
/// a cache that outlives a deactivation.
#[async_trait]
pub trait IdentityStore: DomainPort + HealthCheckable {
    /// Finds an identity by username or email address
    ///
    /// # Returns
    ///
    /// The matching record, or `PortError::NotFound`
    async fn find_by_login(&self, username_or_email: &str) -> Result<IdentityRecord, PortError>;

    /// Finds an identity by id
    ///
    /// # Returns
    ///
    /// The matching record, or `PortError::NotFound`
    async fn find_by_id(&self, id: UserId) -> Result<IdentityRecord, PortError>;
}

/// In-memory identity store for tests and local development
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory mock implementation of IdentityStore
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryIdentityStore {
        records: Arc<RwLock<HashMap<UserId, IdentityRecord>>>,
    }

    impl InMemoryIdentityStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with records for testing
        pub async fn with_records(records: Vec<IdentityRecord>) -> Self {
            let store = Self::new();
            for record in records {
                store.insert(record).await;
            }
            store
        }

        /// Inserts or replaces a record
        pub async fn insert(&self, record: IdentityRecord) {
            self.records.write().await.insert(record.id, record);
        }

        /// Flips the active flag, as an administrator deactivating an account would
        pub async fn set_active(&self, id: UserId, active: bool) -> Result<(), PortError> {
            let mut records = self.records.write().await;
            let record = records
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Identity", id))?;
            record.is_active = active;
            record.updated_at = Utc::now();
            Ok(())
        }

        /// Removes a record
        pub async fn remove(&self, id: UserId) -> Option<IdentityRecord> {
            self.records.write().await.remove(&id)
        }
    }

    impl DomainPort for InMemoryIdentityStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryIdentityStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-identity-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl IdentityStore for InMemoryIdentityStore {
        async fn find_by_login(&self, username_or_email: &str) -> Result<IdentityRecord, PortError> {
            let records = self.records.read().await;
            // Exact username matches win over email matches
            records
                .values()
                .find(|r| r.username == username_or_email)
                .or_else(|| records.values().find(|r| r.matches_login(username_or_email)))
                .cloned()
                .ok_or_else(|| PortError::not_found("Identity", username_or_email))
        }

        async fn find_by_id(&self, id: UserId) -> Result<IdentityRecord, PortError> {
            self.records
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Identity", id))
        }
    }
}
