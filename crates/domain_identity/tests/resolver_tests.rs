//! Tests for PrincipalResolver against the in-memory identity store

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_identity::{
    IdentityError, IdentityRecord, IdentityStore, InMemoryIdentityStore, PrincipalResolver, Role,
};
use test_utils::{assert_principal_matches_record, IdentityFixtures, IdentityRecordBuilder};

async fn resolver_with(records: Vec<IdentityRecord>) -> (PrincipalResolver, InMemoryIdentityStore) {
    let store = InMemoryIdentityStore::with_records(records).await;
    (PrincipalResolver::new(Arc::new(store.clone())), store)
}

#[tokio::test]
async fn test_resolve_by_username_and_email() {
    let record = IdentityFixtures::underwriter();
    let (resolver, _) = resolver_with(vec![record.clone()]).await;

    let by_username = resolver.resolve("malee.s").await.unwrap();
    assert_principal_matches_record(&by_username, &record);

    let by_email = resolver.resolve("malee.s@example.co.th").await.unwrap();
    assert_eq!(by_email, by_username);
    assert!(by_email.is_active());
}

#[tokio::test]
async fn test_resolve_by_id() {
    let record = IdentityFixtures::claims_officer();
    let (resolver, _) = resolver_with(vec![record.clone()]).await;

    let principal = resolver.resolve_by_id(record.id).await.unwrap();
    assert_principal_matches_record(&principal, &record);
    assert!(principal.has_role(Role::ClaimsOfficer));
}

#[tokio::test]
async fn test_unknown_identity_is_not_found() {
    let (resolver, _) = resolver_with(vec![IdentityFixtures::underwriter()]).await;

    assert!(matches!(resolver.resolve("nobody").await, Err(IdentityError::NotFound(_))));
    assert!(matches!(resolver.resolve("   ").await, Err(IdentityError::NotFound(_))));
    assert!(matches!(
        resolver.resolve_by_id(UserId::new()).await,
        Err(IdentityError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_deactivated_identity_is_rejected() {
    let record = IdentityFixtures::deactivated_customer();
    let (resolver, _) = resolver_with(vec![record.clone()]).await;

    let err = resolver.resolve("former.customer").await.unwrap_err();
    assert!(matches!(err, IdentityError::Deactivated(_)));
    assert!(err.is_rejection());
    assert!(matches!(
        resolver.resolve_by_id(record.id).await,
        Err(IdentityError::Deactivated(_))
    ));
}

#[tokio::test]
async fn test_deactivation_takes_effect_on_next_call() {
    let record = IdentityRecordBuilder::new()
        .with_username("agent.nid")
        .with_roles([Role::Agent])
        .build();
    let (resolver, store) = resolver_with(vec![record.clone()]).await;

    assert!(resolver.resolve_by_id(record.id).await.is_ok());

    store.set_active(record.id, false).await.unwrap();
    assert!(matches!(
        resolver.resolve_by_id(record.id).await,
        Err(IdentityError::Deactivated(_))
    ));

    store.set_active(record.id, true).await.unwrap();
    assert!(resolver.resolve_by_id(record.id).await.is_ok());
}

#[tokio::test]
async fn test_roleless_record_is_invalid() {
    let (resolver, _) = resolver_with(vec![IdentityFixtures::roleless()]).await;

    assert!(matches!(
        resolver.resolve("ghost").await,
        Err(IdentityError::InvalidRecord(_))
    ));
}

/// Store that always fails, to check infrastructure errors are kept distinct
struct UnavailableStore;

impl DomainPort for UnavailableStore {}

#[async_trait]
impl HealthCheckable for UnavailableStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "unavailable".to_string(),
            status: AdapterHealth::Unhealthy,
            latency_ms: 0,
            message: None,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl IdentityStore for UnavailableStore {
    async fn find_by_login(&self, _username_or_email: &str) -> Result<IdentityRecord, PortError> {
        Err(PortError::ServiceUnavailable { service: "directory".to_string() })
    }

    async fn find_by_id(&self, _id: UserId) -> Result<IdentityRecord, PortError> {
        Err(PortError::connection("refused"))
    }
}

#[tokio::test]
async fn test_store_failure_is_not_a_rejection() {
    let resolver = PrincipalResolver::new(Arc::new(UnavailableStore));

    let err = resolver.resolve("malee.s").await.unwrap_err();
    assert!(matches!(err, IdentityError::Store(_)));
    assert!(!err.is_rejection());

    assert!(matches!(
        resolver.resolve_by_id(UserId::new()).await,
        Err(IdentityError::Store(_))
    ));
}
