//! Tests for the UserId identifier

use core_kernel::UserId;
use uuid::Uuid;

#[test]
fn test_new_generates_unique_ids() {
    let id1 = UserId::new();
    let id2 = UserId::new();
    assert_ne!(id1, id2);
}

#[test]
fn test_new_v7_generates_time_ordered_ids() {
    let id1 = UserId::new_v7();
    std::thread::sleep(std::time::Duration::from_millis(1));
    let id2 = UserId::new_v7();
    assert!(id1 < id2);
}

#[test]
fn test_prefix() {
    assert_eq!(UserId::prefix(), "USR");
}

#[test]
fn test_from_str_with_and_without_prefix() {
    let original = UserId::new();

    let prefixed: UserId = original.to_string().parse().unwrap();
    let bare: UserId = original.as_uuid().to_string().parse().unwrap();

    assert_eq!(original, prefixed);
    assert_eq!(original, bare);
}

#[test]
fn test_from_str_rejects_garbage() {
    assert!("USR-not-a-uuid".parse::<UserId>().is_err());
    assert!("".parse::<UserId>().is_err());
}

#[test]
fn test_json_serialization_is_bare_uuid() {
    let uuid = Uuid::new_v4();
    let id = UserId::from_uuid(uuid);
    let json = serde_json::to_string(&id).unwrap();

    assert_eq!(json, format!("\"{}\"", uuid));
    let back: UserId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}
