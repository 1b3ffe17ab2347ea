//! Custom Test Assertions
//!
//! Assertion helpers that explain *what* differed when they fail.

use core_kernel::{ReferenceKind, ReferenceNumberGenerator};
use domain_identity::{IdentityRecord, Principal};

/// Asserts that a principal carries exactly the record's identity and roles
///
/// # Panics
///
/// Panics naming the first field that differs
pub fn assert_principal_matches_record(principal: &Principal, record: &IdentityRecord) {
    assert_eq!(principal.id(), record.id, "Principal id differs from record");
    assert_eq!(principal.username(), record.username, "Principal username differs from record");
    assert_eq!(principal.email(), record.email, "Principal email differs from record");

    let mut expected: Vec<_> = record.roles.clone();
    expected.sort();
    expected.dedup();
    let actual: Vec<_> = principal.roles().iter().copied().collect();
    assert_eq!(actual, expected, "Principal roles differ from record");
}

/// Asserts that `reference` is well-formed for `kind` and returns its sequence
///
/// # Panics
///
/// Panics if the reference does not match the kind's format
pub fn assert_reference_format(kind: ReferenceKind, reference: &str) -> u64 {
    assert!(
        ReferenceNumberGenerator::validate_format(kind, reference),
        "Expected a {:?} reference, got {:?}",
        kind,
        reference
    );
    reference[13..]
        .parse()
        .unwrap_or_else(|_| panic!("Sequence segment of {:?} is not numeric", reference))
}
