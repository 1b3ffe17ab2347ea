//! Property-Based Test Generators
//!
//! Provides proptest strategies for identity data that satisfies (or
//! deliberately violates) the validators' rules.

use domain_identity::Role;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Mod-11 check digit, computed independently of the validator under test
fn check_digit(first_twelve: &[u8]) -> u8 {
    let sum: u32 = first_twelve
        .iter()
        .zip((2..=13u32).rev())
        .map(|(d, w)| u32::from(*d) * w)
        .sum();
    match sum % 11 {
        0 => 1,
        1 => 0,
        r => (11 - r) as u8,
    }
}

fn to_digits(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

/// Strategy for the first 12 digits of a national ID
pub fn national_id_body_strategy() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..10, 12)
}

/// Strategy for checksum-valid national IDs
pub fn national_id_strategy() -> impl Strategy<Value = String> {
    national_id_body_strategy().prop_map(|mut body| {
        let check = check_digit(&body);
        body.push(check);
        to_digits(&body)
    })
}

/// Strategy for a valid national ID paired with a wrong check digit
pub fn national_id_with_wrong_check_digit_strategy() -> impl Strategy<Value = (String, String)> {
    (national_id_strategy(), 1u8..10).prop_map(|(valid, offset)| {
        let check = valid.as_bytes()[12] - b'0';
        let wrong = (check + offset) % 10;
        let invalid = format!("{}{}", &valid[..12], wrong);
        (valid, invalid)
    })
}

/// Strategy for valid 10-digit mobile numbers
pub fn phone_strategy() -> impl Strategy<Value = String> {
    (prop_oneof![Just("06"), Just("07"), Just("08"), Just("09")], 0u32..100_000_000)
        .prop_map(|(prefix, rest)| format!("{}{:08}", prefix, rest))
}

/// Strategy for well-formed postal codes
pub fn postal_code_strategy() -> impl Strategy<Value = String> {
    (10_000u32..=99_999).prop_map(|n| n.to_string())
}

/// Strategy for valid license plates: Thai consonants, digits, one space
pub fn license_plate_strategy() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec(prop::char::range('ก', 'ฮ'), 1..=3),
        1u32..10_000,
    )
        .prop_map(|(letters, number)| format!("{} {}", letters.into_iter().collect::<String>(), number))
}

/// Strategy for any role
pub fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

/// Strategy for non-empty role sets
pub fn role_set_strategy() -> impl Strategy<Value = BTreeSet<Role>> {
    proptest::collection::btree_set(role_strategy(), 1..=4)
}

/// Strategy for plausible usernames
pub fn username_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._]{2,15}"
}
