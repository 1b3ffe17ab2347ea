//! Pre-built Test Fixtures
//!
//! Ready-to-use identity data. Values are fixed so failures are reproducible.

use core_kernel::UserId;
use domain_identity::{IdentityRecord, Principal, Role};
use uuid::Uuid;

/// Fixture for Thai identity data
pub struct IdentityDataFixtures;

impl IdentityDataFixtures {
    /// A national ID with a correct check digit
    pub fn valid_national_id() -> &'static str {
        "1101700207366"
    }

    /// The same ID with only the check digit altered
    pub fn bad_checksum_national_id() -> &'static str {
        "1101700207365"
    }

    /// A valid mobile number
    pub fn mobile_phone() -> &'static str {
        "0812345678"
    }

    /// A landline number, rejected by the mobile validator
    pub fn landline_phone() -> &'static str {
        "0221234567"
    }

    /// A Bangkok postal code
    pub fn bangkok_postal_code() -> &'static str {
        "10110"
    }

    /// A well-formed postal code whose prefix maps to no province
    pub fn unmapped_postal_code() -> &'static str {
        "99000"
    }

    /// A Thai-script license plate
    pub fn thai_plate() -> &'static str {
        "กข 1234"
    }
}

/// Fixture for identities and principals
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// Stable id for the underwriter fixture
    pub fn underwriter_id() -> UserId {
        UserId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
    }

    /// An active underwriter who also acts as an agent
    pub fn underwriter() -> IdentityRecord {
        let mut record = IdentityRecord::new(
            "malee.s",
            "malee.s@example.co.th",
            [Role::Underwriter, Role::Agent],
        );
        record.id = Self::underwriter_id();
        record
    }

    /// An active claims officer
    pub fn claims_officer() -> IdentityRecord {
        IdentityRecord::new("somchai.k", "somchai.k@example.co.th", [Role::ClaimsOfficer])
    }

    /// A deactivated customer account
    pub fn deactivated_customer() -> IdentityRecord {
        let mut record = IdentityRecord::new("former.customer", "former@example.com", [Role::Customer]);
        record.is_active = false;
        record
    }

    /// A record with no roles, which cannot form a principal
    pub fn roleless() -> IdentityRecord {
        IdentityRecord::new("ghost", "ghost@example.com", [])
    }

    /// Principal for the underwriter fixture
    pub fn underwriter_principal() -> Principal {
        Principal::from_record(&Self::underwriter()).expect("fixture record is valid")
    }
}

/// Fixture for token signing configuration
pub struct SecretFixtures;

impl SecretFixtures {
    /// Base64 of 64 bytes, the minimum HS512 key length
    pub fn base64_secret() -> &'static str {
        "dGVzdC1zaWduaW5nLXNlY3JldC1mb3ItdGhlLWlkZW50aXR5LWNvcmUtc3VpdGUtMDEyMzQ1Njc4OWFiY2RlZg=="
    }

    /// A different 64-byte key, for signature mismatch tests
    pub fn other_base64_secret() -> &'static str {
        "dW5yZWxhdGVkLXNpZ25pbmctc2VjcmV0LXByb3Zpbmctc2lnbmF0dXJlcy1mYWlsLTAxMjM0NTY3ODlhYmNkZQ=="
    }
}
