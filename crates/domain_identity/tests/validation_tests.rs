//! Tests for IdentityValidator

use domain_identity::{IdentityValidator, ValidationIssue};
use proptest::prelude::*;
use test_utils::{
    national_id_strategy, national_id_with_wrong_check_digit_strategy, phone_strategy,
    postal_code_strategy, license_plate_strategy, IdentityDataFixtures,
};

// ============================================================================
// National ID
// ============================================================================

mod national_id_tests {
    use super::*;

    #[test]
    fn test_reference_cases() {
        assert!(IdentityValidator::validate_national_id(IdentityDataFixtures::valid_national_id()));
        assert!(!IdentityValidator::validate_national_id(IdentityDataFixtures::bad_checksum_national_id()));
    }

    #[test]
    fn test_rejects_non_digits_and_wrong_lengths() {
        assert!(!IdentityValidator::validate_national_id(""));
        assert!(!IdentityValidator::validate_national_id("abcdefghijklm"));
        assert!(!IdentityValidator::validate_national_id("110170020736"));
        assert!(!IdentityValidator::validate_national_id(" 1101700207366"));
        assert_eq!(
            IdentityValidator::diagnose_national_id("11017002073x6"),
            Err(ValidationIssue::FormatInvalid)
        );
    }

    #[test]
    fn test_format_and_clean() {
        let formatted = IdentityValidator::format_national_id("1101700207366").unwrap();
        assert_eq!(formatted, "1-1017-00207-36-6");
        assert_eq!(IdentityValidator::clean_national_id(&formatted), "1101700207366");
        assert_eq!(
            IdentityValidator::format_national_id("1 1017 00207 36 6").as_deref(),
            Some("1-1017-00207-36-6")
        );
        assert_eq!(IdentityValidator::format_national_id("12345"), None);
    }

    proptest! {
        #[test]
        fn checksum_valid_ids_pass(id in national_id_strategy()) {
            prop_assert!(IdentityValidator::validate_national_id(&id));
        }

        #[test]
        fn changing_only_the_check_digit_fails((valid, invalid) in national_id_with_wrong_check_digit_strategy()) {
            prop_assert!(IdentityValidator::validate_national_id(&valid));
            prop_assert_eq!(
                IdentityValidator::diagnose_national_id(&invalid),
                Err(ValidationIssue::ChecksumMismatch)
            );
        }

        #[test]
        fn format_then_clean_is_stable(id in national_id_strategy()) {
            let formatted = IdentityValidator::format_national_id(&id).unwrap();
            prop_assert_eq!(
                IdentityValidator::clean_national_id(&formatted),
                IdentityValidator::clean_national_id(&id)
            );
            prop_assert_eq!(IdentityValidator::format_national_id(&formatted), Some(formatted.clone()));
        }

        #[test]
        fn validator_never_panics(s in "\\PC{0,20}") {
            let _ = IdentityValidator::validate_national_id(&s);
            let _ = IdentityValidator::format_national_id(&s);
            let _ = IdentityValidator::mask_national_id(&s);
        }
    }
}

// ============================================================================
// Mobile phone
// ============================================================================

mod phone_tests {
    use super::*;

    #[test]
    fn test_valid_prefixes() {
        for phone in ["0612345678", "0712345678", "0812345678", "0912345678"] {
            assert!(IdentityValidator::validate_phone(phone), "{phone}");
        }
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(!IdentityValidator::validate_phone(IdentityDataFixtures::landline_phone()));
        assert!(!IdentityValidator::validate_phone("081234567"));
        assert!(!IdentityValidator::validate_phone("08123456789"));
        assert!(!IdentityValidator::validate_phone("081-234-5678"));
        assert!(!IdentityValidator::validate_phone(""));
    }

    #[test]
    fn test_format_accepts_international_form() {
        assert_eq!(
            IdentityValidator::format_phone("+66 81 234 5678").as_deref(),
            Some("081-234-5678")
        );
        assert_eq!(IdentityValidator::format_phone("0212345678"), None);
    }

    proptest! {
        #[test]
        fn clean_inverts_format(phone in phone_strategy()) {
            let formatted = IdentityValidator::format_phone(&phone).unwrap();
            prop_assert_eq!(IdentityValidator::clean_phone(&formatted), phone);
        }
    }
}

// ============================================================================
// Postal code
// ============================================================================

mod postal_code_tests {
    use super::*;

    #[test]
    fn test_province_lookup() {
        assert_eq!(IdentityValidator::province_for_postal_code("10110"), Some("Bangkok"));
        assert_eq!(IdentityValidator::province_for_postal_code("50200"), Some("Chiang Mai"));
        assert_eq!(IdentityValidator::province_for_postal_code("99000"), Some("Unknown"));
        assert_eq!(IdentityValidator::province_for_postal_code("123"), None);
        assert_eq!(IdentityValidator::province_for_postal_code("01234"), None);
        assert_eq!(IdentityValidator::province_for_postal_code("1011a"), None);
    }

    #[test]
    fn test_range_bounds() {
        assert!(IdentityValidator::validate_postal_code("10000"));
        assert!(IdentityValidator::validate_postal_code("99999"));
        assert!(!IdentityValidator::validate_postal_code("09999"));
        assert!(!IdentityValidator::validate_postal_code("100000"));
    }

    proptest! {
        #[test]
        fn every_valid_code_has_a_province(code in postal_code_strategy()) {
            prop_assert!(IdentityValidator::validate_postal_code(&code));
            prop_assert!(IdentityValidator::province_for_postal_code(&code).is_some());
        }
    }
}

// ============================================================================
// License plate
// ============================================================================

mod license_plate_tests {
    use super::*;

    #[test]
    fn test_thai_plate() {
        assert!(IdentityValidator::validate_license_plate(IdentityDataFixtures::thai_plate()));
    }

    #[test]
    fn test_clean_normalises_spacing_and_case() {
        assert_eq!(IdentityValidator::clean_license_plate("  ab   1234 "), "AB 1234");
        assert_eq!(IdentityValidator::clean_license_plate("กข\t1234"), "กข 1234");
    }

    #[test]
    fn test_format_rejects_invalid() {
        assert_eq!(IdentityValidator::format_license_plate("กข_1234"), None);
        assert_eq!(IdentityValidator::format_license_plate("x"), None);
    }

    proptest! {
        #[test]
        fn clean_of_format_matches_clean(plate in license_plate_strategy()) {
            prop_assert!(IdentityValidator::validate_license_plate(&plate));
            let formatted = IdentityValidator::format_license_plate(&plate).unwrap();
            prop_assert_eq!(
                IdentityValidator::clean_license_plate(&formatted),
                IdentityValidator::clean_license_plate(&plate)
            );
        }
    }
}
