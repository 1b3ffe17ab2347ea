//! Identity data validation
//!
//! Pure format and checksum validators for the identity data the back
//! office collects from Thai customers.
//!
//! # Validation Rules
//!
//! ## National ID
//! - Exactly 13 ASCII digits
//! - The 13th digit is a mod-11 checksum over the first 12, weighted 13 down to 2
//!
//! ## Mobile Phone
//! - Exactly 10 digits beginning `06`, `07`, `08` or `09`
//!
//! ## Postal Code
//! - Exactly 5 digits between 10000 and 99999
//! - The first two digits select the province
//!
//! ## License Plate
//! - 3 to 10 characters after trimming
//! - Thai script, Latin letters, digits and spaces only
//!
//! Every function here is total: malformed input yields `false` or `None`,
//! never a panic.

use crate::province;

const NATIONAL_ID_LEN: usize = 13;
const PHONE_LEN: usize = 10;
const POSTAL_CODE_LEN: usize = 5;
const MOBILE_PREFIXES: [&str; 4] = ["06", "07", "08", "09"];
const UNKNOWN_PROVINCE: &str = "Unknown";

/// Why a national ID failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Wrong length or non-digit characters
    FormatInvalid,
    /// Well-formed, but the check digit does not match
    ChecksumMismatch,
}

/// Result of a multi-field validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether every checked field is valid
    pub is_valid: bool,
    /// List of validation errors
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal issues)
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validators and normalisers for Thai identity data
///
/// # Examples
///
/// ```rust
/// use domain_identity::validation::IdentityValidator;
///
/// assert!(IdentityValidator::validate_national_id("1101700207366"));
/// assert!(!IdentityValidator::validate_national_id("1101700207365"));
/// assert_eq!(
///     IdentityValidator::format_phone("0812345678").as_deref(),
///     Some("081-234-5678")
/// );
/// assert_eq!(IdentityValidator::province_for_postal_code("10110"), Some("Bangkok"));
/// ```
pub struct IdentityValidator;

impl IdentityValidator {
    // ========================================================================
    // National ID
    // ========================================================================

    /// Returns true if `s` is a 13-digit national ID with a matching check digit
    pub fn validate_national_id(s: &str) -> bool {
        Self::diagnose_national_id(s).is_ok()
    }

    /// Classifies a national ID failure
    pub fn diagnose_national_id(s: &str) -> Result<(), ValidationIssue> {
        let digits = ascii_digits(s, NATIONAL_ID_LEN).ok_or(ValidationIssue::FormatInvalid)?;
        if checksum(&digits[..NATIONAL_ID_LEN - 1]) == digits[NATIONAL_ID_LEN - 1] {
            Ok(())
        } else {
            Err(ValidationIssue::ChecksumMismatch)
        }
    }

    /// Computes the check digit for the first 12 digits of a national ID
    pub fn national_id_check_digit(first_twelve: &str) -> Option<u8> {
        ascii_digits(first_twelve, NATIONAL_ID_LEN - 1).map(|d| checksum(&d))
    }

    /// Formats a national ID as `X-XXXX-XXXXX-XX-X`
    ///
    /// Separators in the input are ignored. Returns None unless 13 digits remain.
    pub fn format_national_id(s: &str) -> Option<String> {
        let cleaned = Self::clean_national_id(s);
        if cleaned.len() != NATIONAL_ID_LEN {
            return None;
        }
        Some(format!(
            "{}-{}-{}-{}-{}",
            &cleaned[0..1],
            &cleaned[1..5],
            &cleaned[5..10],
            &cleaned[10..12],
            &cleaned[12..13]
        ))
    }

    /// Strips everything but ASCII digits
    pub fn clean_national_id(s: &str) -> String {
        s.chars().filter(char::is_ascii_digit).collect()
    }

    /// Formats a national ID with its middle digits hidden, for logs and receipts
    ///
    /// `1101700207366` becomes `1-1017-XXXXX-XX-6`.
    pub fn mask_national_id(s: &str) -> Option<String> {
        let formatted = Self::format_national_id(s)?;
        Some(format!("{}-XXXXX-XX-{}", &formatted[0..6], &formatted[16..17]))
    }

    // ========================================================================
    // Mobile phone
    // ========================================================================

    /// Returns true if `s` is a 10-digit Thai mobile number
    pub fn validate_phone(s: &str) -> bool {
        ascii_digits(s, PHONE_LEN).is_some() && MOBILE_PREFIXES.iter().any(|p| s.starts_with(p))
    }

    /// Formats a mobile number as `0XX-XXX-XXXX`
    ///
    /// Accepts anything [`IdentityValidator::clean_phone`] can normalise into
    /// a valid number; returns None otherwise.
    pub fn format_phone(s: &str) -> Option<String> {
        let cleaned = Self::clean_phone(s);
        if !Self::validate_phone(&cleaned) {
            return None;
        }
        Some(format!("{}-{}-{}", &cleaned[0..3], &cleaned[3..6], &cleaned[6..10]))
    }

    /// Reduces a phone number to bare digits
    ///
    /// A leading `66` country code (as in `+66 81 234 5678`) is replaced by
    /// the domestic trunk prefix `0`.
    pub fn clean_phone(s: &str) -> String {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        match digits.strip_prefix("66") {
            Some(rest) if rest.len() == PHONE_LEN - 1 => format!("0{}", rest),
            _ => digits,
        }
    }

    // ========================================================================
    // Postal code
    // ========================================================================

    /// Returns true if `s` is a 5-digit postal code in 10000..=99999
    pub fn validate_postal_code(s: &str) -> bool {
        match ascii_digits(s, POSTAL_CODE_LEN) {
            Some(d) => d[0] != 0,
            None => false,
        }
    }

    /// Province for a postal code
    ///
    /// None for structurally invalid codes; `"Unknown"` for valid codes
    /// whose prefix is not allocated to a province.
    pub fn province_for_postal_code(code: &str) -> Option<&'static str> {
        if !Self::validate_postal_code(code) {
            return None;
        }
        Some(province::province_for_prefix(&code[0..2]).unwrap_or(UNKNOWN_PROVINCE))
    }

    // ========================================================================
    // License plate
    // ========================================================================

    /// Returns true if `s` is a plausible vehicle registration plate
    pub fn validate_license_plate(s: &str) -> bool {
        let trimmed = s.trim();
        let len = trimmed.chars().count();
        (3..=10).contains(&len) && trimmed.chars().all(is_plate_char)
    }

    /// Normalises a plate: trimmed, single-spaced, Latin letters uppercased
    pub fn clean_license_plate(s: &str) -> String {
        s.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase()
    }

    /// Normalised form of a valid plate, None otherwise
    pub fn format_license_plate(s: &str) -> Option<String> {
        let cleaned = Self::clean_license_plate(s);
        Self::validate_license_plate(&cleaned).then_some(cleaned)
    }

    // ========================================================================
    // Aggregate
    // ========================================================================

    /// Validates the identity fields captured at customer onboarding
    ///
    /// Collects every failure instead of stopping at the first one.
    pub fn check_contact(national_id: &str, phone: &str, postal_code: &str) -> ValidationResult {
        let mut result = ValidationResult::ok();

        match Self::diagnose_national_id(national_id) {
            Ok(()) => {}
            Err(ValidationIssue::FormatInvalid) => {
                result.add_error("National ID must be exactly 13 digits");
            }
            Err(ValidationIssue::ChecksumMismatch) => {
                result.add_error("National ID check digit does not match");
            }
        }

        if !Self::validate_phone(phone) {
            if Self::validate_phone(&Self::clean_phone(phone)) {
                result.add_warning("Phone number should be stored without separators");
            } else {
                result.add_error(format!("Invalid mobile phone number: {}", phone));
            }
        }

        match Self::province_for_postal_code(postal_code) {
            None => result.add_error(format!("Invalid postal code: {}", postal_code)),
            Some(UNKNOWN_PROVINCE) => {
                result.add_warning(format!("Postal code {} is not in a known province", postal_code));
            }
            Some(_) => {}
        }

        result
    }
}

/// Digit values of `s` if it is exactly `len` ASCII digits
fn ascii_digits(s: &str, len: usize) -> Option<Vec<u8>> {
    if s.len() != len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.bytes().map(|b| b - b'0').collect())
}

/// Mod-11 check digit over 12 digits weighted 13, 12, ..., 2
fn checksum(first_twelve: &[u8]) -> u8 {
    let sum: u32 = first_twelve
        .iter()
        .enumerate()
        .map(|(i, d)| u32::from(*d) * (13 - i as u32))
        .sum();
    let remainder = sum % 11;
    if remainder < 2 {
        (1 - remainder) as u8
    } else {
        (11 - remainder) as u8
    }
}

fn is_plate_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || ('\u{0E00}'..='\u{0E7F}').contains(&c)
}
