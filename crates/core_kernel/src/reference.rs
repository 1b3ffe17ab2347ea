//! Business reference numbers
//!
//! Policies, claims and payments are labelled with human-readable
//! references of the form `PREFIX-YYYYMMDD-NNNNNN`, for example
//! `POL-20240315-000042`. Each kind owns an independent sequence counter
//! held inside a [`ReferenceNumberGenerator`]; the generator is constructed
//! once at startup and shared (typically behind an `Arc`) with every flow
//! that creates records.
//!
//! # Sequence lifetime
//!
//! Counters live in memory only. A restart begins again at 1 unless the
//! caller seeds the generator with [`ReferenceNumberGenerator::starting_at`],
//! so references issued before a restart can collide with new ones on the
//! same business date.
//!
//! Transaction ids, OTPs and PromptPay references are different: they carry
//! no sequence and are drawn uniformly from the operating system RNG by
//! [`ReferenceNumberGenerator::generate_opaque_id`].

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::temporal::Timezone;

/// Largest sequence that still fits the six-digit field
pub const MAX_SEQUENCE: u64 = 999_999;

static POLICY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^POL-[0-9]{8}-[0-9]{6}$").expect("valid policy pattern"));
static CLAIM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CLM-[0-9]{8}-[0-9]{6}$").expect("valid claim pattern"));
static PAYMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^PAY-[0-9]{8}-[0-9]{6}$").expect("valid payment pattern"));

static TRANSACTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^TXN[0-9]{12}$").expect("valid transaction pattern"));
static OTP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("valid otp pattern"));
static PROMPTPAY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^PP[0-9]{12}$").expect("valid promptpay pattern"));

/// Kind of sequenced business reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Policy,
    Claim,
    Payment,
}

impl ReferenceKind {
    /// All sequenced kinds, in counter order
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Policy,
        ReferenceKind::Claim,
        ReferenceKind::Payment,
    ];

    /// Fixed three-letter prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            ReferenceKind::Policy => "POL",
            ReferenceKind::Claim => "CLM",
            ReferenceKind::Payment => "PAY",
        }
    }

    /// Returns true if `value` is a well-formed reference of this kind
    ///
    /// Matching is exact and case-sensitive; `pol-20240101-000001` is rejected.
    pub fn validate_format(&self, value: &str) -> bool {
        let pattern = match self {
            ReferenceKind::Policy => &POLICY_PATTERN,
            ReferenceKind::Claim => &CLAIM_PATTERN,
            ReferenceKind::Payment => &PAYMENT_PATTERN,
        };
        pattern.is_match(value)
    }

    /// Identifies the kind of a well-formed reference
    pub fn of(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.validate_format(value))
    }

    fn slot(&self) -> usize {
        match self {
            ReferenceKind::Policy => 0,
            ReferenceKind::Claim => 1,
            ReferenceKind::Payment => 2,
        }
    }
}

/// Kind of random, unsequenced reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpaqueIdKind {
    /// `TXN` followed by 12 digits
    TransactionId,
    /// 6 digits, no prefix
    Otp,
    /// `PP` followed by 12 digits
    PromptPayReference,
}

impl OpaqueIdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            OpaqueIdKind::TransactionId => "TXN",
            OpaqueIdKind::Otp => "",
            OpaqueIdKind::PromptPayReference => "PP",
        }
    }

    /// Number of random digits following the prefix
    pub fn digits(&self) -> usize {
        match self {
            OpaqueIdKind::TransactionId => 12,
            OpaqueIdKind::Otp => 6,
            OpaqueIdKind::PromptPayReference => 12,
        }
    }

    /// Returns true if `value` has exactly this kind's prefix and digit count
    pub fn validate_format(&self, value: &str) -> bool {
        let pattern = match self {
            OpaqueIdKind::TransactionId => &TRANSACTION_PATTERN,
            OpaqueIdKind::Otp => &OTP_PATTERN,
            OpaqueIdKind::PromptPayReference => &PROMPTPAY_PATTERN,
        };
        pattern.is_match(value)
    }
}

/// Errors raised while minting references
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// The six-digit sequence field has no room left for this kind
    #[error("Sequence exhausted for {kind:?} at {sequence}")]
    SequenceExhausted {
        kind: ReferenceKind,
        sequence: u64,
    },
}

/// Mints unique, human-readable business references
///
/// Every counter holds the *next* sequence to hand out, so issuing a number
/// is a single atomic read-modify-write with no separate read: two concurrent callers can
/// never observe the same value.
///
/// # Examples
///
/// ```rust
/// use core_kernel::reference::{ReferenceKind, ReferenceNumberGenerator};
/// use core_kernel::temporal::Timezone;
///
/// let generator = ReferenceNumberGenerator::new(Timezone::bangkok());
/// let policy_no = generator.generate(ReferenceKind::Policy).unwrap();
/// assert!(ReferenceNumberGenerator::validate_format(ReferenceKind::Policy, &policy_no));
/// assert!(policy_no.ends_with("-000001"));
/// ```
#[derive(Debug)]
pub struct ReferenceNumberGenerator {
    counters: [AtomicU64; 3],
    timezone: Timezone,
}

impl ReferenceNumberGenerator {
    /// Creates a generator whose counters all start at 1
    pub fn new(timezone: Timezone) -> Self {
        Self {
            counters: [AtomicU64::new(1), AtomicU64::new(1), AtomicU64::new(1)],
            timezone,
        }
    }

    /// Creates a generator whose counters resume after the given sequences
    ///
    /// `last_issued` lists, per kind, the highest sequence already in use
    /// (for example recovered from the record store at startup). Kinds not
    /// listed start at 1. A seed at or beyond [`MAX_SEQUENCE`] leaves that
    /// kind exhausted.
    pub fn starting_at(timezone: Timezone, last_issued: &[(ReferenceKind, u64)]) -> Self {
        let generator = Self::new(timezone);
        for (kind, last) in last_issued {
            let next = last.saturating_add(1).min(MAX_SEQUENCE + 1);
            generator.counters[kind.slot()].store(next, Ordering::Relaxed);
        }
        generator
    }

    /// Business timezone used to stamp the date segment
    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Issues the next reference of `kind` dated today in the business timezone
    pub fn generate(&self, kind: ReferenceKind) -> Result<String, ReferenceError> {
        self.generate_on(kind, self.timezone.today())
    }

    /// Issues the next reference of `kind` stamped with `date`
    pub fn generate_on(&self, kind: ReferenceKind, date: NaiveDate) -> Result<String, ReferenceError> {
        // Relaxed suffices: only the atomicity of the increment matters.
        // The counter stops at MAX_SEQUENCE + 1 and never wraps.
        let sequence = self.counters[kind.slot()]
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                (s <= MAX_SEQUENCE).then(|| s + 1)
            })
            .map_err(|sequence| {
                error!(kind = ?kind, sequence, "Reference sequence exhausted");
                ReferenceError::SequenceExhausted { kind, sequence }
            })?;

        let reference = format!("{}-{}-{:06}", kind.prefix(), date.format("%Y%m%d"), sequence);
        debug!(kind = ?kind, %reference, "Issued reference number");
        Ok(reference)
    }

    /// Last sequence handed out for `kind`, or 0 if none yet
    pub fn peek(&self, kind: ReferenceKind) -> u64 {
        self.counters[kind.slot()]
            .load(Ordering::Relaxed)
            .saturating_sub(1)
    }

    /// Generates a random transaction id, OTP or PromptPay reference
    ///
    /// Digits are drawn uniformly from the operating system RNG; the output
    /// is not unique by construction and callers needing uniqueness must
    /// check against their own store.
    pub fn generate_opaque_id(&self, kind: OpaqueIdKind) -> String {
        let mut rng = OsRng;
        let mut id = String::with_capacity(kind.prefix().len() + kind.digits());
        id.push_str(kind.prefix());
        for _ in 0..kind.digits() {
            id.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        id
    }

    /// Checks a reference against the format of `kind`
    ///
    /// Independent of any generator state, so it can validate references
    /// supplied from outside the process.
    pub fn validate_format(kind: ReferenceKind, value: &str) -> bool {
        kind.validate_format(value)
    }
}

impl Default for ReferenceNumberGenerator {
    fn default() -> Self {
        Self::new(Timezone::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_counters_are_independent() {
        let generator = ReferenceNumberGenerator::default();

        assert_eq!(generator.generate_on(ReferenceKind::Policy, date()).unwrap(), "POL-20240315-000001");
        assert_eq!(generator.generate_on(ReferenceKind::Policy, date()).unwrap(), "POL-20240315-000002");
        assert_eq!(generator.generate_on(ReferenceKind::Claim, date()).unwrap(), "CLM-20240315-000001");
        assert_eq!(generator.generate_on(ReferenceKind::Payment, date()).unwrap(), "PAY-20240315-000001");

        assert_eq!(generator.peek(ReferenceKind::Policy), 2);
        assert_eq!(generator.peek(ReferenceKind::Claim), 1);
    }

    #[test]
    fn test_sequence_exhaustion_is_an_error() {
        let generator = ReferenceNumberGenerator::starting_at(
            Timezone::default(),
            &[(ReferenceKind::Claim, MAX_SEQUENCE - 1)],
        );

        assert_eq!(generator.generate_on(ReferenceKind::Claim, date()).unwrap(), "CLM-20240315-999999");
        assert_eq!(
            generator.generate_on(ReferenceKind::Claim, date()),
            Err(ReferenceError::SequenceExhausted {
                kind: ReferenceKind::Claim,
                sequence: MAX_SEQUENCE + 1,
            })
        );
        // Other kinds keep working
        assert!(generator.generate_on(ReferenceKind::Policy, date()).is_ok());
    }

    #[test]
    fn test_exhausted_counter_never_wraps() {
        let generator = ReferenceNumberGenerator::starting_at(
            Timezone::default(),
            &[(ReferenceKind::Policy, u64::MAX)],
        );

        for _ in 0..5 {
            assert_eq!(
                generator.generate_on(ReferenceKind::Policy, date()),
                Err(ReferenceError::SequenceExhausted {
                    kind: ReferenceKind::Policy,
                    sequence: MAX_SEQUENCE + 1,
                })
            );
        }
        assert_eq!(generator.peek(ReferenceKind::Policy), MAX_SEQUENCE);
    }

    #[test]
    fn test_format_rejects_near_misses() {
        let kind = ReferenceKind::Policy;
        assert!(kind.validate_format("POL-20240315-000001"));
        assert!(!kind.validate_format("pol-20240315-000001"));
        assert!(!kind.validate_format("POL-2024031-000001"));
        assert!(!kind.validate_format("POL-20240315-0000001"));
        assert!(!kind.validate_format("CLM-20240315-000001"));
        assert!(!kind.validate_format(" POL-20240315-000001"));
        assert!(!kind.validate_format("POL-๒๐๒๔๐๓๑๕-000001"));
    }

    #[test]
    fn test_kind_of_reference() {
        assert_eq!(ReferenceKind::of("PAY-20240101-000123"), Some(ReferenceKind::Payment));
        assert_eq!(ReferenceKind::of("TXN123456789012"), None);
    }

    #[test]
    fn test_opaque_ids_match_their_format() {
        let generator = ReferenceNumberGenerator::default();
        for kind in [OpaqueIdKind::TransactionId, OpaqueIdKind::Otp, OpaqueIdKind::PromptPayReference] {
            let id = generator.generate_opaque_id(kind);
            assert!(kind.validate_format(&id), "{id} should match {kind:?}");
            assert_eq!(id.len(), kind.prefix().len() + kind.digits());
        }
    }
}
