//! Error types for budget records.

use crate::domain::EntityKind;

/// Errors raised while reading a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: '{0}'")]
    Invalid(String),

    #[error("Amount '{value}' has {digits} fraction digits, at most 2 are allowed")]
    TooManyDecimals { value: String, digits: usize },

    #[error("Amount out of range: '{0}'")]
    OutOfRange(String),
}

/// Errors raised while validating an IBAN.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IbanError {
    #[error("IBAN length {0} is outside 15..=34")]
    InvalidLength(usize),

    #[error("IBAN country code '{0}' must be two letters")]
    InvalidCountryCode(String),

    #[error("IBAN check digits '{0}' must be two digits")]
    InvalidCheckDigits(String),

    #[error("IBAN contains invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("IBAN checksum mismatch")]
    ChecksumMismatch,
}

/// Record-level errors raised while reconstructing an entity.
///
/// These only surface from hand-edited or corrupted project files; records
/// produced by `to_record` always read back.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid IBAN: {0}")]
    InvalidIban(#[from] IbanError),

    #[error("Missing reference: {kind} {identifier} does not exist")]
    MissingReference { kind: EntityKind, identifier: u32 },
}
