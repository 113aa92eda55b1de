//! Serialized entity records, as they appear in `project.json`.
//!
//! Records are flat: references are plain identifiers, dates are ISO-8601
//! strings and amounts are decimal strings with two fraction digits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{AccountId, CategoryId, CounterpartId, CsvField, MappingId, TransactionId};

// ─────────────────────────────────────────────────────────────────────────────
// Independent entities
// ─────────────────────────────────────────────────────────────────────────────

/// Stored form of a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub identifier: AccountId,
    pub name: String,
    #[serde(default)]
    pub note: String,
    /// Compact IBAN, `null` when the account has none
    #[serde(default)]
    pub iban: Option<String>,
}

/// Stored form of a counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartRecord {
    pub identifier: CounterpartId,
    pub name: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub iban: Option<String>,
}

/// Stored form of a transaction category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub identifier: CategoryId,
    pub name: String,
    #[serde(default)]
    pub note: String,
}

/// Stored form of a CSV import mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvMappingRecord {
    pub identifier: MappingId,
    pub name: String,
    /// Column index per field; `null` means the field is not imported
    #[serde(default)]
    pub column_map: BTreeMap<CsvField, Option<usize>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dependent entities
// ─────────────────────────────────────────────────────────────────────────────

/// Stored form of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub identifier: TransactionId,
    /// `YYYY-MM-DD`
    pub date: String,
    pub counterpart: Option<CounterpartId>,
    /// Decimal string, e.g. `"-12.50"`
    pub amount: String,
    pub account: Option<AccountId>,
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub note: String,
}
