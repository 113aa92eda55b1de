//! # Budget Types
//!
//! Domain types and port traits for budget projects.
//! This crate has no IO dependencies - only entity records, parsing
//! rules for amounts, dates and IBANs, and the traits the store builds on.
//!
//! ## Layout
//!
//! - `domain/` - Entity kinds (accounts, counterparts, categories, transactions, CSV mappings)
//! - `ports/` - The `TaggedItem` capability and the `EntityLookup` reference resolver
//! - `record/` - Serialized shapes written to `project.json`
//! - `error/` - Parsing and record-level error types

pub mod domain;
pub mod error;
pub mod ports;
pub mod record;

// Re-export commonly used types
pub use domain::{
    AccountId, Amount, BankAccount, CategoryId, CounterPart, CounterpartId, CsvField, Currency,
    EntityKind, Iban, MappingId, ProjectId, Transaction, TransactionCategory,
    TransactionCsvMapping, TransactionId,
};
pub use error::{AmountError, IbanError, RecordError};
pub use ports::{EmptyLookup, EntityLookup, Identifier, TaggedItem};
pub use record::*;
