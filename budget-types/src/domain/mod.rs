//! Domain models for budget projects.

pub mod account;
pub mod amount;
pub mod category;
pub mod counterpart;
pub mod csv_mapping;
pub mod iban;
pub mod ids;
pub mod transaction;

pub use account::BankAccount;
pub use amount::{Amount, Currency};
pub use category::TransactionCategory;
pub use counterpart::CounterPart;
pub use csv_mapping::{CsvField, TransactionCsvMapping};
pub use iban::Iban;
pub use ids::{
    AccountId, CategoryId, CounterpartId, EntityKind, MappingId, ProjectId, TransactionId,
};
pub use transaction::Transaction;
