//! Transaction domain model.

use chrono::{Local, NaiveDate};

use super::amount::Amount;
use super::ids::{AccountId, CategoryId, CounterpartId, EntityKind, TransactionId};
use crate::error::RecordError;
use crate::ports::{EntityLookup, TaggedItem};
use crate::record::TransactionRecord;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A recorded income or expense.
///
/// The account, counterpart and category are references by identifier into
/// sibling stores of the same project. The setters check the target exists,
/// so a transaction can only dangle if a referenced entity is removed without
/// going through the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    /// Booking date
    pub date: NaiveDate,
    /// Signed amount; negative for expenses
    pub amount: Amount,
    counterpart: Option<CounterpartId>,
    account: Option<AccountId>,
    category: Option<CategoryId>,
    /// Free-text note
    pub note: String,
}

impl Transaction {
    pub fn counterpart(&self) -> Option<CounterpartId> {
        self.counterpart
    }

    pub fn account(&self) -> Option<AccountId> {
        self.account
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.category
    }

    /// Points the transaction at another account, or at none.
    pub fn set_account(
        &mut self,
        account: Option<AccountId>,
        lookup: &dyn EntityLookup,
    ) -> Result<(), RecordError> {
        self.account = check_account(account, lookup)?;
        Ok(())
    }

    pub fn set_counterpart(
        &mut self,
        counterpart: Option<CounterpartId>,
        lookup: &dyn EntityLookup,
    ) -> Result<(), RecordError> {
        self.counterpart = check_counterpart(counterpart, lookup)?;
        Ok(())
    }

    pub fn set_category(
        &mut self,
        category: Option<CategoryId>,
        lookup: &dyn EntityLookup,
    ) -> Result<(), RecordError> {
        self.category = check_category(category, lookup)?;
        Ok(())
    }

    /// Drops the account reference without a lookup.
    pub fn clear_account(&mut self) {
        self.account = None;
    }

    pub fn clear_counterpart(&mut self) {
        self.counterpart = None;
    }

    pub fn clear_category(&mut self) {
        self.category = None;
    }
}

fn check_account(
    id: Option<AccountId>,
    lookup: &dyn EntityLookup,
) -> Result<Option<AccountId>, RecordError> {
    match id {
        Some(id) if !lookup.contains_account(id) => Err(RecordError::MissingReference {
            kind: EntityKind::Account,
            identifier: id.value(),
        }),
        other => Ok(other),
    }
}

fn check_counterpart(
    id: Option<CounterpartId>,
    lookup: &dyn EntityLookup,
) -> Result<Option<CounterpartId>, RecordError> {
    match id {
        Some(id) if !lookup.contains_counterpart(id) => Err(RecordError::MissingReference {
            kind: EntityKind::Counterpart,
            identifier: id.value(),
        }),
        other => Ok(other),
    }
}

fn check_category(
    id: Option<CategoryId>,
    lookup: &dyn EntityLookup,
) -> Result<Option<CategoryId>, RecordError> {
    match id {
        Some(id) if !lookup.contains_category(id) => Err(RecordError::MissingReference {
            kind: EntityKind::Category,
            identifier: id.value(),
        }),
        other => Ok(other),
    }
}

/// Parses a stored `YYYY-MM-DD` date. Only the exact form written by
/// `to_record` is accepted, so `2024-3-1` or `24-03-01` are errors.
fn parse_date(value: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == value)
        .ok_or_else(|| RecordError::InvalidDate(value.to_string()))
}

impl TaggedItem for Transaction {
    type Id = TransactionId;
    type Record = TransactionRecord;

    const KIND: EntityKind = EntityKind::Transaction;

    fn id(&self) -> TransactionId {
        self.id
    }

    fn record_identifier(record: &TransactionRecord) -> TransactionId {
        record.identifier
    }

    /// Today, zero amount, and the project's first account if it has one.
    fn with_defaults(id: TransactionId, lookup: &dyn EntityLookup) -> Self {
        Self {
            id,
            date: Local::now().date_naive(),
            amount: Amount::ZERO,
            counterpart: None,
            account: lookup.first_account(),
            category: None,
            note: String::new(),
        }
    }

    fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            identifier: self.id,
            date: self.date.format(DATE_FORMAT).to_string(),
            counterpart: self.counterpart,
            amount: self.amount.to_string(),
            account: self.account,
            category: self.category,
            note: self.note.clone(),
        }
    }

    fn from_record(
        id: TransactionId,
        record: TransactionRecord,
        lookup: &dyn EntityLookup,
    ) -> Result<Self, RecordError> {
        let date = parse_date(&record.date)?;
        let amount = record.amount.parse::<Amount>()?;

        Ok(Self {
            id,
            date,
            amount,
            counterpart: check_counterpart(record.counterpart, lookup)?,
            account: check_account(record.account, lookup)?,
            category: check_category(record.category, lookup)?,
            note: record.note,
        })
    }
}
