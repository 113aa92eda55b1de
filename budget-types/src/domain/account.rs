//! Bank account domain model.

use super::iban::Iban;
use super::ids::{AccountId, EntityKind};
use crate::error::RecordError;
use crate::ports::{EntityLookup, TaggedItem};
use crate::record::AccountRecord;

/// One of the user's own bank accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    id: AccountId,
    /// Account number, if known
    pub iban: Option<Iban>,
    /// Display name
    pub name: String,
    /// Free-text note
    pub note: String,
}

impl BankAccount {
    /// Creates an account named `New Account(<id>)`.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            iban: None,
            name: format!("New Account({id})"),
            note: String::new(),
        }
    }

    /// Creates an account with all fields specified.
    pub fn from_parts(id: AccountId, iban: Option<Iban>, name: String, note: String) -> Self {
        Self {
            id,
            iban,
            name,
            note,
        }
    }
}

impl TaggedItem for BankAccount {
    type Id = AccountId;
    type Record = AccountRecord;

    const KIND: EntityKind = EntityKind::Account;

    fn id(&self) -> AccountId {
        self.id
    }

    fn record_identifier(record: &AccountRecord) -> AccountId {
        record.identifier
    }

    fn with_defaults(id: AccountId, _lookup: &dyn EntityLookup) -> Self {
        Self::new(id)
    }

    fn to_record(&self) -> AccountRecord {
        AccountRecord {
            identifier: self.id,
            name: self.name.clone(),
            note: self.note.clone(),
            iban: self.iban.as_ref().map(|iban| iban.as_str().to_string()),
        }
    }

    fn from_record(
        id: AccountId,
        record: AccountRecord,
        _lookup: &dyn EntityLookup,
    ) -> Result<Self, RecordError> {
        let iban = record.iban.as_deref().map(Iban::parse).transpose()?;
        Ok(Self::from_parts(id, iban, record.name, record.note))
    }
}
