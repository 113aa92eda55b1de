//! Counterpart domain model: the payer or payee on the other side of a transaction.

use super::iban::Iban;
use super::ids::{CounterpartId, EntityKind};
use crate::error::RecordError;
use crate::ports::{EntityLookup, TaggedItem};
use crate::record::CounterpartRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterPart {
    id: CounterpartId,
    pub iban: Option<Iban>,
    pub name: String,
    pub note: String,
}

impl CounterPart {
    /// Creates a counterpart named `New Counterpart(<id>)`.
    pub fn new(id: CounterpartId) -> Self {
        Self {
            id,
            iban: None,
            name: format!("New Counterpart({id})"),
            note: String::new(),
        }
    }

    pub fn from_parts(id: CounterpartId, iban: Option<Iban>, name: String, note: String) -> Self {
        Self {
            id,
            iban,
            name,
            note,
        }
    }
}

impl TaggedItem for CounterPart {
    type Id = CounterpartId;
    type Record = CounterpartRecord;

    const KIND: EntityKind = EntityKind::Counterpart;

    fn id(&self) -> CounterpartId {
        self.id
    }

    fn record_identifier(record: &CounterpartRecord) -> CounterpartId {
        record.identifier
    }

    fn with_defaults(id: CounterpartId, _lookup: &dyn EntityLookup) -> Self {
        Self::new(id)
    }

    fn to_record(&self) -> CounterpartRecord {
        CounterpartRecord {
            identifier: self.id,
            name: self.name.clone(),
            note: self.note.clone(),
            iban: self.iban.as_ref().map(|iban| iban.as_str().to_string()),
        }
    }

    fn from_record(
        id: CounterpartId,
        record: CounterpartRecord,
        _lookup: &dyn EntityLookup,
    ) -> Result<Self, RecordError> {
        let iban = record.iban.as_deref().map(Iban::parse).transpose()?;
        Ok(Self::from_parts(id, iban, record.name, record.note))
    }
}
