//! Mapping from transaction fields to columns of a bank's CSV export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::{EntityKind, MappingId};
use crate::error::RecordError;
use crate::ports::{EntityLookup, TaggedItem};
use crate::record::CsvMappingRecord;

/// Transaction fields that can be read from a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CsvField {
    Date,
    Amount,
    Counterpart,
    Account,
    Note,
}

impl CsvField {
    pub const ALL: [CsvField; 5] = [
        CsvField::Date,
        CsvField::Amount,
        CsvField::Counterpart,
        CsvField::Account,
        CsvField::Note,
    ];
}

impl std::fmt::Display for CsvField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvField::Date => write!(f, "DATE"),
            CsvField::Amount => write!(f, "AMOUNT"),
            CsvField::Counterpart => write!(f, "COUNTERPART"),
            CsvField::Account => write!(f, "ACCOUNT"),
            CsvField::Note => write!(f, "NOTE"),
        }
    }
}

/// Describes how to read transactions from one CSV layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCsvMapping {
    id: MappingId,
    pub name: String,
    columns: BTreeMap<CsvField, Option<usize>>,
}

impl TransactionCsvMapping {
    /// Creates a mapping named `New Reader(<id>)` that imports nothing.
    pub fn new(id: MappingId) -> Self {
        Self {
            id,
            name: format!("New Reader({id})"),
            columns: CsvField::ALL.iter().map(|field| (*field, None)).collect(),
        }
    }

    /// Zero-based column for `field`, `None` if the field is not imported.
    pub fn column(&self, field: CsvField) -> Option<usize> {
        self.columns.get(&field).copied().flatten()
    }

    pub fn set_column(&mut self, field: CsvField, column: Option<usize>) {
        self.columns.insert(field, column);
    }

    /// Iterates over all five fields in a fixed order.
    pub fn columns(&self) -> impl Iterator<Item = (CsvField, Option<usize>)> + '_ {
        self.columns.iter().map(|(field, column)| (*field, *column))
    }
}

impl TaggedItem for TransactionCsvMapping {
    type Id = MappingId;
    type Record = CsvMappingRecord;

    const KIND: EntityKind = EntityKind::CsvMapping;

    fn id(&self) -> MappingId {
        self.id
    }

    fn record_identifier(record: &CsvMappingRecord) -> MappingId {
        record.identifier
    }

    fn with_defaults(id: MappingId, _lookup: &dyn EntityLookup) -> Self {
        Self::new(id)
    }

    fn to_record(&self) -> CsvMappingRecord {
        CsvMappingRecord {
            identifier: self.id,
            name: self.name.clone(),
            column_map: self.columns.clone(),
        }
    }

    fn from_record(
        id: MappingId,
        record: CsvMappingRecord,
        _lookup: &dyn EntityLookup,
    ) -> Result<Self, RecordError> {
        let mut mapping = Self::new(id);
        mapping.name = record.name;
        // Fields missing from the record stay unmapped.
        mapping.columns.extend(record.column_map);
        Ok(mapping)
    }
}
