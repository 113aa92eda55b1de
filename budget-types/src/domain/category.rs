//! Transaction category domain model.

use super::ids::{CategoryId, EntityKind};
use crate::error::RecordError;
use crate::ports::{EntityLookup, TaggedItem};
use crate::record::CategoryRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCategory {
    id: CategoryId,
    pub name: String,
    pub note: String,
}

impl TransactionCategory {
    /// Creates a category named `New Category(<id>)`.
    pub fn new(id: CategoryId) -> Self {
        Self {
            id,
            name: format!("New Category({id})"),
            note: String::new(),
        }
    }
}

impl TaggedItem for TransactionCategory {
    type Id = CategoryId;
    type Record = CategoryRecord;

    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn record_identifier(record: &CategoryRecord) -> CategoryId {
        record.identifier
    }

    fn with_defaults(id: CategoryId, _lookup: &dyn EntityLookup) -> Self {
        Self::new(id)
    }

    fn to_record(&self) -> CategoryRecord {
        CategoryRecord {
            identifier: self.id,
            name: self.name.clone(),
            note: self.note.clone(),
        }
    }

    fn from_record(
        id: CategoryId,
        record: CategoryRecord,
        _lookup: &dyn EntityLookup,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            id,
            name: record.name,
            note: record.note,
        })
    }
}
