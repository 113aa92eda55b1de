//! On-disk layout of `project.json`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use budget_types::{
    AccountRecord, CategoryRecord, CounterpartRecord, CsvMappingRecord, Identifier, TaggedItem,
    TransactionRecord,
};

use crate::error::RepoError;
use crate::store::TaggedItems;

/// File name of the project document inside a project directory.
pub const PROJECT_FILE: &str = "project.json";

/// A section maps identifiers, written as JSON object keys, to records.
pub type Section<R> = IndexMap<String, R>;

/// The whole project as one JSON object.
///
/// Field order is the write order and the load order: transactions come after
/// the three kinds they reference. Empty stores are omitted, and unknown
/// top-level keys are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_categories: Option<Section<CategoryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_accounts: Option<Section<AccountRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparts: Option<Section<CounterpartRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Section<TransactionRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_csv_mappings: Option<Section<CsvMappingRecord>>,
}

impl ProjectDocument {
    /// Renders the document with four-space indentation.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, RepoError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        out.push(b'\n');
        Ok(out)
    }
}

/// Dumps a store into a section, `None` when the store is empty.
pub(crate) fn section_of<T: TaggedItem>(store: &TaggedItems<T>) -> Option<Section<T::Record>> {
    if store.is_empty() {
        return None;
    }
    Some(
        store
            .dump()
            .into_iter()
            .map(|(id, record)| (id.to_string(), record))
            .collect(),
    )
}

/// Parses the section keys back into identifiers, keeping file order.
///
/// Each key must match the `identifier` stored inside its record.
pub(crate) fn parse_section<T: TaggedItem>(
    section: Section<T::Record>,
) -> Result<IndexMap<T::Id, T::Record>, RepoError> {
    let mut records = IndexMap::with_capacity(section.len());
    for (key, record) in section {
        let id = key
            .parse::<u32>()
            .ok()
            .map(T::Id::from_index)
            // "1" and "01" would collide on the same identifier
            .filter(|id| !records.contains_key(id))
            .filter(|id| *id == T::record_identifier(&record))
            .ok_or_else(|| RepoError::InvalidIdentifier {
                kind: T::KIND,
                key: key.clone(),
            })?;
        records.insert(id, record);
    }
    Ok(records)
}
