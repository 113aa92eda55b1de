//! The capability every stored entity provides.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::hash::Hash;

use super::EntityLookup;
use crate::domain::EntityKind;
use crate::error::RecordError;

/// A store-allocated integer identifier.
pub trait Identifier: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    fn from_index(index: u32) -> Self;

    fn index(self) -> u32;
}

/// An entity with a store-assigned identifier and a flat serialized record.
///
/// `from_record(id, item.to_record(), lookup)` must reproduce an item whose
/// own `to_record` is equal to the original one, apart from the identifier.
pub trait TaggedItem: Clone + fmt::Debug + Sized {
    type Id: Identifier;
    type Record: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    /// The identifier a stored record carries.
    fn record_identifier(record: &Self::Record) -> Self::Id;

    /// Builds a fresh entity with every field at its default.
    fn with_defaults(id: Self::Id, lookup: &dyn EntityLookup) -> Self;

    fn to_record(&self) -> Self::Record;

    /// Rebuilds an entity from a stored record, resolving references through `lookup`.
    fn from_record(
        id: Self::Id,
        record: Self::Record,
        lookup: &dyn EntityLookup,
    ) -> Result<Self, RecordError>;

    /// Value copy under a new identifier. References are copied by identifier.
    fn duplicate(&self, new_id: Self::Id, lookup: &dyn EntityLookup) -> Result<Self, RecordError> {
        Self::from_record(new_id, self.to_record(), lookup)
    }
}
