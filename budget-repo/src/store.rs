//! Generic identifier-keyed store for one entity kind.

use indexmap::IndexMap;
use std::ops::Index;
use tracing::debug;

use budget_types::{EntityLookup, Identifier, RecordError, TaggedItem};

use crate::error::RepoError;

/// Smallest non-negative identifier for which `taken` is false.
pub(crate) fn smallest_unused<I: Identifier>(taken: impl Fn(I) -> bool) -> I {
    let mut index = 0;
    while taken(I::from_index(index)) {
        index += 1;
    }
    I::from_index(index)
}

/// Ordered collection of entities keyed by their identifier.
///
/// Iteration follows insertion order. Identifiers are never renumbered;
/// new ones fill the lowest gap.
#[derive(Debug, Clone)]
pub struct TaggedItems<T: TaggedItem> {
    items: IndexMap<T::Id, T>,
}

impl<T: TaggedItem> Default for TaggedItems<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TaggedItem> TaggedItems<T> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Returns the smallest identifier not currently in use.
    pub fn get_new_identifier(&self) -> T::Id {
        smallest_unused(|id| self.items.contains_key(&id))
    }

    /// Creates an entity and inserts it.
    ///
    /// Without `fields` the entity gets its defaults, otherwise it is rebuilt
    /// from the record with references resolved through `lookup`.
    ///
    /// # Panics
    /// If `id` is given and already present.
    pub fn create_new_item(
        &mut self,
        id: Option<T::Id>,
        fields: Option<T::Record>,
        lookup: &dyn EntityLookup,
    ) -> Result<&mut T, RecordError> {
        let id = match id {
            Some(id) => {
                assert!(
                    !self.items.contains_key(&id),
                    "{} {} already exists",
                    T::KIND,
                    id
                );
                id
            }
            None => self.get_new_identifier(),
        };

        let item = match fields {
            Some(record) => T::from_record(id, record, lookup)?,
            None => T::with_defaults(id, lookup),
        };
        debug!(kind = %T::KIND, %id, "Created item");
        Ok(self.insert(id, item))
    }

    /// Inserts a value copy of `id` under a fresh identifier.
    pub fn copy_item(&mut self, id: T::Id, lookup: &dyn EntityLookup) -> Result<&mut T, RepoError> {
        let new_id = self.get_new_identifier();
        let copy = self
            .get(id)
            .ok_or_else(|| not_found::<T>(id))?
            .duplicate(new_id, lookup)
            .map_err(|source| RepoError::Record {
                kind: T::KIND,
                identifier: id.index(),
                source,
            })?;
        debug!(kind = %T::KIND, from = %id, to = %new_id, "Copied item");
        Ok(self.insert(new_id, copy))
    }

    fn insert(&mut self, id: T::Id, item: T) -> &mut T {
        let (index, _) = self.items.insert_full(id, item);
        &mut self.items[index]
    }

    /// Removes and returns an entity, keeping the order of the rest.
    pub fn pop(&mut self, id: T::Id) -> Result<T, RepoError> {
        let item = self
            .items
            .shift_remove(&id)
            .ok_or_else(|| not_found::<T>(id))?;
        debug!(kind = %T::KIND, %id, "Removed item");
        Ok(item)
    }

    pub fn delete_item(&mut self, id: T::Id) -> Result<(), RepoError> {
        self.pop(id).map(drop)
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = T::Id> + '_ {
        self.items.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T::Id, &T)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Serialized form of every entity, in store order.
    pub fn dump(&self) -> IndexMap<T::Id, T::Record> {
        self.items
            .iter()
            .map(|(id, item)| (*id, item.to_record()))
            .collect()
    }

    /// Creates one entity per record, in input order.
    pub fn load(
        &mut self,
        records: IndexMap<T::Id, T::Record>,
        lookup: &dyn EntityLookup,
    ) -> Result<(), RepoError> {
        for (id, record) in records {
            self.create_new_item(Some(id), Some(record), lookup)
                .map_err(|source| RepoError::Record {
                    kind: T::KIND,
                    identifier: id.index(),
                    source,
                })?;
        }
        Ok(())
    }
}

fn not_found<T: TaggedItem>(id: T::Id) -> RepoError {
    RepoError::KeyNotFound {
        kind: T::KIND,
        identifier: id.index(),
    }
}

/// # Panics
/// If `id` is not in the store.
impl<T: TaggedItem> Index<T::Id> for TaggedItems<T> {
    type Output = T;

    fn index(&self, id: T::Id) -> &T {
        match self.items.get(&id) {
            Some(item) => item,
            None => panic!("{} {} not found", T::KIND, id),
        }
    }
}
