//! Reference resolution port.

use crate::domain::{AccountId, CategoryId, CounterpartId};

/// Read-only view of the stores a transaction may reference.
///
/// Transactions hold references as identifiers only; this trait is how they
/// check that an identifier exists in the owning project.
pub trait EntityLookup {
    fn contains_account(&self, id: AccountId) -> bool;

    fn contains_counterpart(&self, id: CounterpartId) -> bool;

    fn contains_category(&self, id: CategoryId) -> bool;

    /// First account in store order, used as the default for new transactions.
    fn first_account(&self) -> Option<AccountId>;
}

/// A lookup over a project with no accounts, counterparts or categories.
///
/// Kinds without references never consult their lookup, so stores of those
/// kinds are driven with this.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLookup;

impl EntityLookup for EmptyLookup {
    fn contains_account(&self, _id: AccountId) -> bool {
        false
    }

    fn contains_counterpart(&self, _id: CounterpartId) -> bool {
        false
    }

    fn contains_category(&self, _id: CategoryId) -> bool {
        false
    }

    fn first_account(&self) -> Option<AccountId> {
        None
    }
}
