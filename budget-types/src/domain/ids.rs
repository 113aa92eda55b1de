//! Identifiers for project entities.
//!
//! Every store hands out small non-negative integers. Each entity kind gets
//! its own newtype so a transaction cannot point at a category by accident.

use serde::{Deserialize, Serialize};

use crate::ports::Identifier;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an identifier from its integer value.
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Returns the integer value.
            pub const fn value(self) -> u32 {
                self.0
            }
        }

        impl Identifier for $name {
            fn from_index(index: u32) -> Self {
                Self(index)
            }

            fn index(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(
    /// Identifier of a bank account within its project.
    AccountId
);
define_id!(
    /// Identifier of a counterpart within its project.
    CounterpartId
);
define_id!(
    /// Identifier of a transaction category within its project.
    CategoryId
);
define_id!(
    /// Identifier of a transaction within its project.
    TransactionId
);
define_id!(
    /// Identifier of a CSV import mapping within its project.
    MappingId
);
define_id!(
    /// Runtime identifier of an open project in the registry. Never persisted.
    ProjectId
);

/// The entity kinds a project stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Account,
    Counterpart,
    Category,
    Transaction,
    CsvMapping,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Account => write!(f, "bank account"),
            EntityKind::Counterpart => write!(f, "counterpart"),
            EntityKind::Category => write!(f, "transaction category"),
            EntityKind::Transaction => write!(f, "transaction"),
            EntityKind::CsvMapping => write!(f, "CSV mapping"),
        }
    }
}
