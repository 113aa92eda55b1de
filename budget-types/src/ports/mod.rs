//! Port traits the store and project layers build on.
//!
//! Entities implement `TaggedItem`; whoever owns the sibling stores
//! implements `EntityLookup` so transactions can resolve their references.

mod lookup;
mod tagged_item;

pub use lookup::{EmptyLookup, EntityLookup};
pub use tagged_item::{Identifier, TaggedItem};
