//! # Budget Repository
//!
//! Persistence layer for budget projects:
//! - `TaggedItems<T>` - ordered identifier-keyed store for one entity kind
//! - `Project` - one store per kind, loaded from and saved to `project.json`
//! - `Projects` - registry of the projects currently open
//!
//! Everything here is synchronous; load and save are blocking filesystem calls.

mod document;
mod error;
mod import;
mod project;
mod registry;
mod store;

#[cfg(test)]
mod project_tests;

pub use document::{PROJECT_FILE, ProjectDocument};
pub use error::RepoError;
pub use import::ImportSummary;
pub use project::{Project, ProjectItem, Siblings};
pub use registry::Projects;
pub use store::TaggedItems;
