//! Repository-level errors.

use std::path::PathBuf;

use budget_types::{EntityKind, ProjectId, RecordError};

/// Errors raised by stores, projects and the registry.
///
/// Load and save are all-or-nothing: any of these aborts the whole operation.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid project file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {kind} {identifier}: {source}")]
    Record {
        kind: EntityKind,
        identifier: u32,
        source: RecordError,
    },

    #[error("Invalid {kind} identifier '{key}'")]
    InvalidIdentifier { kind: EntityKind, key: String },

    #[error("{kind} {identifier} not found")]
    KeyNotFound { kind: EntityKind, identifier: u32 },

    #[error("Project {0} is not open")]
    ProjectNotFound(ProjectId),

    #[error("{kind} {identifier} is used by {transactions} transaction(s)")]
    ItemInUse {
        kind: EntityKind,
        identifier: u32,
        transactions: usize,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import failed at row {row}: {reason}")]
    Import { row: usize, reason: String },
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> RepoError {
        let path = path.into();
        move |source| RepoError::Io { path, source }
    }
}
