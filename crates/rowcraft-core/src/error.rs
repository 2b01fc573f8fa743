//! Error types for statement rendering.

use thiserror::Error;

/// Errors raised before any SQL text is produced.
///
/// Rendering is plain string assembly, so every variant describes metadata
/// that cannot yield a valid statement rather than a runtime fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The statement has no table metadata attached.
    #[error("no table metadata attached to the statement")]
    NoTable,

    /// The table declares no columns (or none readable for a projection).
    #[error("table '{table}' has no columns")]
    NoColumns {
        /// The offending table.
        table: String,
    },

    /// A foreign reference points at a table without a primary key.
    #[error("table '{table}' has no primary key but is used as a reference")]
    MissingPrimaryKey {
        /// The referenced table.
        table: String,
    },
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;
