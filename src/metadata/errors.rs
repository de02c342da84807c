//! Error types for record metadata lookups.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetadataError {
    #[error("Invalid column: `{name}`")]
    InvalidColumn { name: String },

    #[error("Ambiguous column: `{name}`, qualify it with a table alias")]
    AmbiguousColumn { name: String },

    #[error("Duplicate column `{name}` in table metadata")]
    DuplicateColumn { name: String },
}
