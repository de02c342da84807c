//! Error types for building join metadata.
//!
//! All of these abort construction. Metadata that failed to build may hold
//! some of the columns added before the failure and should be discarded.

use thiserror::Error;

use crate::map::StoreError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum JoinMetadataError {
    #[error("Duplicate column [name={name}, tableAlias={}]", .alias.as_deref().unwrap_or("null"))]
    DuplicateColumn { name: String, alias: Option<String> },

    #[error("Column `{column}` already carries a table alias and cannot be added under alias `{alias}`")]
    ConflictingAlias { alias: String, column: String },

    #[error("Join metadata key store error: {0}")]
    Store(#[from] StoreError),
}
