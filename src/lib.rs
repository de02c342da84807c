//! Joinmeta - Join record metadata for a SQL query engine
//!
//! This crate merges the column sets of joined tables into a single schema:
//! - Alias-qualified (`t.col`) and bare (`col`) column lookups
//! - Ambiguity tracking for bare names shared by several tables
//! - A keyed lookup store capability with a paged in-memory default
//! - Shared, reference-counted ownership across query plan nodes

pub mod config;
pub mod description;
pub mod join;
pub mod map;
pub mod metadata;

pub use config::JoinMetadataConfig;
pub use join::{ColumnResolution, JoinMetadataError, JoinRecordMetadata, SharedJoinMetadata};
pub use map::{KeyedStore, PagedKeyStore, QualifiedKey};
pub use metadata::{ColumnType, GenericRecordMetadata, RecordMetadata, TableColumnMetadata};
