//! Join record metadata.
//!
//! [`JoinRecordMetadata`] merges the columns of joined tables into one schema
//! and resolves column names against it. Every column is registered under
//! two keys in a [`KeyedStore`]:
//! - the qualified key `(alias, column)`, which must be unique
//! - the unqualified key `(column)`, which is marked ambiguous once a second
//!   table contributes a column with the same name
//!
//! # Lifecycle
//!
//! Metadata is mutable while the planner adds columns. Once built it is
//! wrapped in a [`SharedJoinMetadata`] handle and only read from. Each plan
//! node holding the metadata takes its own handle via
//! [`SharedJoinMetadata::increment_ref_count`] and gives it back with
//! [`SharedJoinMetadata::close`]. The key store is released when the last
//! handle is closed.
//!
//! ```text
//! add("t1", "a") ─┬─ (t1, a) → 0
//!                 └─ (a)     → 0
//! add("t2", "a") ─┬─ (t2, a) → 1
//!                 └─ (a)     → -1   ambiguous
//! ```

pub mod errors;
mod shared;

pub use errors::JoinMetadataError;
pub use shared::SharedJoinMetadata;

use log::{debug, info, trace};

use crate::{
    config::JoinMetadataConfig,
    map::{KeyedStore, PagedKeyStore, QualifiedKey},
    metadata::{
        ColumnRegistry, ColumnType, MetadataError, RecordMetadata, TableColumnMetadata, NO_COLUMN,
    },
};

/// Separator between a table alias and a column name.
pub const ALIAS_SEPARATOR: char = '.';

/// Upper bound on descriptor slots allocated from the column count hint.
const MAX_PREALLOCATED_COLUMNS: usize = 1 << 16;

/// Outcome of resolving a column name against join metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnResolution {
    /// The name resolves to exactly one column.
    Found(usize),
    /// The bare name is shared by columns of several tables.
    Ambiguous,
    NotFound,
}

impl ColumnResolution {
    pub fn index(&self) -> Option<usize> {
        match self {
            ColumnResolution::Found(index) => Some(*index),
            _ => None,
        }
    }

    /// Collapse to the index-or-`-1` form used by [`RecordMetadata::column_index_quiet`].
    pub fn to_quiet_index(&self) -> i32 {
        self.index().map_or(NO_COLUMN, |index| index as i32)
    }
}

/// Split `alias.column` at the first separator.
fn split_qualified(name: &str) -> Option<(&str, &str)> {
    name.split_once(ALIAS_SEPARATOR)
}

fn lookup_key(name: &str) -> QualifiedKey {
    match split_qualified(name) {
        Some((alias, column)) => QualifiedKey::qualified(alias, column),
        None => QualifiedKey::unqualified(name),
    }
}

/// Merged metadata of the tables in a join.
#[derive(Debug)]
pub struct JoinRecordMetadata<S: KeyedStore = PagedKeyStore> {
    store: S,
    registry: ColumnRegistry,
    timestamp_index: i32,
}

impl JoinRecordMetadata<PagedKeyStore> {
    /// Create metadata for about `column_count` columns backed by a
    /// [`PagedKeyStore`] sized from `config`.
    pub fn new(config: &JoinMetadataConfig, column_count: usize) -> Self {
        let store = PagedKeyStore::new(
            config.page_size,
            JoinMetadataConfig::key_capacity(column_count),
            config.load_factor,
            config.max_resizes,
        );
        Self::with_store(store, column_count)
    }
}

impl<S: KeyedStore> JoinRecordMetadata<S> {
    pub fn with_store(store: S, column_count: usize) -> Self {
        JoinRecordMetadata {
            store,
            registry: ColumnRegistry::with_capacity(column_count.min(MAX_PREALLOCATED_COLUMNS)),
            timestamp_index: NO_COLUMN,
        }
    }

    /// Register a column of a joined table.
    ///
    /// `column_name` is either a bare name, registered under `alias`, or an
    /// already qualified `alias.column`, in which case `alias` must be `None`.
    /// A column with no alias from either source claims the bare name itself
    /// and therefore conflicts with any other column of that name.
    pub fn add(
        &mut self,
        alias: Option<&str>,
        column_name: &str,
        column_type: ColumnType,
    ) -> Result<(), JoinMetadataError> {
        let (key, display_name) = match (split_qualified(column_name), alias) {
            (Some(_), Some(alias)) => {
                return Err(JoinMetadataError::ConflictingAlias {
                    alias: alias.to_string(),
                    column: column_name.to_string(),
                })
            }
            (Some((embedded, column)), None) => (
                QualifiedKey::qualified(embedded, column),
                column_name.to_string(),
            ),
            (None, Some(alias)) => (
                QualifiedKey::qualified(alias, column_name),
                format!("{}{}{}", alias, ALIAS_SEPARATOR, column_name),
            ),
            (None, None) => (
                QualifiedKey::unqualified(column_name),
                column_name.to_string(),
            ),
        };

        let duplicate = || JoinMetadataError::DuplicateColumn {
            name: column_name.to_string(),
            alias: key.alias().map(str::to_string),
        };
        if self.store.find_value(&key).is_some() {
            return Err(duplicate());
        }

        // Both keys must fit before the column is registered
        self.store.reserve(if key.is_qualified() { 2 } else { 1 })?;
        let index = self.registry.len();

        let value = self.store.create_value(&key)?;
        if !value.is_new() {
            return Err(duplicate());
        }
        self.store.put_int(value.slot(), index as i32)?;

        if key.is_qualified() {
            let bare = QualifiedKey::unqualified(key.name());
            let value = self.store.create_value(&bare)?;
            if value.is_new() {
                self.store.put_int(value.slot(), index as i32)?;
            } else {
                // Bare name now belongs to more than one table
                trace!("Column name `{}` is ambiguous without an alias", bare);
                self.store.put_int(value.slot(), NO_COLUMN)?;
            }
        }

        self.registry
            .push(TableColumnMetadata::new(display_name, column_type));
        debug!("Added join column `{}` ({}) at index {}", key, column_type, index);
        Ok(())
    }

    /// Add every column of `source`, in order, under `alias`.
    ///
    /// Stops at the first failing column; earlier columns stay registered.
    pub fn copy_column_metadata_from<M>(
        &mut self,
        alias: Option<&str>,
        source: &M,
    ) -> Result<(), JoinMetadataError>
    where
        M: RecordMetadata + ?Sized,
    {
        for column in source.columns() {
            self.add(alias, column.name(), column.column_type())?;
        }
        Ok(())
    }

    /// Resolve `name`, which is either `alias.column` or a bare column name.
    pub fn resolve(&self, name: &str) -> ColumnResolution {
        let key = lookup_key(name);
        let resolution = match self
            .store
            .find_value(&key)
            .and_then(|value| self.store.get_int(value.slot()))
        {
            Some(index) if index >= 0 => ColumnResolution::Found(index as usize),
            Some(_) => ColumnResolution::Ambiguous,
            None => ColumnResolution::NotFound,
        };
        trace!("Resolved column `{}` to {:?}", name, resolution);
        resolution
    }

    /// Record which merged column orders rows by time. Not bounds checked.
    pub fn set_timestamp_index(&mut self, index: i32) {
        self.timestamp_index = index;
    }

    /// False once the key store has been released.
    pub fn is_open(&self) -> bool {
        !self.store.is_closed()
    }

    /// Finish construction and hand out the first shared handle.
    pub fn into_shared(self) -> SharedJoinMetadata<S> {
        SharedJoinMetadata::new(self)
    }
}

impl<S: KeyedStore> RecordMetadata for JoinRecordMetadata<S> {
    fn columns(&self) -> &[TableColumnMetadata] {
        self.registry.as_slice()
    }

    fn timestamp_index(&self) -> i32 {
        self.timestamp_index
    }

    fn column_index_quiet(&self, name: &str) -> i32 {
        self.resolve(name).to_quiet_index()
    }

    fn column_index(&self, name: &str) -> Result<usize, MetadataError> {
        match self.resolve(name) {
            ColumnResolution::Found(index) => Ok(index),
            ColumnResolution::Ambiguous => Err(MetadataError::AmbiguousColumn {
                name: name.to_string(),
            }),
            ColumnResolution::NotFound => Err(MetadataError::InvalidColumn {
                name: name.to_string(),
            }),
        }
    }
}

impl<S: KeyedStore> Drop for JoinRecordMetadata<S> {
    fn drop(&mut self) {
        info!(
            "Releasing join metadata with {} columns",
            self.registry.len()
        );
        self.store.close();
    }
}
