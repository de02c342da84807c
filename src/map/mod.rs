//! Keyed lookup store capability.
//!
//! Join metadata resolves names through a map from a composite
//! `(alias, column)` key to a small integer value. The map itself is a
//! collaborator: [`KeyedStore`] describes what the resolver needs from it,
//! and [`PagedKeyStore`] is the in-memory implementation used by default.
//!
//! The capability mirrors a two-step protocol:
//! - `create_value` resolves a key to a value slot, creating it if absent,
//!   and reports whether the slot is new
//! - `find_value` resolves a key without creating anything
//! - `put_int` / `get_int` write and read the slot's integer value

pub mod errors;
mod paged_store;

pub use errors::StoreError;
pub use paged_store::PagedKeyStore;

use std::fmt;

/// Index of a value slot inside a [`KeyedStore`].
pub type SlotId = usize;

/// Composite key of an optional table alias and a bare column name.
///
/// Two keys are equal only when both components match, so `t1.a`, `t2.a`
/// and the unqualified `a` are three distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedKey {
    alias: Option<String>,
    name: String,
}

impl QualifiedKey {
    pub fn new(alias: Option<&str>, name: &str) -> Self {
        QualifiedKey {
            alias: alias.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Key for `alias.name`.
    pub fn qualified(alias: &str, name: &str) -> Self {
        Self::new(Some(alias), name)
    }

    /// Key for a bare column name.
    pub fn unqualified(name: &str) -> Self {
        Self::new(None, name)
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_qualified(&self) -> bool {
        self.alias.is_some()
    }
}

impl fmt::Display for QualifiedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{}.{}", alias, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Value slot handed out by [`KeyedStore::create_value`] and
/// [`KeyedStore::find_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapValue {
    slot: SlotId,
    new: bool,
}

impl MapValue {
    pub fn new(slot: SlotId, new: bool) -> Self {
        MapValue { slot, new }
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// True when the key did not exist before `create_value`.
    pub fn is_new(&self) -> bool {
        self.new
    }
}

/// Map from [`QualifiedKey`] to a single `i32` value slot.
#[cfg_attr(test, mockall::automock)]
pub trait KeyedStore {
    /// Make room for `additional` new keys. On success the next `additional`
    /// calls to [`KeyedStore::create_value`] cannot fail for lack of capacity;
    /// on failure the store is unchanged.
    fn reserve(&mut self, additional: usize) -> Result<(), StoreError>;

    /// Resolve `key` to its slot, creating an empty slot when absent.
    fn create_value(&mut self, key: &QualifiedKey) -> Result<MapValue, StoreError>;

    /// Resolve `key` to its slot without creating it.
    fn find_value(&self, key: &QualifiedKey) -> Option<MapValue>;

    fn put_int(&mut self, slot: SlotId, value: i32) -> Result<(), StoreError>;

    fn get_int(&self, slot: SlotId) -> Option<i32>;

    /// Number of keys in the store.
    fn len(&self) -> usize;

    /// Release the store's storage. Subsequent operations fail or find nothing.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}
