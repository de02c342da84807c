//! Shared ownership of finished join metadata.

use std::ops::Deref;
use std::rc::Rc;

use log::{debug, trace};

use super::JoinRecordMetadata;
use crate::{
    map::{KeyedStore, PagedKeyStore},
    metadata::{MetadataError, RecordMetadata, TableColumnMetadata},
};

/// Reference-counted, read-only handle to [`JoinRecordMetadata`].
///
/// The handle created by [`JoinRecordMetadata::into_shared`] counts as the
/// first holder. Every further holder takes its own handle with
/// [`increment_ref_count`](Self::increment_ref_count) and releases it with
/// [`close`](Self::close); the key store is released with the last handle.
/// `close` consumes the handle, so a holder cannot release twice.
///
/// Handles are `!Send`: metadata is shared between plan stages on one
/// thread, not across threads.
#[derive(Debug)]
pub struct SharedJoinMetadata<S: KeyedStore = PagedKeyStore> {
    inner: Rc<JoinRecordMetadata<S>>,
}

impl<S: KeyedStore> SharedJoinMetadata<S> {
    pub fn new(metadata: JoinRecordMetadata<S>) -> Self {
        SharedJoinMetadata {
            inner: Rc::new(metadata),
        }
    }

    /// Take another handle on the same metadata.
    pub fn increment_ref_count(&self) -> Self {
        let handle = SharedJoinMetadata {
            inner: Rc::clone(&self.inner),
        };
        trace!("Join metadata ref count raised to {}", handle.ref_count());
        handle
    }

    /// Number of live handles.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// True when both handles point at the same metadata.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Release this handle. The last one to close releases the key store.
    pub fn close(self) {
        match Rc::try_unwrap(self.inner) {
            Ok(metadata) => {
                debug!("Last join metadata handle closed");
                drop(metadata);
            }
            Err(inner) => {
                trace!(
                    "Join metadata handle closed, {} remaining",
                    Rc::strong_count(&inner) - 1
                );
            }
        }
    }
}

impl<S: KeyedStore> Deref for SharedJoinMetadata<S> {
    type Target = JoinRecordMetadata<S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S: KeyedStore> RecordMetadata for SharedJoinMetadata<S> {
    fn columns(&self) -> &[TableColumnMetadata] {
        self.inner.columns()
    }

    fn timestamp_index(&self) -> i32 {
        self.inner.timestamp_index()
    }

    fn column_index_quiet(&self, name: &str) -> i32 {
        self.inner.column_index_quiet(name)
    }

    fn column_index(&self, name: &str) -> Result<usize, MetadataError> {
        self.inner.column_index(name)
    }
}
