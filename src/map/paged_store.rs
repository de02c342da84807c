//! Paged in-memory key store
//!
//! Keys live in a hash index sized from the expected key count and load
//! factor. Values are `i32` slots laid out in fixed-size pages, so growing
//! the store never moves existing values.

use std::collections::HashMap;
use std::mem::size_of;

use log::{debug, warn};

use super::{KeyedStore, MapValue, QualifiedKey, SlotId, StoreError};

const MIN_KEY_CAPACITY: usize = 16;
/// Largest capacity allocated up front; bigger hints are reached by growing.
const MAX_INITIAL_KEY_CAPACITY: usize = 1 << 20;
const DEFAULT_LOAD_FACTOR: f64 = 0.6;

#[derive(Debug)]
pub struct PagedKeyStore {
    index: HashMap<QualifiedKey, SlotId>,
    pages: Vec<Box<[i32]>>,
    slots_per_page: usize,
    key_capacity: usize,
    load_factor: f64,
    resize_count: u32,
    max_resizes: u32,
    closed: bool,
}

impl PagedKeyStore {
    /// Create a store for roughly `key_capacity` keys.
    ///
    /// `page_size` is in bytes and is rounded down to whole value slots.
    /// A load factor outside `(0, 1)` falls back to the default of 0.6, and
    /// the initial allocation is capped at 2^20 keys.
    pub fn new(page_size: usize, key_capacity: usize, load_factor: f64, max_resizes: u32) -> Self {
        let slots_per_page = (page_size / size_of::<i32>()).max(1);
        let load_factor = if load_factor > 0.0 && load_factor < 1.0 {
            load_factor
        } else {
            warn!(
                "Key store load factor {} is outside (0, 1), using {}",
                load_factor, DEFAULT_LOAD_FACTOR
            );
            DEFAULT_LOAD_FACTOR
        };
        let key_capacity = ((key_capacity as f64 / load_factor).ceil() as usize)
            .clamp(MIN_KEY_CAPACITY, MAX_INITIAL_KEY_CAPACITY)
            .next_power_of_two();

        let mut store = PagedKeyStore {
            index: HashMap::with_capacity(key_capacity),
            pages: Vec::new(),
            slots_per_page,
            key_capacity,
            load_factor,
            resize_count: 0,
            max_resizes,
            closed: false,
        };
        store.reserve_pages(store.threshold());

        debug!(
            "Allocated key store: key_capacity={}, slots_per_page={}, pages={}",
            store.key_capacity,
            store.slots_per_page,
            store.pages.len()
        );
        store
    }

    /// Current key capacity, before load factor is applied.
    pub fn capacity(&self) -> usize {
        self.key_capacity
    }

    pub fn allocated_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn resize_count(&self) -> u32 {
        self.resize_count
    }

    fn threshold(&self) -> usize {
        self.threshold_for(self.key_capacity)
    }

    fn threshold_for(&self, key_capacity: usize) -> usize {
        ((key_capacity as f64 * self.load_factor) as usize).max(1)
    }

    fn reserve_pages(&mut self, slot_count: usize) {
        let needed = slot_count.div_ceil(self.slots_per_page);
        while self.pages.len() < needed {
            self.pages
                .push(vec![0; self.slots_per_page].into_boxed_slice());
        }
    }

    /// Capacity needed to hold `key_count` keys, or `None` when that takes
    /// more resizes than allowed.
    fn capacity_for(&self, key_count: usize) -> Option<(usize, u32)> {
        let mut capacity = self.key_capacity;
        let mut resizes = self.resize_count;
        while self.threshold_for(capacity) < key_count {
            if resizes >= self.max_resizes {
                return None;
            }
            capacity = capacity.checked_mul(2)?;
            resizes += 1;
        }
        Some((capacity, resizes))
    }

    fn slot_mut(&mut self, slot: SlotId) -> Option<&mut i32> {
        let per_page = self.slots_per_page;
        self.pages
            .get_mut(slot / per_page)
            .map(|page| &mut page[slot % per_page])
    }
}

impl KeyedStore for PagedKeyStore {
    fn reserve(&mut self, additional: usize) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        let key_count = self.index.len().saturating_add(additional);
        let (capacity, resizes) = self.capacity_for(key_count).ok_or(StoreError::CapacityExceeded {
            capacity: self.key_capacity,
            max_resizes: self.max_resizes,
        })?;
        if capacity == self.key_capacity {
            return Ok(());
        }

        self.key_capacity = capacity;
        self.resize_count = resizes;
        self.index.reserve(capacity - self.index.len());
        warn!(
            "Key store resized to {} keys (resize {})",
            self.key_capacity, self.resize_count
        );
        Ok(())
    }

    fn create_value(&mut self, key: &QualifiedKey) -> Result<MapValue, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if let Some(&slot) = self.index.get(key) {
            return Ok(MapValue::new(slot, false));
        }
        self.reserve(1)?;

        let slot = self.index.len();
        self.reserve_pages(slot + 1);
        if let Some(value) = self.slot_mut(slot) {
            *value = 0;
        }
        self.index.insert(key.clone(), slot);
        Ok(MapValue::new(slot, true))
    }

    fn find_value(&self, key: &QualifiedKey) -> Option<MapValue> {
        self.index.get(key).map(|&slot| MapValue::new(slot, false))
    }

    fn put_int(&mut self, slot: SlotId, value: i32) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if slot >= self.index.len() {
            return Err(StoreError::InvalidSlot { slot });
        }
        match self.slot_mut(slot) {
            Some(target) => {
                *target = value;
                Ok(())
            }
            None => Err(StoreError::InvalidSlot { slot }),
        }
    }

    fn get_int(&self, slot: SlotId) -> Option<i32> {
        if slot >= self.index.len() {
            return None;
        }
        self.pages
            .get(slot / self.slots_per_page)
            .map(|page| page[slot % self.slots_per_page])
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        debug!(
            "Releasing key store: keys={}, pages={}",
            self.index.len(),
            self.pages.len()
        );
        self.index = HashMap::new();
        self.pages = Vec::new();
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
