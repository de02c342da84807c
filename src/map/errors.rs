use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Key store is closed")]
    Closed,

    #[error("Key store cannot grow beyond {capacity} keys after {max_resizes} resizes")]
    CapacityExceeded { capacity: usize, max_resizes: u32 },

    #[error("No value slot {slot} in key store")]
    InvalidSlot { slot: usize },
}
