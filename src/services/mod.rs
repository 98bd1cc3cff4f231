//! Services the countdown depends on
//!
//! This module contains the persistent key-value storage and the clock.

pub mod clock;
pub mod storage;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{FileStorage, MemoryStorage, StateStore, Storage, DEFAULT_STORAGE_KEY};
