//! Background tasks module
//!
//! This module contains the background task that drives the countdown.

pub mod ticker;

// Re-export main functions
pub use ticker::{spawn_ticker, TICK_INTERVAL};
