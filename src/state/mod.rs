//! State management module
//!
//! This module contains the countdown record, its display snapshot, and the
//! controller that owns both.

pub mod app_state;
pub mod controller;
pub mod countdown_state;
pub mod snapshot;
pub mod years;

// Re-export main types
pub use app_state::AppState;
pub use controller::{CountdownController, TickOutcome};
pub use countdown_state::{CountdownState, Timing};
pub use snapshot::{DisplaySnapshot, Phase};
pub use years::{years_to_ms, Years};
