//! Life Clock - A state-managed HTTP server that counts down a number of years
//!
//! A countdown is started from a year count, persisted so it survives
//! restarts, and recomputed once per second into a display snapshot that
//! clients poll or stream.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::CountdownError;
pub use state::{AppState, CountdownController, DisplaySnapshot, Years};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
