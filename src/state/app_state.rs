//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{CountdownController, DisplaySnapshot, Years};
use crate::error::CountdownError;

/// Application state shared by the HTTP handlers
pub struct AppState {
    /// The countdown itself
    pub controller: Arc<CountdownController>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(controller: Arc<CountdownController>, port: u16, host: String) -> Self {
        Self {
            controller,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start a countdown from user input
    pub fn start(&self, years: Years) -> Result<DisplaySnapshot, CountdownError> {
        let snapshot = self.controller.start(years)?;
        self.record_action("start");
        Ok(snapshot)
    }

    /// Reset the countdown once the user has confirmed
    pub fn reset(&self, confirmed: bool) -> Result<DisplaySnapshot, CountdownError> {
        if !confirmed {
            info!("Reset requested without confirmation");
            return Err(CountdownError::ConfirmationRequired);
        }
        let snapshot = self.controller.reset()?;
        self.record_action("reset");
        Ok(snapshot)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
