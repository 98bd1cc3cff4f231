//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{CountdownState, DisplaySnapshot, Phase};

/// Body of POST /start; `years` may be a number or a numeric string
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub years: Value,
}

/// Body of POST /reset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: DisplaySnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, snapshot: DisplaySnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            snapshot,
        }
    }

    /// Response for a freshly started countdown
    pub fn started(snapshot: DisplaySnapshot) -> Self {
        match snapshot.phase {
            Phase::Ended => Self::new(
                "ended".to_string(),
                "Countdown started and already ended".to_string(),
                snapshot,
            ),
            _ => Self::new("running".to_string(), "Countdown started".to_string(), snapshot),
        }
    }

    /// Response for a cleared countdown
    pub fn reset(snapshot: DisplaySnapshot) -> Self {
        Self::new("idle".to_string(), "Countdown cleared".to_string(), snapshot)
    }
}

/// Body returned with a non-success status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub warning: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(warning: String) -> Self {
        Self {
            status: "error".to_string(),
            warning,
            timestamp: Utc::now(),
        }
    }
}

/// Status response with the current snapshot and record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub snapshot: DisplaySnapshot,
    pub state: CountdownState,
    pub ticking: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
