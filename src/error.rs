//! Error types for the countdown controller and its HTTP surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::responses::ErrorResponse;

/// Errors surfaced by countdown operations
#[derive(Debug, Error)]
pub enum CountdownError {
    /// The year count was empty, non-numeric, negative or not finite
    #[error("Please enter a non-negative number of years.")]
    InvalidYears { input: String },

    /// The year count would push the end date past the representable range
    #[error("Please enter at most {max} years.")]
    YearsOutOfRange { years: f64, max: f64 },

    /// A reset was requested without confirmation
    #[error("Clear saved countdown?")]
    ConfirmationRequired,

    /// The controller lock was poisoned by a panicking holder
    #[error("Failed to lock countdown state: {0}")]
    Lock(String),
}

impl CountdownError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidYears { .. } | Self::YearsOutOfRange { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::ConfirmationRequired => StatusCode::CONFLICT,
            Self::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CountdownError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
