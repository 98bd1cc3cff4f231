//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{info, warn};

use crate::{
    error::CountdownError,
    state::{AppState, Years},
};
use super::responses::{ApiResponse, HealthResponse, ResetRequest, StartRequest, StatusResponse};

/// Handle POST /start - Validate the year count and start a countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<StartRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, CountdownError> {
    // Unreadable bodies get the same warning as unreadable year counts
    let Json(request) = request.map_err(|rejection| {
        warn!("Rejected unreadable start request: {}", rejection.body_text());
        CountdownError::InvalidYears {
            input: rejection.body_text(),
        }
    })?;

    let years = Years::from_json(&request.years).map_err(|e| {
        warn!("Rejected start request with years={}: {}", request.years, e);
        e
    })?;

    let snapshot = state.start(years)?;
    info!("Start endpoint called - {} years", years.value());
    Ok(Json(ApiResponse::started(snapshot)))
}

/// Handle POST /reset - Clear the countdown after confirmation
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    request: Option<Json<ResetRequest>>,
) -> Result<Json<ApiResponse>, CountdownError> {
    let confirmed = request.map_or(false, |Json(r)| r.confirm);
    let snapshot = state.reset(confirmed)?;
    info!("Reset endpoint called - countdown cleared");
    Ok(Json(ApiResponse::reset(snapshot)))
}

/// Handle GET /status - Return the current snapshot and record
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, CountdownError> {
    let record = state.controller.state()?;
    let ticking = state.controller.is_ticking()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        snapshot: state.controller.snapshot(),
        state: record,
        ticking,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every published snapshot
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.controller.subscribe();

    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        let event = match Event::default().event("snapshot").json_data(&snapshot) {
            Ok(event) => event,
            Err(e) => {
                warn!("Failed to encode snapshot event: {}", e);
                return None;
            }
        };
        Some((Ok::<_, Infallible>(event), (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
