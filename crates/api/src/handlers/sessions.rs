//! Handlers for session lifecycle.
//!
//! A session is started explicitly, carries its own seeded table, and ends
//! either on request or when the sweeper finds it idle.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::session::{session_expired, CurrentSession};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/sessions
///
/// Start a session with the default two-row table.
pub async fn start_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let info = state.sessions.create().await;

    tracing::info!(session_id = %info.session_id, "Session started");

    Ok((StatusCode::CREATED, Json(DataResponse { data: info })))
}

/// GET /api/v1/sessions/current
pub async fn get_session(
    session: CurrentSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let info = state
        .sessions
        .info(session.session_id)
        .await
        .ok_or_else(session_expired)?;

    Ok(Json(DataResponse { data: info }))
}

/// DELETE /api/v1/sessions/current
///
/// End the session and discard its table.
pub async fn end_session(
    session: CurrentSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    if !state.sessions.end(session.session_id).await {
        return Err(session_expired());
    }

    tracing::info!(session_id = %session.session_id, "Session ended");

    Ok(StatusCode::NO_CONTENT)
}
