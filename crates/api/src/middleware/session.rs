//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tabula_core::error::CoreError;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the session ID handed out by `POST /api/v1/sessions`.
pub const SESSION_HEADER: &str = "x-session-id";

/// The live session identified by the `x-session-id` request header.
///
/// Use this as an extractor parameter in any handler that works on the
/// caller's table:
///
/// ```ignore
/// async fn my_handler(session: CurrentSession) -> AppResult<Json<()>> {
///     tracing::info!(session_id = %session.session_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession {
    pub session_id: Uuid,
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {SESSION_HEADER} header"
                )))
            })?;

        let session_id = Uuid::parse_str(raw.trim()).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Malformed session id".into()))
        })?;

        if !state.sessions.contains(session_id).await {
            return Err(session_expired());
        }

        Ok(CurrentSession { session_id })
    }
}

/// Error returned when a session ended or expired mid-flight.
pub fn session_expired() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Unknown or expired session".into(),
    ))
}
