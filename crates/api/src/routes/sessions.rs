use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Session routes mounted at `/sessions`.
///
/// ```text
/// POST   /          -> start_session
/// GET    /current   -> get_session
/// DELETE /current   -> end_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::start_session))
        .route(
            "/current",
            get(sessions::get_session).delete(sessions::end_session),
        )
}
