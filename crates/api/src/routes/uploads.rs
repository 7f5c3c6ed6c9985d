use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Upload routes mounted at `/uploads`.
///
/// ```text
/// POST   /preview   -> preview_upload
/// POST   /dedup     -> dedup_upload   (?keep=first|last|none&subset=A,B&format=json|csv)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/preview", post(uploads::preview_upload))
        .route("/dedup", post(uploads::dedup_upload))
}
