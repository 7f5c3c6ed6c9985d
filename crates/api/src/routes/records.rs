//! Route definitions for the CRUD dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::records;
use crate::state::AppState;

/// Record routes mounted at `/records`. All require `x-session-id`.
///
/// ```text
/// GET    /          -> list_records
/// POST   /          -> create_record
/// GET    /ids       -> list_record_ids
/// GET    /{id}      -> get_record
/// PUT    /{id}      -> update_record
/// DELETE /{id}      -> delete_record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(records::list_records).post(records::create_record),
        )
        .route("/ids", get(records::list_record_ids))
        .route(
            "/{id}",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
}
