pub mod health;
pub mod records;
pub mod sessions;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                   start (POST)
/// /sessions/current           info (GET), end (DELETE)
///
/// /records                    list (GET), create (POST)
/// /records/ids                select-box options (GET)
/// /records/{id}               get, update (PUT), delete
///
/// /uploads/preview            parse uploaded CSV (POST, multipart)
/// /uploads/dedup              remove duplicate rows (POST, multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sessions", sessions::router())
        .nest("/records", records::router())
        .nest("/uploads", uploads::router())
}
