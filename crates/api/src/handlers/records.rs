//! Handlers for the CRUD dashboard.
//!
//! Each endpoint corresponds to one tab of the dashboard: Create, Read,
//! Update and Delete, plus the ID options offered by the Update and Delete
//! select boxes. Every operation works on the caller's session table.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tabula_core::error::CoreError;
use tabula_core::records::{Record, RecordInput, RecordTable, COLUMNS};
use tabula_core::types::RecordId;

use crate::error::AppResult;
use crate::middleware::session::{session_expired, CurrentSession};
use crate::response::{DataResponse, WithMessage};
use crate::state::AppState;

pub const EMPTY_TABLE_MESSAGE: &str = "No entries to display.";
pub const CREATED_MESSAGE: &str = "Entry added successfully!";
pub const UPDATED_MESSAGE: &str = "Entry updated successfully!";
pub const DELETED_MESSAGE: &str = "Entry deleted successfully!";

/// The Read tab: column headers, rows, and an info message when empty.
#[derive(Debug, Serialize)]
pub struct TableView {
    pub columns: [&'static str; 3],
    pub rows: Vec<Record>,
    pub message: Option<&'static str>,
}

/// Run `op` against the caller's table.
async fn on_table<R>(
    state: &AppState,
    session: CurrentSession,
    op: impl FnOnce(&mut RecordTable) -> Result<R, CoreError>,
) -> AppResult<R> {
    let result = state
        .sessions
        .with_table(session.session_id, op)
        .await
        .ok_or_else(session_expired)?;
    Ok(result?)
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/records
pub async fn list_records(
    session: CurrentSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let (rows, message) = on_table(&state, session, |t| {
        let message = t.is_empty().then_some(EMPTY_TABLE_MESSAGE);
        Ok((t.list().to_vec(), message))
    })
    .await?;

    Ok(Json(DataResponse {
        data: TableView {
            columns: COLUMNS,
            rows,
            message,
        },
    }))
}

/// GET /api/v1/records/ids
pub async fn list_record_ids(
    session: CurrentSession,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let ids = on_table(&state, session, |t| Ok(t.ids())).await?;

    Ok(Json(DataResponse { data: ids }))
}

/// GET /api/v1/records/{id}
///
/// Used to prefill the Update form for the selected ID.
pub async fn get_record(
    session: CurrentSession,
    State(state): State<AppState>,
    path: Result<Path<RecordId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let record = on_table(&state, session, |t| t.get(id).cloned()).await?;

    Ok(Json(DataResponse { data: record }))
}

// ---------------------------------------------------------------------------
// Create / Update / Delete
// ---------------------------------------------------------------------------

/// POST /api/v1/records
pub async fn create_record(
    session: CurrentSession,
    State(state): State<AppState>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let record = on_table(&state, session, |t| t.create(&input)).await?;

    tracing::info!(
        record_id = record.id,
        session_id = %session.session_id,
        "Record created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: WithMessage {
                inner: record,
                message: CREATED_MESSAGE,
            },
        }),
    ))
}

/// PUT /api/v1/records/{id}
///
/// Replace the Name and Age of the row with `id`. Other rows are untouched.
pub async fn update_record(
    session: CurrentSession,
    State(state): State<AppState>,
    path: Result<Path<RecordId>, PathRejection>,
    payload: Result<Json<RecordInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(input) = payload?;
    let record = on_table(&state, session, |t| t.update(id, &input)).await?;

    tracing::info!(record_id = id, session_id = %session.session_id, "Record updated");

    Ok(Json(DataResponse {
        data: WithMessage {
            inner: record,
            message: UPDATED_MESSAGE,
        },
    }))
}

/// DELETE /api/v1/records/{id}
///
/// Remove exactly the row with `id`, returning it.
pub async fn delete_record(
    session: CurrentSession,
    State(state): State<AppState>,
    path: Result<Path<RecordId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let record = on_table(&state, session, |t| t.delete(id)).await?;

    tracing::info!(record_id = id, session_id = %session.session_id, "Record deleted");

    Ok(Json(DataResponse {
        data: WithMessage {
            inner: record,
            message: DELETED_MESSAGE,
        },
    }))
}
