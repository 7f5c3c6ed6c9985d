//! Handlers for the spreadsheet upload utility.
//!
//! Stateless: the uploaded file is parsed, optionally deduplicated, and
//! returned. Nothing is stored in the session.

use axum::extract::{Multipart, Query};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tabula_core::spreadsheet::{
    build_csv, drop_duplicates, parse_csv, DedupOptions, DedupReport, KeepPolicy, Sheet,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

/// Multipart field carrying the spreadsheet.
pub const FILE_FIELD: &str = "file";

/// An uploaded file's name and raw bytes.
struct Upload {
    file_name: Option<String>,
    data: Vec<u8>,
}

/// Pull the `file` field out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> AppResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::UnreadableUpload(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::UnreadableUpload(e.to_string()))?;

        return Ok(Upload {
            file_name,
            data: data.to_vec(),
        });
    }

    Err(AppError::BadRequest(format!(
        "No '{FILE_FIELD}' field in upload"
    )))
}

fn parse_upload(upload: &Upload) -> AppResult<Sheet> {
    parse_csv(&upload.data).map_err(AppError::UnreadableUpload)
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Parsed upload as shown before deduplication.
#[derive(Debug, Serialize)]
pub struct UploadPreview {
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub sheet: Sheet,
    pub row_count: usize,
}

/// POST /api/v1/uploads/preview
pub async fn preview_upload(multipart: Multipart) -> AppResult<impl IntoResponse> {
    let upload = read_upload(multipart).await?;
    let sheet = parse_upload(&upload)?;

    tracing::info!(
        file_name = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        rows = sheet.rows.len(),
        "Upload previewed",
    );

    Ok(Json(DataResponse {
        data: UploadPreview {
            file_name: upload.file_name,
            row_count: sheet.rows.len(),
            sheet,
        },
    }))
}

// ---------------------------------------------------------------------------
// Deduplicate
// ---------------------------------------------------------------------------

/// Output format of the dedup endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Query parameters for `POST /uploads/dedup`.
#[derive(Debug, Default, Deserialize)]
pub struct DedupParams {
    #[serde(default)]
    pub keep: KeepPolicy,
    /// Comma-separated column names to compare.
    pub subset: Option<String>,
    #[serde(default)]
    pub format: ExportFormat,
}

impl DedupParams {
    fn options(&self) -> DedupOptions {
        let subset = self.subset.as_deref().map(|s| {
            s.split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect()
        });
        DedupOptions {
            subset,
            keep: self.keep,
        }
    }
}

/// Deduplicated upload with counts.
#[derive(Debug, Serialize)]
pub struct DedupResult {
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub report: DedupReport,
}

/// POST /api/v1/uploads/dedup
///
/// Remove duplicate rows from the uploaded spreadsheet. With `format=csv`
/// the cleaned sheet is returned as a file download.
pub async fn dedup_upload(
    Query(params): Query<DedupParams>,
    multipart: Multipart,
) -> AppResult<Response> {
    let upload = read_upload(multipart).await?;
    let sheet = parse_upload(&upload)?;
    let report = drop_duplicates(&sheet, &params.options())?;

    tracing::info!(
        file_name = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        original_rows = report.original_rows,
        removed_rows = report.removed_rows,
        keep = ?params.keep,
        "Upload deduplicated",
    );

    if params.format == ExportFormat::Csv {
        let disposition = format!(
            "attachment; filename=\"{}\"",
            download_name(upload.file_name.as_deref())
        );
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            build_csv(&report.sheet),
        )
            .into_response());
    }

    Ok(Json(DataResponse {
        data: DedupResult {
            file_name: upload.file_name,
            report,
        },
    })
    .into_response())
}

/// Name for the cleaned download, derived from the uploaded file's stem.
fn download_name(file_name: Option<&str>) -> String {
    let stem = file_name
        .map(|n| n.rsplit(['/', '\\']).next().unwrap_or(n))
        .map(|n| n.strip_suffix(".csv").unwrap_or(n))
        .map(|n| {
            n.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                .collect::<String>()
        })
        .filter(|n| !n.is_empty());

    match stem {
        Some(stem) => format!("{stem}_deduplicated.csv"),
        None => "deduplicated.csv".to_string(),
    }
}
