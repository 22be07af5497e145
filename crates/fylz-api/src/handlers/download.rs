use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use fylz_core::{AppError, Identifier};
use serde::Deserialize;

use super::query_flag;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    redirect: Option<String>,
    ttl: Option<String>,
}

/// Retrieve a file by identifier, inline or by redirect to a signed URL.
#[utoipa::path(
    get,
    path = "/files/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "File identifier"),
        ("redirect" = Option<bool>, Query, description = "Redirect to a signed URL instead of proxying bytes"),
        ("ttl" = Option<i64>, Query, description = "Signed URL lifetime in minutes (1-30, default 5)")
    ),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream"),
        (status = 301, description = "Redirect to a signed download URL"),
        (status = 404, description = "No file stored under this id", body = ErrorResponse),
        (status = 500, description = "Storage or signing failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(id = %id))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, HttpAppError> {
    let id = Identifier::parse(&id)?;

    if query_flag(query.redirect.as_deref()) {
        let signed = state
            .gateway
            .redirect_url(&id, query.ttl.as_deref())
            .await?;
        tracing::debug!(key = %signed.key, expiry = %signed.expiry, "Redirecting to signed URL");
        return Ok((
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, signed.url)],
        )
            .into_response());
    }

    let download = state.gateway.fetch(&id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_LENGTH, download.content_length)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&download.filename),
        )
        .body(Body::from(download.bytes))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string()).into()
        })
}

/// `attachment; filename=<name>`, with characters a header cannot carry replaced.
fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("attachment; filename={}", safe)
}
