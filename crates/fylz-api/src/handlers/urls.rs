use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use fylz_core::constants::REPLY_TAG_UPLOAD;
use fylz_core::models::SignedUrlResponse;
use fylz_core::{AppError, Identifier};
use serde::Deserialize;

use super::tagged_json;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    id: Option<String>,
    filename: Option<String>,
    ttl: Option<String>,
}

/// Issue a signed URL to download an existing file or upload a new one.
#[utoipa::path(
    get,
    path = "/urls/{action}",
    tag = "urls",
    params(
        ("action" = String, Path, description = "`download` or `upload`"),
        ("id" = Option<String>, Query, description = "File identifier (download)"),
        ("filename" = Option<String>, Query, description = "Filename to upload (upload)"),
        ("ttl" = Option<i64>, Query, description = "Lifetime in minutes (1-30, default 5)")
    ),
    responses(
        (status = 200, description = "Signed URL", body = SignedUrlResponse),
        (status = 400, description = "Unknown action or missing parameter", body = ErrorResponse),
        (status = 404, description = "No file stored under this id", body = ErrorResponse),
        (status = 500, description = "Signing failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(action = %action))]
pub async fn issue_url(
    State(state): State<Arc<AppState>>,
    Path(action): Path<String>,
    Query(query): Query<UrlQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let issuer = state.gateway.issuer();
    let ttl = query.ttl.as_deref();

    let signed = match action.to_ascii_lowercase().as_str() {
        "download" => {
            let id = Identifier::parse(query.id.as_deref().unwrap_or_default())?;
            issuer.issue_read(&id, ttl).await?
        }
        "upload" => {
            let filename = query.filename.as_deref().unwrap_or_default();
            issuer.issue_write(filename, ttl).await?
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "Invalid action '{}': expected 'download' or 'upload'",
                other
            ))
            .into());
        }
    };

    tagged_json(REPLY_TAG_UPLOAD, &SignedUrlResponse::from(signed))
}
