use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
};
use base64::Engine;
use bytes::Bytes;
use fylz_core::constants::REPLY_TAG_UPLOAD;
use fylz_core::models::{MultipartUploadResponse, UploadResponse};
use fylz_core::AppError;
use fylz_services::UploadPart;
use serde::Deserialize;

use super::{query_flag, tagged_json};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const CONTENT_TRANSFER_ENCODING: &str = "content-transfer-encoding";

#[derive(Debug, Deserialize)]
pub struct RawUploadQuery {
    base64: Option<String>,
}

/// Store the request body as a single file named by the path.
#[utoipa::path(
    post,
    path = "/files/{name}",
    tag = "files",
    params(
        ("name" = String, Path, description = "Filename to store the body under"),
        ("base64" = Option<bool>, Query, description = "Body is base64 encoded")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Invalid filename or body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(filename = %filename, size_bytes = body.len()))]
pub async fn upload_raw(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    Query(query): Query<RawUploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let content_type = header_str(&headers, header::CONTENT_TYPE.as_str());

    let is_base64 = query_flag(query.base64.as_deref())
        || header_str(&headers, CONTENT_TRANSFER_ENCODING)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("base64"));

    // A declared length describes the encoded body, not the decoded payload.
    let (payload, declared_length) = if is_base64 {
        (decode_base64(&body)?, None)
    } else {
        (body, header_str(&headers, header::CONTENT_LENGTH.as_str()))
    };

    let id = state
        .gateway
        .put(&filename, payload, content_type, declared_length)
        .await?;

    tagged_json(REPLY_TAG_UPLOAD, &UploadResponse { id: id.to_string() })
}

/// Store every file part of a multipart body under its own identifier.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files stored; filename to id", body = MultipartUploadResponse),
        (status = 400, description = "Malformed part", body = ErrorResponse),
        (status = 415, description = "Body is not multipart", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upload_multipart(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut multipart = multipart.map_err(|e| AppError::UnsupportedMediaType(e.body_text()))?;

    let parts = read_parts(&mut multipart).await?;
    let ids = state.gateway.put_many(parts).await?;

    let body = MultipartUploadResponse {
        ids: ids
            .into_iter()
            .map(|(filename, id)| (filename, id.to_string()))
            .collect(),
    };
    tagged_json(REPLY_TAG_UPLOAD, &body)
}

/// Decode every part up front; one unreadable part fails the whole request.
async fn read_parts(multipart: &mut Multipart) -> Result<Vec<UploadPart>, AppError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let filename = field.file_name().map(str::to_string).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Multipart field '{}' has no filename",
                field.name().unwrap_or_default()
            ))
        })?;
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        tracing::debug!(filename = %filename, size_bytes = data.len(), "Multipart part read");
        parts.push(UploadPart {
            filename,
            content_type,
            data,
        });
    }

    Ok(parts)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

fn decode_base64(body: &[u8]) -> Result<Bytes, AppError> {
    let compact: Vec<u8> = body
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map(Bytes::from)
        .map_err(|e| AppError::BadRequest(format!("Body is not valid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_base64_ignores_line_breaks() {
        let decoded = decode_base64(b"aGVs\nbG8=\n").unwrap();
        assert_eq!(decoded.as_ref(), b"hello");
    }

    #[test]
    fn test_decode_base64_rejects_garbage() {
        assert!(matches!(
            decode_base64(b"not base64!"),
            Err(AppError::BadRequest(_))
        ));
    }
}
