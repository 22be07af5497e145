pub mod download;
pub mod health;
pub mod list;
pub mod upload;
pub mod urls;

use axum::{
    http::{header, HeaderName},
    response::{IntoResponse, Response},
};
use fylz_core::constants::REPLY_TAG_HEADER;
use fylz_core::AppError;
use serde::Serialize;

use crate::error::HttpAppError;

/// JSON body tagged with the function that produced it.
pub(crate) fn tagged_json<T: Serialize>(
    tag: &'static str,
    body: &T,
) -> Result<Response, HttpAppError> {
    let bytes = serde_json::to_vec(body).map_err(AppError::from)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (HeaderName::from_static(REPLY_TAG_HEADER), tag),
        ],
        bytes,
    )
        .into_response())
}

/// Interpret a boolean query flag; anything but an explicit yes is false.
pub(crate) fn query_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}
