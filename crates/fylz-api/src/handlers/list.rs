use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use fylz_core::constants::REPLY_TAG_LIST;
use fylz_core::models::FileListing;
use serde::Deserialize;

use super::{query_flag, tagged_json};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    all: Option<String>,
    continuation_token: Option<String>,
}

/// List stored files, one page at a time or all at once.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(
        ("all" = Option<bool>, Query, description = "Follow continuation tokens until the listing is exhausted"),
        ("continuation_token" = Option<String>, Query, description = "Resume a previous listing")
    ),
    responses(
        (status = 200, description = "Stored files", body = FileListing),
        (status = 404, description = "Bucket is empty", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let token = query
        .continuation_token
        .as_deref()
        .filter(|t| !t.is_empty());
    let listing = state
        .listing
        .list(token, query_flag(query.all.as_deref()))
        .await?;

    tagged_json(REPLY_TAG_LIST, &listing)
}
