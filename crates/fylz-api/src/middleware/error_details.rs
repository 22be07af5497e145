use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Strip `details` and `error_type` from error bodies when the configured
/// environment is production.
pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !state.config.is_production() {
        return response;
    }

    let redacted = response
        .extensions()
        .get::<ErrorResponse>()
        .filter(|body| body.details.is_some() || body.error_type.is_some())
        .map(|body| ErrorResponse {
            details: None,
            error_type: None,
            ..body.clone()
        });
    let Some(redacted) = redacted else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.extensions.insert(redacted.clone());
    Response::from_parts(parts, Json(redacted).into_response().into_body())
}
