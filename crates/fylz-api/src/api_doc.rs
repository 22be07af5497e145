//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use fylz_core::models;

/// The OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fylz API",
        version = "0.1.0",
        description = "File gateway: upload files, retrieve them by opaque id (inline or via signed URL redirect), list stored files and issue time-limited signed URLs."
    ),
    paths(
        handlers::health::health_check,
        handlers::upload::upload_raw,
        handlers::upload::upload_multipart,
        handlers::list::list_files,
        handlers::download::get_file,
        handlers::urls::issue_url,
    ),
    components(schemas(
        models::FileRecord,
        models::FileListing,
        models::UploadResponse,
        models::MultipartUploadResponse,
        models::SignedUrlResponse,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "files", description = "Upload, list and retrieve files"),
        (name = "urls", description = "Signed URL issuance"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
