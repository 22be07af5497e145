//! Gateway API integration tests.
//!
//! Run with: `cargo test -p fylz-api --test gateway_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use fylz_core::constants::REPLY_TAG_HEADER;
use fylz_core::Config;
use fylz_storage::MemoryStorage;
use helpers::{setup_test_app, setup_test_app_with, setup_test_app_with_config, upload};

const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n";

#[tokio::test]
async fn test_upload_then_proxy_download() {
    let app = setup_test_app();
    let client = app.client();

    let id = upload(client, "report.pdf", PDF).await;

    let response = client.get(&format!("/files/{}", id)).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=report.pdf"
    );
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(response.header("content-length"), PDF.len().to_string().as_str());
    assert_eq!(response.as_bytes().as_ref(), PDF);
}

#[tokio::test]
async fn test_redirect_download_points_at_signed_url() {
    let app = setup_test_app();
    let client = app.client();

    let id = upload(client, "report.pdf", PDF).await;

    let response = client
        .get(&format!("/files/{}", id))
        .add_query_param("redirect", "true")
        .await;
    assert_eq!(response.status_code(), 301);

    let location = response.header("location");
    let location = location.to_str().expect("location is ascii");
    assert!(location.contains(&format!("{}/report.pdf", id)));
    // Default lifetime: five minutes.
    assert!(location.contains("X-Fylz-Expires=300"));
}

#[tokio::test]
async fn test_uploaded_content_type_is_kept() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post("/files/notes.txt")
        .add_header("Content-Type", "text/markdown")
        .bytes(Bytes::from_static(b"# notes"))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header(REPLY_TAG_HEADER), "upload-handler");
    let id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = client.get(&format!("/files/{}", id)).await;
    assert_eq!(response.header("content-type"), "text/markdown");
}

#[tokio::test]
async fn test_base64_upload_is_decoded() {
    let app = setup_test_app();
    let client = app.client();

    let response = client
        .post("/files/hello.txt")
        .add_query_param("base64", "true")
        .bytes(Bytes::from_static(b"aGVsbG8="))
        .await;
    assert_eq!(response.status_code(), 200);
    let id = response.json::<serde_json::Value>()["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = client.get(&format!("/files/{}", id)).await;
    assert_eq!(response.as_bytes().as_ref(), b"hello");
}

#[tokio::test]
async fn test_unknown_id_is_404() {
    let app = setup_test_app();
    let response = app.client().get("/files/does-not-exist").await;
    assert_eq!(response.status_code(), 404);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_metadata_only_id_is_404() {
    let app = setup_test_app();
    app.storage
        .insert_raw("abc/.meta.info", Bytes::from_static(b"{}"))
        .await;

    let response = app.client().get("/files/abc").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_multipart_upload_assigns_one_id_per_part() {
    let app = setup_test_app();
    let client = app.client();

    let form = MultipartForm::new()
        .add_part(
            "file",
            Part::bytes(Bytes::from_static(b"first")).file_name("one.txt"),
        )
        .add_part(
            "file",
            Part::bytes(Bytes::from_static(PDF))
                .file_name("two.pdf")
                .mime_type("application/pdf"),
        );
    let response = client.post("/files").multipart(form).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let one = body["ids"]["one.txt"].as_str().expect("one.txt id").to_string();
    let two = body["ids"]["two.pdf"].as_str().expect("two.pdf id").to_string();
    assert_ne!(one, two);

    for (id, filename) in [(one, "one.txt"), (two, "two.pdf")] {
        let response = client.get(&format!("/files/{}", id)).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(
            response.header("content-disposition"),
            format!("attachment; filename={}", filename).as_str()
        );
    }
}

#[tokio::test]
async fn test_multipart_endpoint_rejects_other_media_types() {
    let app = setup_test_app();
    let response = app
        .client()
        .post("/files")
        .add_header("Content-Type", "application/json")
        .bytes(Bytes::from_static(b"{}"))
        .await;
    assert_eq!(response.status_code(), 415);
}

#[tokio::test]
async fn test_listing_pages_and_fetch_all() {
    let storage = MemoryStorage::with_page_size("test-bucket", 2);
    for key in ["a/1.txt", "b/2.txt", "c/3.txt", "d/4.txt", "e/5.txt", "f/6.txt"] {
        storage.insert_raw(key, Bytes::from_static(b"12345")).await;
    }
    let app = setup_test_app_with(storage);
    let client = app.client();

    let response = client.get("/files").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header(REPLY_TAG_HEADER), "upload-list");
    let page: serde_json::Value = response.json();
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["is_truncated"], true);
    let token = page["next_continuation_token"]
        .as_str()
        .expect("continuation token")
        .to_string();

    let response = client
        .get("/files")
        .add_query_param("continuation_token", &token)
        .await;
    let page: serde_json::Value = response.json();
    assert_eq!(page["items"][0]["id"], "c");

    let response = client.get("/files").add_query_param("all", "true").await;
    let all: serde_json::Value = response.json();
    assert_eq!(all["items"].as_array().map(Vec::len), Some(6));
    assert_eq!(all["is_truncated"], false);
    assert!(all["next_continuation_token"].is_null());
    assert_eq!(all["items"][5]["filename"], "6.txt");
    assert_eq!(all["items"][5]["size"], 5);
}

#[tokio::test]
async fn test_listing_empty_bucket_is_404() {
    let app = setup_test_app();
    let response = app.client().get("/files").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_download_url_for_existing_file() {
    let app = setup_test_app();
    let client = app.client();
    let id = upload(client, "report.pdf", PDF).await;

    let response = client
        .get("/urls/Download")
        .add_query_param("id", &id)
        .add_query_param("ttl", "1000")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], id.as_str());
    let url = body["url"].as_str().expect("url");
    assert!(url.contains("X-Fylz-Capability=read"));
    assert!(url.contains("X-Fylz-Expires=1800"));
    assert!(body["expiry"].is_string());
}

#[tokio::test]
async fn test_upload_url_mints_new_id() {
    let app = setup_test_app();
    let response = app
        .client()
        .get("/urls/upload")
        .add_query_param("filename", "photo.png")
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().expect("id");
    let url = body["url"].as_str().expect("url");
    assert!(url.contains(&format!("{}/photo.png", id)));
    assert!(url.contains("X-Fylz-Capability=write"));
    assert!(app.storage.is_empty().await);
}

#[tokio::test]
async fn test_url_endpoint_validation() {
    let app = setup_test_app();
    let client = app.client();

    assert_eq!(client.get("/urls/delete").await.status_code(), 400);
    assert_eq!(client.get("/urls/download").await.status_code(), 400);
    assert_eq!(client.get("/urls/upload").await.status_code(), 400);
    assert_eq!(
        client
            .get("/urls/download")
            .add_query_param("id", "missing")
            .await
            .status_code(),
        404
    );
}

#[tokio::test]
async fn test_store_failure_is_500_without_details() {
    let app = setup_test_app();
    app.storage.set_failing(true);

    let response = app.client().get("/files").await;
    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_error_details_follow_configured_environment() {
    let app = setup_test_app();
    let response = app.client().get("/urls/bogus").await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["details"].as_str().unwrap().contains("bogus"));

    let production = Config {
        environment: "production".to_string(),
        cors_origins: vec!["https://app.example.com".to_string()],
        ..Config::default()
    };
    let app = setup_test_app_with_config(MemoryStorage::new("test-bucket"), production);
    let response = app.client().get("/urls/bogus").await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app();
    let client = app.client();

    let response = client.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["storage"], "memory");

    let response = client.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let spec: serde_json::Value = response.json();
    assert!(spec["paths"].get("/files/{name}").is_some());
}
