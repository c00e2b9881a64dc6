//! Document API integration tests.
//!
//! Run with: `cargo test -p docbox-api --test documents_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use docbox_core::{BaseConfig, Config};
use helpers::{api_path, setup_test_app, setup_test_app_with_config};

fn pdf_part(data: &'static [u8], file_name: &str) -> Part {
    Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_type("application/pdf")
}

#[tokio::test]
async fn upload_returns_created_with_document_metadata() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_text("documentType", "passport")
        .add_text("relatedRecordId", "42")
        .add_part("document", pdf_part(b"%PDF-1.4 test", "passport.pdf"));

    let response = app.client().post(&api_path("/documents")).multipart(form).await;

    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "File uploaded successfully.");
    assert_eq!(body["originalName"], "passport.pdf");
    assert_eq!(body["mimetype"], "application/pdf");
    assert_eq!(body["size"], 13);

    let key = body["key"].as_str().expect("key should be a string");
    assert!(key.starts_with("passport/42/"));
    assert!(key.ends_with(".pdf"));

    // The bytes actually landed in the store under the returned key.
    assert_eq!(app.storage.put_calls(), 1);
    let stored = app.storage.object(key).expect("object should be stored");
    assert_eq!(stored.as_ref(), b"%PDF-1.4 test");
}

#[tokio::test]
async fn upload_defaults_document_type_and_omits_record_segment() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_part("document", pdf_part(b"data", "notes.pdf"));

    let response = app.client().post(&api_path("/documents")).multipart(form).await;

    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();
    let key = body["key"].as_str().expect("key should be a string");
    assert!(key.starts_with("general/"));
    // general/<uuid>.pdf: exactly two segments when no record id is given
    assert_eq!(key.split('/').count(), 2);
}

#[tokio::test]
async fn upload_without_file_returns_bad_request() {
    let app = setup_test_app();

    let form = MultipartForm::new().add_text("documentType", "passport");

    let response = app.client().post(&api_path("/documents")).multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file uploaded.");
    assert_eq!(app.storage.put_calls(), 0);
}

#[tokio::test]
async fn upload_rejects_path_traversal_in_document_type() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_text("documentType", "../secrets")
        .add_part("document", pdf_part(b"data", "x.pdf"));

    let response = app.client().post(&api_path("/documents")).multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(app.storage.put_calls(), 0);
}

#[tokio::test]
async fn upload_storage_failure_returns_opaque_error() {
    let app = setup_test_app();
    app.storage.fail_puts();

    let form = MultipartForm::new().add_part("document", pdf_part(b"data", "x.pdf"));

    let response = app.client().post(&api_path("/documents")).multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to upload file.");
}

#[tokio::test]
async fn download_returns_presigned_url_for_stored_document() {
    let app = setup_test_app();

    let form = MultipartForm::new()
        .add_text("documentType", "visa")
        .add_text("relatedRecordId", "7")
        .add_part("document", pdf_part(b"data", "visa.pdf"));
    let upload = app.client().post(&api_path("/documents")).multipart(form).await;
    let key = upload.json::<serde_json::Value>()["key"]
        .as_str()
        .expect("key")
        .to_string();

    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}", key)))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let url = body["downloadUrl"].as_str().expect("downloadUrl");
    assert!(url.contains(&key));
    // TTL is fixed at 15 minutes
    assert!(url.contains("X-Amz-Expires=900"));
}

#[tokio::test]
async fn download_unknown_key_returns_not_found() {
    let app = setup_test_app();

    let response = app
        .client()
        .get(&api_path("/documents/passport/42/does-not-exist.pdf"))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Document not found.");
}

#[tokio::test]
async fn download_presign_failure_returns_opaque_error() {
    let app = setup_test_app();
    app.storage.insert_object("general/abc.pdf", bytes::Bytes::from_static(b"data"));
    app.storage.fail_presigns();

    let response = app
        .client()
        .get(&api_path("/documents/general/abc.pdf"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to get download link.");
}

#[tokio::test]
async fn upload_rate_limit_returns_too_many_requests() {
    let config = Config {
        base: BaseConfig {
            upload_rate_limit_per_hour: 2,
            ..helpers::create_test_config().base
        },
        storage: helpers::create_test_config().storage,
    };
    let app = setup_test_app_with_config(config);

    for _ in 0..2 {
        let form = MultipartForm::new().add_part("document", pdf_part(b"data", "x.pdf"));
        let response = app.client().post(&api_path("/documents")).multipart(form).await;
        assert_eq!(response.status_code(), 201);
    }

    let form = MultipartForm::new().add_part("document", pdf_part(b"data", "x.pdf"));
    let response = app.client().post(&api_path("/documents")).multipart(form).await;

    assert_eq!(response.status_code(), 429);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Too many uploads. Please try again later.");
    assert!(response.headers().contains_key("Retry-After"));
    assert_eq!(app.storage.put_calls(), 2);
}

#[tokio::test]
async fn download_is_not_limited_by_upload_quota() {
    let config = Config {
        base: BaseConfig {
            upload_rate_limit_per_hour: 1,
            ..helpers::create_test_config().base
        },
        storage: helpers::create_test_config().storage,
    };
    let app = setup_test_app_with_config(config);
    app.storage.insert_object("general/abc.pdf", bytes::Bytes::from_static(b"data"));

    for _ in 0..3 {
        let response = app
            .client()
            .get(&api_path("/documents/general/abc.pdf"))
            .await;
        assert_eq!(response.status_code(), 200);
    }
}

#[tokio::test]
async fn probes_and_openapi_are_served() {
    let app = setup_test_app();

    let live = app.client().get("/live").await;
    assert_eq!(live.status_code(), 200);

    let ready = app.client().get("/ready").await;
    assert_eq!(ready.status_code(), 200);

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    let body: serde_json::Value = health.json();
    assert_eq!(body["storage"], "healthy");

    let openapi = app.client().get("/api/openapi.json").await;
    assert_eq!(openapi.status_code(), 200);
    let spec: serde_json::Value = openapi.json();
    assert!(spec["paths"].get("/api/v0/documents").is_some());
}
