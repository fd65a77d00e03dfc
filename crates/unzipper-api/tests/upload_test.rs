//! Archive upload integration tests.
//!
//! Run with: `cargo test -p unzipper-api --test upload_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{build_zip, sample_archive};
use helpers::{api_path, count_entries, setup_test_app, setup_test_app_with};
use serde_json::Value;

fn files(body: &Value) -> &Vec<Value> {
    body.get("files")
        .and_then(|v| v.as_array())
        .expect("files array")
}

fn upload_id_of(file: &Value) -> String {
    let path = file["path"].as_str().expect("path string");
    path.split('/').next().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_upload_lists_extracted_files() {
    let app = setup_test_app().await;

    let response = app.upload(sample_archive()).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let files = files(&body);
    assert_eq!(files.len(), 2);

    let first_path = files[0]["path"].as_str().unwrap();
    let upload_id = first_path.split('/').next().unwrap();
    assert!(uuid::Uuid::parse_str(upload_id).is_ok());

    assert_eq!(files[0]["name"], "a.txt");
    assert_eq!(files[0]["size"], 5);
    assert_eq!(files[0]["path"], format!("{}/a.txt", upload_id));
    assert_eq!(files[1]["name"], "b.txt");
    assert_eq!(files[1]["size"], 10);
    assert_eq!(files[1]["path"], format!("{}/dir/b.txt", upload_id));

    assert!(app.extracted_dir().join(upload_id).join("dir/b.txt").is_file());
    assert_eq!(count_entries(&app.scratch_dir()), 0);
}

#[tokio::test]
async fn test_two_uploads_get_distinct_directories() {
    let app = setup_test_app().await;

    let first: Value = app.upload(sample_archive()).await.json();
    let second: Value = app.upload(sample_archive()).await.json();

    let first_id = upload_id_of(&files(&first)[0]);
    let second_id = upload_id_of(&files(&second)[0]);

    assert_ne!(first_id, second_id);
    assert_eq!(count_entries(&app.extracted_dir()), 2);
}

#[tokio::test]
async fn test_empty_archive_returns_empty_list() {
    let app = setup_test_app().await;

    let response = app.upload(build_zip(&[])).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(files(&body).is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let app = setup_test_app().await;

    let multipart = MultipartForm::new().add_text("note", "no archive here");
    let response = app
        .client()
        .post(&api_path("/upload"))
        .multipart(multipart)
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file provided");
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_with_two_file_fields_is_rejected() {
    let app = setup_test_app().await;

    let first = Part::bytes(bytes::Bytes::from(sample_archive())).file_name("a.zip");
    let second = Part::bytes(bytes::Bytes::from(sample_archive())).file_name("b.zip");
    let multipart = MultipartForm::new()
        .add_part("file", first)
        .add_part("file", second);
    let response = app
        .client()
        .post(&api_path("/upload"))
        .multipart(multipart)
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(count_entries(&app.extracted_dir()), 0);
}

#[tokio::test]
async fn test_corrupt_archive_fails_and_leaves_nothing_behind() {
    let app = setup_test_app().await;

    let response = app.upload(b"this is not a zip archive".to_vec()).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to process upload");
    assert_eq!(body["code"], "EXTRACTION_FAILED");
    assert!(body.get("details").is_none());
    assert_eq!(count_entries(&app.scratch_dir()), 0);
    assert_eq!(count_entries(&app.extracted_dir()), 0);
}

#[tokio::test]
async fn test_unsafe_entry_is_rejected() {
    let app = setup_test_app().await;

    let archive = build_zip(&[("ok.txt", b"fine"), ("../escape.txt", b"evil")]);
    let response = app.upload(archive).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNSAFE_ARCHIVE_ENTRY");
    assert!(!app.data_dir.path().join("escape.txt").exists());
    assert_eq!(count_entries(&app.extracted_dir()), 0);
}

#[tokio::test]
async fn test_entry_limit_returns_413() {
    let app = setup_test_app_with(&[("MAX_ARCHIVE_ENTRIES", "2")]).await;

    let archive = build_zip(&[("a", b"1"), ("b", b"2"), ("c", b"3")]);
    let response = app.upload(archive).await;

    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["code"], "ARCHIVE_TOO_LARGE");
    assert_eq!(count_entries(&app.extracted_dir()), 0);
}

#[tokio::test]
async fn test_extracted_size_limit_returns_413() {
    let app = setup_test_app_with(&[("MAX_EXTRACTED_SIZE_MB", "1")]).await;

    // Compresses to a few KB, inflates past the limit
    let big = vec![b'z'; 2 * 1024 * 1024];
    let response = app.upload(build_zip(&[("big.bin", &big)])).await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(count_entries(&app.extracted_dir()), 0);
}

#[tokio::test]
async fn test_upload_body_limit_returns_413() {
    let app = setup_test_app_with(&[("MAX_UPLOAD_SIZE_MB", "1")]).await;

    let payload = vec![0u8; 2 * 1024 * 1024];
    let response = app.upload(payload).await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(count_entries(&app.extracted_dir()), 0);
}

#[tokio::test]
async fn test_backslash_entry_names_are_listed_and_downloadable() {
    let app = setup_test_app().await;

    let response = app
        .upload(build_zip(&[("dir\\b.txt", b"0123456789")]))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let listed = &files(&body)[0];
    let upload_id = upload_id_of(listed);
    assert_eq!(listed["name"], "b.txt");
    assert_eq!(listed["path"], format!("{}/dir/b.txt", upload_id));

    let download = app.download(listed["path"].as_str().unwrap()).await;
    assert_eq!(download.status_code(), 200);
    assert_eq!(download.as_bytes().as_ref(), b"0123456789");
}
