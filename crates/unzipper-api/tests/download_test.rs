//! Extracted file download integration tests.
//!
//! Run with: `cargo test -p unzipper-api --test download_test`

mod helpers;

use helpers::fixtures::{build_zip, sample_archive};
use helpers::{api_path, setup_test_app, TestApp};
use serde_json::Value;

/// Upload the sample archive and return the listed paths.
async fn upload_sample(app: &TestApp) -> Vec<String> {
    let body: Value = app.upload(sample_archive()).await.json();
    body["files"]
        .as_array()
        .expect("files array")
        .iter()
        .map(|f| f["path"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_download_returns_identical_bytes() {
    let app = setup_test_app().await;
    let paths = upload_sample(&app).await;

    let response = app.download(&paths[1]).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), b"0123456789");
    assert_eq!(response.header("content-type"), "application/octet-stream");
    assert_eq!(response.header("content-length"), "10");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"b.txt\"; filename*=UTF-8''b.txt"
    );
}

#[tokio::test]
async fn test_download_every_listed_file() {
    let app = setup_test_app().await;
    let archive = build_zip(&[
        ("notes/readme.md", b"# notes"),
        ("bin/data.bin", &[0u8, 159, 146, 150]),
        ("top.txt", b""),
    ]);
    let body: Value = app.upload(archive).await.json();

    for file in body["files"].as_array().unwrap() {
        let response = app.download(file["path"].as_str().unwrap()).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.as_bytes().len() as u64, file["size"].as_u64().unwrap());
    }
}

#[tokio::test]
async fn test_download_without_path_is_rejected() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/download")).await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file path provided");

    let response = app.download("").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_download_traversal_is_rejected() {
    let app = setup_test_app().await;
    let paths = upload_sample(&app).await;
    let upload_id = paths[0].split('/').next().unwrap().to_string();

    std::fs::create_dir_all(app.data_dir.path().join("extracted-private")).unwrap();
    std::fs::write(
        app.data_dir.path().join("extracted-private/secret.txt"),
        b"secret",
    )
    .unwrap();

    for path in [
        format!("{}/../../uploads", upload_id),
        format!("{}/dir/../../../Cargo.toml", upload_id),
        "../extracted-private/secret.txt".to_string(),
        "/etc/passwd".to_string(),
    ] {
        let response = app.download(&path).await;
        assert_eq!(response.status_code(), 400, "expected 400 for {}", path);
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid file path");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_download_symlink_outside_root_is_rejected() {
    let app = setup_test_app().await;
    let paths = upload_sample(&app).await;
    let upload_id = paths[0].split('/').next().unwrap().to_string();

    let secret = app.data_dir.path().join("extracted-private/secret.txt");
    std::fs::create_dir_all(secret.parent().unwrap()).unwrap();
    std::fs::write(&secret, b"secret").unwrap();
    std::os::unix::fs::symlink(
        &secret,
        app.extracted_dir().join(&upload_id).join("link.txt"),
    )
    .unwrap();

    let response = app.download(&format!("{}/link.txt", upload_id)).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_download_never_extracted_file_is_not_found() {
    let app = setup_test_app().await;
    let paths = upload_sample(&app).await;
    let upload_id = paths[0].split('/').next().unwrap().to_string();

    for path in [
        format!("{}/missing.txt", upload_id),
        format!("{}/a.txt", uuid::Uuid::new_v4()),
        "nonexistent/file.txt".to_string(),
    ] {
        let response = app.download(&path).await;
        assert_eq!(response.status_code(), 404, "expected 404 for {}", path);
        let body: Value = response.json();
        assert_eq!(body["error"], "File not found");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_download_directory_is_not_found() {
    let app = setup_test_app().await;
    let paths = upload_sample(&app).await;
    let upload_id = paths[0].split('/').next().unwrap().to_string();

    let response = app.download(&format!("{}/dir", upload_id)).await;
    assert_eq!(response.status_code(), 404);

    let response = app.download(&upload_id).await;
    assert_eq!(response.status_code(), 404);
}
