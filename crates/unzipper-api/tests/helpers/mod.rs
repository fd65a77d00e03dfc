//! Test helpers: build the router over a temporary data root.
//!
//! Run from workspace root: `cargo test -p unzipper-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unzipper_api::constants::API_BASE;
use unzipper_core::{ArchiveConfig, Config};

/// API path for tests (e.g. `/api/upload`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_BASE, path)
}

/// Test application: server plus the data root it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub data_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.data_dir.path().join("uploads")
    }

    pub fn extracted_dir(&self) -> PathBuf {
        self.data_dir.path().join("extracted")
    }

    /// Post `data` as the `file` field of a multipart form.
    pub async fn upload(&self, data: Vec<u8>) -> TestResponse {
        let part = Part::bytes(bytes::Bytes::from(data))
            .file_name("archive.zip")
            .mime_type("application/zip");
        let multipart = MultipartForm::new().add_part("file", part);
        self.server
            .post(&api_path("/upload"))
            .multipart(multipart)
            .await
    }

    pub async fn download(&self, path: &str) -> TestResponse {
        self.server
            .get(&api_path("/download"))
            .add_query_param("path", path)
            .await
    }
}

/// Number of entries directly inside `dir`.
pub fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

/// Setup test app with default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with configuration overrides (same names as the environment variables).
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let data_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut vars: HashMap<String, String> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert(
        "DATA_DIR".to_string(),
        data_dir.path().to_string_lossy().into_owned(),
    );

    let config = ArchiveConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Failed to build test config");
    let config = Config(Box::new(config));

    let (_state, app) = unzipper_api::setup::build_app(config)
        .await
        .expect("Failed to build app");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, data_dir }
}
