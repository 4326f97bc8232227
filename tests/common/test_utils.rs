use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tryon_relay::{
    config::{Config, ServerConfig},
    relay::Relay,
    server::{self, handlers::AppState},
};

use super::mocks::MockTryOnClient;

pub const BOUNDARY: &str = "----tryon-test-boundary";
pub const LANDING_HTML: &str = "<html><body>try-on</body></html>";

/// Directories backing a test app: staged uploads and static assets.
pub struct TestDirs {
    pub staging: TempDir,
    pub static_dir: TempDir,
}

impl TestDirs {
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging.path()).unwrap().count()
    }
}

/// Create a test server configuration rooted in temporary directories
pub fn create_test_config(dirs: &TestDirs) -> Config {
    Config {
        server: ServerConfig {
            static_dir: dirs.static_dir.path().to_path_buf(),
            staging_dir: Some(dirs.staging.path().to_path_buf()),
            ..ServerConfig::default()
        },
        ..Config::default()
    }
}

pub fn create_test_app(client: MockTryOnClient) -> (Router, TestDirs) {
    create_test_app_with(client, |_| {})
}

/// Same as `create_test_app`, with a hook to adjust the server configuration
pub fn create_test_app_with(
    client: MockTryOnClient,
    configure: impl FnOnce(&mut ServerConfig),
) -> (Router, TestDirs) {
    let dirs = TestDirs {
        staging: tempfile::tempdir().expect("Failed to create staging directory"),
        static_dir: tempfile::tempdir().expect("Failed to create static directory"),
    };
    std::fs::write(dirs.static_dir.path().join("index.html"), LANDING_HTML).unwrap();

    let mut config = create_test_config(&dirs);
    configure(&mut config.server);
    let relay = Relay::new(Arc::new(client), config.server.staging_dir.clone()).unwrap();
    let state = AppState {
        relay: Arc::new(relay),
    };
    let app = server::router(state, &config.server).unwrap();

    (app, dirs)
}

/// Builder for `multipart/form-data` request bodies
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, file_name: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// Body with both images present
pub fn both_images() -> MultipartBody {
    MultipartBody::new()
        .file("human", "person.jpg", b"human-image")
        .file("garment", "shirt.png", b"garment-image")
}

pub fn tryon_request(body: MultipartBody) -> Request<Body> {
    raw_tryon_request(body.build())
}

/// Multipart request carrying `bytes` as is, without a closing boundary
pub fn raw_tryon_request(bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/tryon")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(bytes))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}
