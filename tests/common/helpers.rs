// tests/common/helpers.rs
//! Shared helper functions for integration tests

#![allow(dead_code)]

use cadence::{NopMetricSink, StatsdClient};
use lost_found::board::Board;
use lost_found::model::Item;
use lost_found::notify::interface::{Notification, Notifier};
use lost_found::store::interface::ItemStore;
use lost_found::store::memory::MemoryStore;
use lost_found::uploads::UploadStore;
use lost_found::State;
use rand::Rng;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

/// Collects notifications, fails every one of them, or never finishes.
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<Notification>>>,
    pub fail: bool,
    pub hang: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(anyhow::anyhow!("mail server unreachable"));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Reads fine, refuses every save.
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
}

#[async_trait::async_trait]
impl ItemStore for ReadOnlyStore {
    async fn list(&self) -> anyhow::Result<Option<Vec<Item>>> {
        self.inner.list().await
    }

    async fn save(&self, _items: &[Item]) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("read-only file system"))
    }

    fn describe(&self) -> String {
        "read-only".to_string()
    }
}

/// Every read fails.
pub struct BrokenStore;

#[async_trait::async_trait]
impl ItemStore for BrokenStore {
    async fn list(&self) -> anyhow::Result<Option<Vec<Item>>> {
        Err(anyhow::anyhow!("device not ready"))
    }

    async fn save(&self, _items: &[Item]) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("device not ready"))
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

pub struct TestApp {
    pub state: Arc<State>,
    pub notifier: RecordingNotifier,
    pub dir: TempDir,
}

impl TestApp {
    pub fn uploads_dir(&self) -> std::path::PathBuf {
        self.state.uploads.directory()
    }
}

pub fn create_test_app_with(
    store: Box<dyn ItemStore>,
    notifier: RecordingNotifier,
) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let state = Arc::new(State {
        board: Board::new(store, Box::new(notifier.clone())),
        uploads: UploadStore::new(dir.path().join("static"), "uploads"),
        statsd_client: StatsdClient::from_sink("test", NopMetricSink),
        max_upload_bytes: MAX_UPLOAD_BYTES,
    });

    TestApp {
        state,
        notifier,
        dir,
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(
        Box::new(MemoryStore::new()),
        RecordingNotifier::default(),
    )
}

pub fn create_test_app_with_items(items: Vec<Item>) -> TestApp {
    create_test_app_with(
        Box::new(MemoryStore::with_items(items)),
        RecordingNotifier::default(),
    )
}

pub fn make_item(id: &str, name: &str) -> Item {
    Item::new(
        name.to_string(),
        format!("{} found near the entrance", name),
        format!("/static/uploads/{}_1.jpg", name),
    )
    .with_id(id.to_string())
}

// Function to generate a random boundary string
pub fn generate_boundary() -> String {
    format!(
        "----WebKitFormBoundary{:016x}",
        rand::thread_rng().gen::<u64>()
    )
}

/// One multipart field: `(name, filename, data)`.
pub type FormField<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn multipart_body(boundary: &str, fields: &[FormField]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, filename, data) in fields {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; \
                         name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        name
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    // Add closing boundary
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

pub async fn get(
    app: &TestApp,
    path: &str,
) -> warp::http::Response<bytes::Bytes> {
    let routes = lost_found::routes(app.state.clone());
    warp::test::request()
        .method("GET")
        .path(path)
        .reply(&routes)
        .await
}

pub async fn post_json(
    app: &TestApp,
    path: &str,
    body: &serde_json::Value,
) -> warp::http::Response<bytes::Bytes> {
    post_raw(app, path, "application/json", body.to_string().into_bytes()).await
}

pub async fn post_raw(
    app: &TestApp,
    path: &str,
    content_type: &str,
    body: Vec<u8>,
) -> warp::http::Response<bytes::Bytes> {
    let routes = lost_found::routes(app.state.clone());
    warp::test::request()
        .method("POST")
        .path(path)
        .header("content-type", content_type)
        .body(body)
        .reply(&routes)
        .await
}

pub async fn post_form(
    app: &TestApp,
    fields: &[FormField<'_>],
) -> warp::http::Response<bytes::Bytes> {
    let boundary = generate_boundary();
    let body = multipart_body(&boundary, fields);
    post_raw(
        app,
        "/api/items",
        &format!("multipart/form-data; boundary={}", boundary),
        body,
    )
    .await
}

/// Notifications go out after the reply, so wait for them to land.
pub async fn wait_for_notifications(
    app: &TestApp,
    count: usize,
) -> Vec<Notification> {
    for _ in 0..100 {
        let sent = app.notifier.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    app.notifier.sent()
}

pub fn json_body(
    response: &warp::http::Response<bytes::Bytes>,
) -> serde_json::Value {
    serde_json::from_slice(response.body()).expect("Response body is not JSON")
}
