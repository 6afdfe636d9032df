//! Test utilities: a wiremock daemon plus a fully-registered state context.
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_count(2).await;
//! test_ctx.mock_images(&[("a.png", b"aa"), ("b.png", b"bb")]).await;
//!
//! test_ctx.ctx.enqueue_command::<SyncGalleryCommand>();
//! test_ctx.flush_and_wait().await;
//!
//! let gallery = test_ctx.ctx.state::<GalleryCompute>();
//! ```

#![cfg(test)]

use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::{
    DeleteCompute, DeleteImageInput, GalleryCompute, IntervalCompute, IntervalInput, RotateCompute,
    ShellConfig, UploadCompute, UploadSelection, delete::DeleteAllCompute,
};
use wallshell_states::StateCtx;

/// A mock daemon and a state context configured to talk to it.
pub struct TestContext {
    pub server: MockServer,
    pub ctx: StateCtx,
}

impl TestContext {
    pub async fn new() -> Self {
        let server = MockServer::start().await;

        let mut ctx = StateCtx::new();
        ctx.add_state(ShellConfig::new(server.uri()));
        ctx.add_state(UploadSelection::default());
        ctx.add_state(UploadCompute::default());
        ctx.add_state(GalleryCompute::default());
        ctx.add_state(DeleteImageInput::default());
        ctx.add_state(DeleteCompute::default());
        ctx.add_state(DeleteAllCompute::default());
        ctx.add_state(IntervalInput::default());
        ctx.add_state(IntervalCompute::default());
        ctx.add_state(RotateCompute::default());

        Self { server, ctx }
    }

    /// Mount `GET /api/images/count`.
    pub async fn mock_count(&self, count: u64) {
        Mock::given(method("GET"))
            .and(path("/api/images/count"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "count": count })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount `GET /api/images` with base64-encoded payloads.
    pub async fn mock_images(&self, images: &[(&str, &[u8])]) {
        let encoded: Vec<(String, String)> = images
            .iter()
            .map(|(name, bytes)| ((*name).to_owned(), BASE64.encode(bytes)))
            .collect();
        self.mock_images_encoded(&encoded).await;
    }

    /// Mount `GET /api/images` with raw payload strings (for malformed
    /// payload cases).
    pub async fn mock_images_raw(&self, images: &[(&str, &str)]) {
        let encoded: Vec<(String, String)> = images
            .iter()
            .map(|(name, data)| ((*name).to_owned(), (*data).to_owned()))
            .collect();
        self.mock_images_encoded(&encoded).await;
    }

    async fn mock_images_encoded(&self, images: &[(String, String)]) {
        let body: Vec<serde_json::Value> = images
            .iter()
            .map(|(name, data)| serde_json::json!({ "name": name, "data": data }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/api/images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount `POST /api/images` accepting every batch.
    pub async fn mock_upload_ok(&self) {
        Mock::given(method("POST"))
            .and(path("/api/images"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.server)
            .await;
    }

    /// Mount `DELETE /api/images/{name}` with a structured reply.
    pub async fn mock_delete_structured(&self, name: &str, ok: bool) {
        let body = if ok {
            serde_json::json!({ "ok": true })
        } else {
            serde_json::json!({ "ok": false, "reason": "file not found" })
        };
        Mock::given(method("DELETE"))
            .and(path(format!("/api/images/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount `GET /api/interval`.
    pub async fn mock_interval(&self, seconds: u64) {
        Mock::given(method("GET"))
            .and(path("/api/interval"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "seconds": seconds })),
            )
            .mount(&self.server)
            .await;
    }

    /// Everything the mock daemon has received so far.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Spawn queued commands and wait until every task settled, applying
    /// state updates along the way.
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let deadline = Instant::now() + Duration::from_secs(5);
        while self.ctx.task_count() > 0 {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {} command task(s)",
                self.ctx.task_count()
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.ctx.sync_computes();
        }
        self.ctx.sync_computes();
    }
}
