//! # reportpub CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`: a command builder
//! that isolates the binary from the developer's own configuration, a report
//! tree fixture, and a fake Pub/Sub endpoint the binary can publish to via
//! `--emulator-host`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};

/// `reportpub` binary running in `dir`, with user config and environment overrides cleared.
pub fn reportpub_cmd_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reportpub").expect("Failed to find reportpub binary for testing");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("PUBSUB_EMULATOR_HOST")
        .env_remove("REPORTPUB_SOURCE_DIR")
        .env_remove("REPORTPUB_ARCHIVE")
        .env_remove("REPORTPUB_PROJECT_ID")
        .env_remove("REPORTPUB_TOPIC_ID")
        .env_remove("REPORTPUB_ENDPOINT")
        .env_remove("REPORTPUB_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a small JUnit-style report tree under `root` and returns its file count.
pub fn write_report_tree(root: &Path) -> usize {
    let files = [
        ("index.html", "<html>summary</html>"),
        ("css/style.css", "body {}"),
        ("classes/com.example.FooTest.html", "<html>foo</html>"),
        ("test-results/TEST-com.example.FooTest.xml", "<testsuite tests=\"3\"/>"),
        ("test-results/binary/output.bin", "\u{0}\u{1}\u{2}"),
    ];
    for (name, content) in files {
        let path = root.join(name);
        fs::create_dir_all(path.parent().expect("fixture path has a parent"))
            .expect("Failed to create fixture directory");
        fs::write(&path, content).expect("Failed to write fixture file");
    }
    files.len()
}

/// One publish request received by `FakePubSub`.
#[derive(Debug, Clone)]
pub struct ReceivedPublish {
    pub path: String,
    pub body: Value,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    reply: Value,
    received: Arc<Mutex<Vec<ReceivedPublish>>>,
}

async fn fake_publish(
    State(state): State<FakeState>,
    UrlPath(path): UrlPath<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .received
        .lock()
        .expect("fake server lock poisoned")
        .push(ReceivedPublish { path, body });
    (state.status, Json(state.reply.clone()))
}

/// A fake Pub/Sub REST endpoint running on its own thread.
pub struct FakePubSub {
    /// `host:port`, suitable for `--emulator-host`.
    pub host: String,
    received: Arc<Mutex<Vec<ReceivedPublish>>>,
}

impl FakePubSub {
    /// Starts a server answering every publish with `status` and `reply`.
    pub fn start(status: u16, reply: Value) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            status: StatusCode::from_u16(status).expect("valid status code"),
            reply,
            received: received.clone(),
        };
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build fake server runtime");
            runtime.block_on(async move {
                let app = Router::new()
                    .route("/v1/{*path}", post(fake_publish))
                    .with_state(state);
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("Failed to bind fake server");
                tx.send(listener.local_addr().expect("local addr"))
                    .expect("Failed to report fake server address");
                axum::serve(listener, app).await.expect("fake server failed");
            });
        });
        let addr = rx.recv().expect("fake server did not start");
        Self {
            host: addr.to_string(),
            received,
        }
    }

    /// Requests received so far.
    pub fn received(&self) -> Vec<ReceivedPublish> {
        self.received
            .lock()
            .expect("fake server lock poisoned")
            .clone()
    }
}
