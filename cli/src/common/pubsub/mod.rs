//! # reportpub Pub/Sub Publishing (`common::pubsub`)
//!
//! File: cli/src/common/pubsub/mod.rs
//!
//! ## Overview
//!
//! Everything needed to get one message onto a Google Cloud Pub/Sub topic.
//!
//! - **`topic`**: validated `projects/{project}/topics/{topic}` names.
//! - **`message`**: the outbound message (base64 text of the archive) and its size check.
//! - **`auth`**: picks emulator, configured-token or `gcloud` credentials.
//! - **`client`**: the REST publisher that sends the message and returns its id.
//!
//! `connect` ties configuration, endpoint and credentials together:
//!
//! ```rust
//! let client = pubsub::connect(&config).await?;
//! let id = client.publish(&config.topic_name()?, &message).await?;
//! ```
//!
use crate::core::config::Config;
use crate::core::error::Result;
use tracing::debug;

pub mod auth;
pub mod client;
pub mod message;
pub mod topic;

pub use client::PublisherClient;

/// Base URL requests should go to: the emulator when configured, else `config.endpoint`.
pub fn resolve_endpoint(config: &Config) -> String {
    match config.emulator_host.as_deref() {
        Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
            host.to_string()
        }
        Some(host) => format!("http://{}", host),
        None => config.endpoint.clone(),
    }
}

/// Builds a publisher for the configured endpoint with resolved credentials.
///
/// # Errors
///
/// Returns an `Err` if credentials cannot be obtained or the HTTP client cannot be built.
pub async fn connect(config: &Config) -> Result<PublisherClient> {
    let endpoint = resolve_endpoint(config);
    let credentials = auth::resolve_credentials(config).await?;
    debug!("Publishing via {} with {:?}", endpoint, credentials);
    PublisherClient::new(&endpoint, credentials)
}
