//! # Pub/Sub Publisher Client (`common::pubsub::client`)
//!
//! File: cli/src/common/pubsub/client.rs
//!
//! ## Overview
//!
//! A minimal publisher for the Pub/Sub REST API. It sends exactly one request
//! per `publish` call:
//!
//! ```text
//! POST {endpoint}/v1/projects/{project}/topics/{topic}:publish
//! {"messages":[{"data":"<base64 of message bytes>","attributes":{...}}]}
//! ```
//!
//! and returns the first id from `{"messageIds":[...]}`. The REST transport
//! base64-encodes `data` itself, so a message body that is already base64 text
//! goes over the wire encoded twice and arrives at subscribers as that text.
//!
//! ## Error mapping
//!
//! | HTTP status | Error                                   |
//! |-------------|-----------------------------------------|
//! | 401         | `ReportpubError::Unauthenticated`       |
//! | 403         | `ReportpubError::PermissionDenied`      |
//! | 404         | `ReportpubError::TopicNotFound`         |
//! | other       | `ReportpubError::PublishRejected`       |
//!
//! Nothing is retried. No request timeout is set, so `reqwest`'s default
//! (none) applies and the call blocks until the service answers.
//!
use super::auth::Credentials;
use super::message::{encode_payload, OutboundMessage};
use super::topic::TopicName;
use crate::core::error::{ReportpubError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Serialize, Debug)]
struct PublishRequestBody {
    messages: Vec<WireMessage>,
}

#[derive(Serialize, Debug)]
struct WireMessage {
    data: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PublishResponseBody {
    #[serde(default)]
    message_ids: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Publishes messages to topics on one Pub/Sub endpoint.
#[derive(Debug)]
pub struct PublisherClient {
    http: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
}

impl PublisherClient {
    /// Builds a client for `endpoint` (e.g. `https://pubsub.googleapis.com`).
    pub fn new(endpoint: &str, credentials: Credentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("reportpub/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// URL of the publish method for `topic`.
    pub fn publish_url(&self, topic: &TopicName) -> String {
        format!("{}/v1/{}:publish", self.endpoint, topic)
    }

    /// Publishes `message` to `topic` and returns the server-assigned message id.
    ///
    /// # Errors
    ///
    /// Returns an `Err` on transport failures, on any non-success status (mapped
    /// as described in the module docs), and when the response carries no id.
    pub async fn publish(&self, topic: &TopicName, message: &OutboundMessage) -> Result<String> {
        let url = self.publish_url(topic);
        let body = PublishRequestBody {
            messages: vec![WireMessage {
                data: encode_payload(&message.data),
                attributes: message.attributes.clone(),
            }],
        };
        debug!(
            "POST {} ({} body bytes, {} attributes)",
            url,
            message.data.len(),
            message.attributes.len()
        );

        let mut request = self.http.post(&url).json(&body);
        if let Credentials::Bearer(token) = &self.credentials {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(ReportpubError::from)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(topic, status.as_u16(), &text).into());
        }

        let parsed: PublishResponseBody = response.json().await.map_err(ReportpubError::from)?;
        let message_id = parsed.message_ids.into_iter().next().ok_or_else(|| {
            ReportpubError::EmptyPublishResponse {
                topic: topic.to_string(),
            }
        })?;
        info!("Published message {} to {}", message_id, topic);
        Ok(message_id)
    }
}

fn status_error(topic: &TopicName, status: u16, body: &str) -> ReportpubError {
    let message = error_message(body);
    let topic = topic.to_string();
    match status {
        401 => ReportpubError::Unauthenticated(message),
        403 => ReportpubError::PermissionDenied { topic, message },
        404 => ReportpubError::TopicNotFound { topic, message },
        _ => ReportpubError::PublishRejected {
            topic,
            status,
            message,
        },
    }
}

/// The `error.message` of a Google API error body, or the raw body otherwise.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}
