//! # reportpub Publish Command
//!
//! File: cli/src/commands/publish.rs
//!
//! ## Overview
//!
//! `reportpub publish` reads an existing archive, base64-encodes it and
//! publishes the text as a single message to the configured topic, printing
//! the message id the service assigns. It is also the second half of
//! `reportpub run`.
//!
//! Order of operations, cheapest check first:
//! 1. Validate the topic name.
//! 2. Read the archive and build the message.
//! 3. Reject it if it exceeds `max_message_bytes`.
//! 4. Resolve credentials and send the single publish request.
//!
//! ```bash
//! reportpub publish --archive build/reports.zip --topic dynamic-analysis-result
//! ```
//!
use crate::common::fs::io;
use crate::common::pubsub::{self, message::OutboundMessage};
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use tracing::info;

/// Publishes the configured archive and returns the message id.
///
/// # Errors
///
/// Returns an `Err` if the topic name is invalid, the archive cannot be read,
/// the payload is too large, credentials cannot be obtained, or the publish
/// request fails.
pub async fn handle_publish(config: &Config) -> Result<String> {
    let topic = config.topic_name()?;
    let archive = io::read_file_bytes(&config.archive_path)?;
    let message = OutboundMessage::from_archive(&archive, config.attributes.clone());
    info!(
        "Encoded {} archive bytes into a {} byte message for {}",
        archive.len(),
        message.data.len(),
        topic
    );
    message.ensure_within(config.max_message_bytes)?;

    let client = pubsub::connect(config).await?;
    let message_id = client
        .publish(&topic, &message)
        .await
        .with_context(|| {
            format!(
                "Failed to publish {} to {}",
                config.archive_path.display(),
                topic
            )
        })?;

    println!("📤 Published message ID: {}", message_id);
    Ok(message_id)
}
