//! # Outbound Pub/Sub Message (`common::pubsub::message`)
//!
//! File: cli/src/common/pubsub/message.rs
//!
//! ## Overview
//!
//! Builds the one message reportpub sends: the archive bytes encoded as
//! standard, padded base64 text, carried as the UTF-8 bytes of that text.
//! Subscribers base64-decode the body to get the zip back.
//!
use crate::core::error::{ReportpubError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::BTreeMap;

/// A message ready to be handed to the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Message body as it should arrive at subscribers.
    pub data: Vec<u8>,
    /// String attributes attached to the message; may be empty.
    pub attributes: BTreeMap<String, String>,
}

impl OutboundMessage {
    /// Wraps an archive: the body becomes the base64 text of `archive`.
    pub fn from_archive(archive: &[u8], attributes: BTreeMap<String, String>) -> Self {
        Self {
            data: encode_payload(archive).into_bytes(),
            attributes,
        }
    }

    /// Approximate size the service counts against its limit: body plus attributes.
    pub fn size(&self) -> usize {
        self.data.len()
            + self
                .attributes
                .iter()
                .map(|(k, v)| k.len() + v.len())
                .sum::<usize>()
    }

    /// Rejects the message when it would exceed `limit` bytes.
    pub fn ensure_within(&self, limit: usize) -> Result<()> {
        let size = self.size();
        if size > limit {
            anyhow::bail!(ReportpubError::PayloadTooLarge { size, limit });
        }
        Ok(())
    }
}

/// Base64 text of `bytes` (standard alphabet, padded).
pub fn encode_payload(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
