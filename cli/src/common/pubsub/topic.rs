//! Fully-qualified Pub/Sub topic names (`projects/{project}/topics/{topic}`).
//!
//! Names are checked against the service's naming rules up front so a typo in
//! the configuration fails before any archive is read or request is sent.
use crate::core::error::{ReportpubError, Result};
use std::fmt;

const TOPIC_MIN_LEN: usize = 3;
const TOPIC_MAX_LEN: usize = 255;

/// A validated project/topic pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicName {
    project: String,
    topic: String,
}

impl TopicName {
    /// Validates and builds a topic name.
    ///
    /// The project id must be non-empty and free of `/`. The topic id must be
    /// 3-255 characters, start with a letter, use only letters, digits and
    /// `-_.~+%`, and must not start with `goog`.
    pub fn new(project: &str, topic: &str) -> Result<Self> {
        if project.is_empty() || project.contains('/') {
            anyhow::bail!(ReportpubError::Config(format!(
                "Invalid project id '{}'",
                project
            )));
        }
        if let Some(reason) = topic_violation(topic) {
            anyhow::bail!(ReportpubError::Config(format!(
                "Invalid topic id '{}': {}",
                topic, reason
            )));
        }
        Ok(Self {
            project: project.to_string(),
            topic: topic.to_string(),
        })
    }
}

fn topic_violation(topic: &str) -> Option<&'static str> {
    let len = topic.chars().count();
    if !(TOPIC_MIN_LEN..=TOPIC_MAX_LEN).contains(&len) {
        return Some("must be between 3 and 255 characters");
    }
    if !topic.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Some("must start with a letter");
    }
    if topic.starts_with("goog") {
        return Some("must not start with 'goog'");
    }
    if !topic
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.~+%".contains(c))
    {
        return Some("may only contain letters, digits and -_.~+%");
    }
    None
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/topics/{}", self.project, self.topic)
    }
}
