//! # reportpub Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module turns what would otherwise be hard-coded constants (report
//! folder, archive name, project id, topic id) into a `Config` record. The
//! record starts from built-in defaults and is overridden, layer by layer, by
//! configuration files, environment variables and command-line flags.
//!
//! ## Architecture
//!
//! Configuration sources (lowest to highest precedence):
//! 1. Default values defined in the code
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/reportpub/config.toml`)
//! 3. Project-specific `.reportpub.toml` in the current directory or an
//!    ancestor (the search stops at a directory containing `.git`), or the
//!    file named by `--config`
//! 4. Environment variables and command-line flags (`ConfigArgs`)
//!
//! Relative paths inside a project file are resolved against the directory
//! holding that file, so a `.reportpub.toml` at the repository root works no
//! matter which subdirectory the build invokes the binary from. `~` is expanded
//! everywhere.
//!
//! ## Examples
//!
//! ```toml
//! # .reportpub.toml
//! source_dir = "build/reports"
//! archive_path = "build/test-results-junit.zip"
//! project_id = "my-project"
//! topic_id = "dynamic-analysis-result"
//!
//! [attributes]
//! pipeline = "nightly"
//! ```
//!
//! ```rust
//! let cfg = config::load_config(&cli.config)?;
//! let topic = cfg.topic_name()?;
//! ```
//!
use crate::common::fs::io;
use crate::common::pubsub::topic::TopicName;
use crate::core::error::{ReportpubError, Result};
use anyhow::{anyhow, Context};
use clap::Args;
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_SOURCE_DIR: &str = "src/build/reports";
pub const DEFAULT_ARCHIVE_PATH: &str = "test-results-junit.zip";
pub const DEFAULT_PROJECT_ID: &str = "gradiator-x-454207";
pub const DEFAULT_TOPIC_ID: &str = "dynamic-analysis-result";
pub const DEFAULT_ENDPOINT: &str = "https://pubsub.googleapis.com";
/// Pub/Sub rejects messages larger than 10 MB.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 10_000_000;

const PROJECT_CONFIG_FILENAME: &str = ".reportpub.toml";
const SUBMISSION_ID_ATTRIBUTE: &str = "submissionId";

/// The effective configuration after all layers have been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory whose files are archived.
    pub source_dir: PathBuf,
    /// Where the zip archive is written (and read back from for publishing).
    pub archive_path: PathBuf,
    /// Pub/Sub project that owns the topic.
    pub project_id: String,
    /// Topic the archive is published to.
    pub topic_id: String,
    /// Base URL of the Pub/Sub REST API.
    pub endpoint: String,
    /// `host:port` of a Pub/Sub emulator. Takes precedence over `endpoint`.
    pub emulator_host: Option<String>,
    /// Bearer token used instead of asking `gcloud` for one.
    pub access_token: Option<String>,
    /// Attributes attached to the published message.
    pub attributes: BTreeMap<String, String>,
    /// Upper bound on the encoded message body.
    pub max_message_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            project_id: DEFAULT_PROJECT_ID.to_string(),
            topic_id: DEFAULT_TOPIC_ID.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            emulator_host: None,
            access_token: None,
            attributes: BTreeMap::new(),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl Config {
    /// Resolves the configured project and topic into a validated topic name.
    pub fn topic_name(&self) -> Result<TopicName> {
        TopicName::new(&self.project_id, &self.topic_id)
    }
}

/// Overrides supplied on the command line or through the environment.
///
/// Every field is optional; `None` leaves the value from the lower layers untouched.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Load this TOML file instead of searching for `.reportpub.toml`.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory containing the test reports to archive.
    #[arg(long, value_name = "DIR", env = "REPORTPUB_SOURCE_DIR", global = true)]
    pub source_dir: Option<PathBuf>,

    /// Path of the zip archive to write and publish.
    #[arg(long = "archive", value_name = "FILE", env = "REPORTPUB_ARCHIVE", global = true)]
    pub archive_path: Option<PathBuf>,

    /// Pub/Sub project id.
    #[arg(long = "project", value_name = "ID", env = "REPORTPUB_PROJECT_ID", global = true)]
    pub project_id: Option<String>,

    /// Pub/Sub topic id.
    #[arg(long = "topic", value_name = "ID", env = "REPORTPUB_TOPIC_ID", global = true)]
    pub topic_id: Option<String>,

    /// Base URL of the Pub/Sub REST API.
    #[arg(long, value_name = "URL", env = "REPORTPUB_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Publish to a Pub/Sub emulator at HOST:PORT (no authentication).
    #[arg(long, value_name = "HOST:PORT", env = "PUBSUB_EMULATOR_HOST", global = true)]
    pub emulator_host: Option<String>,

    /// OAuth2 access token; when absent, `gcloud auth print-access-token` is used.
    #[arg(
        long,
        value_name = "TOKEN",
        env = "REPORTPUB_ACCESS_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub access_token: Option<String>,

    /// Message attribute to attach (repeatable).
    #[arg(
        long = "attribute",
        value_name = "KEY=VALUE",
        value_parser = parse_attribute,
        global = true
    )]
    pub attributes: Vec<(String, String)>,

    /// Shorthand for `--attribute submissionId=<ID>`.
    #[arg(long, value_name = "ID", global = true)]
    pub submission_id: Option<String>,
}

/// Partial configuration as read from a TOML file. Every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    source_dir: Option<String>,
    archive_path: Option<String>,
    project_id: Option<String>,
    topic_id: Option<String>,
    endpoint: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    max_message_bytes: Option<usize>,
}

fn parse_attribute(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Loads the effective configuration for this invocation.
///
/// # Errors
///
/// Returns an `Err` if a configuration file exists but cannot be read or parsed,
/// if `--config` names a missing file, or if the merged result fails validation.
pub fn load_config(args: &ConfigArgs) -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    load_config_layers(args, user_config_path().as_deref(), &current_dir)
}

fn load_config_layers(
    args: &ConfigArgs,
    user_config: Option<&Path>,
    start_dir: &Path,
) -> Result<Config> {
    let mut config = Config::default();

    match user_config {
        Some(path) if path.is_file() => {
            info!("Loading user configuration from: {}", path.display());
            let file_config = load_config_from_path(path)?;
            apply_file_config(&mut config, file_config, None);
        }
        Some(path) => debug!("User configuration file not found at {}", path.display()),
        None => debug!("Could not determine user config directory."),
    }

    let project_config = match &args.config {
        Some(explicit) => Some(explicit.clone()),
        None => find_project_config_path(start_dir),
    };
    if let Some(path) = project_config {
        info!("Loading project configuration from: {}", path.display());
        let file_config = load_config_from_path(&path)?;
        let base_dir = path.parent().map(Path::to_path_buf);
        apply_file_config(&mut config, file_config, base_dir.as_deref());
    } else {
        debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
    }

    apply_args(&mut config, args);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", redacted(&config));
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "Reportpub", "reportpub")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn find_project_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut path = start_dir;
    loop {
        let candidate = path.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if path.join(".git").is_dir() {
            debug!("Found .git directory at {}, stopping config search.", path.display());
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = io::read_file_to_string(path)?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Expands `~` and, when `base_dir` is given, anchors relative paths to it.
fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    match base_dir {
        Some(base) if expanded.is_relative() => base.join(expanded),
        _ => expanded,
    }
}

fn apply_file_config(config: &mut Config, file: FileConfig, base_dir: Option<&Path>) {
    if let Some(dir) = file.source_dir {
        config.source_dir = resolve_path(&dir, base_dir);
    }
    if let Some(archive) = file.archive_path {
        config.archive_path = resolve_path(&archive, base_dir);
    }
    if let Some(project) = file.project_id {
        config.project_id = project;
    }
    if let Some(topic) = file.topic_id {
        config.topic_id = topic;
    }
    if let Some(endpoint) = file.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(max) = file.max_message_bytes {
        config.max_message_bytes = max;
    }
    config.attributes.extend(file.attributes);
}

fn apply_args(config: &mut Config, args: &ConfigArgs) {
    if let Some(dir) = &args.source_dir {
        config.source_dir = resolve_path(&dir.to_string_lossy(), None);
    }
    if let Some(archive) = &args.archive_path {
        config.archive_path = resolve_path(&archive.to_string_lossy(), None);
    }
    if let Some(project) = &args.project_id {
        config.project_id = project.clone();
    }
    if let Some(topic) = &args.topic_id {
        config.topic_id = topic.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(host) = &args.emulator_host {
        config.emulator_host = Some(host.clone());
    }
    if let Some(token) = &args.access_token {
        config.access_token = Some(token.clone());
    }
    config
        .attributes
        .extend(args.attributes.iter().cloned());
    if let Some(id) = &args.submission_id {
        config
            .attributes
            .insert(SUBMISSION_ID_ATTRIBUTE.to_string(), id.clone());
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.source_dir.as_os_str().is_empty() {
        return Err(anyhow!(ReportpubError::Config(
            "source_dir cannot be empty".to_string()
        )));
    }
    if config.archive_path.as_os_str().is_empty() {
        return Err(anyhow!(ReportpubError::Config(
            "archive_path cannot be empty".to_string()
        )));
    }
    if config.max_message_bytes == 0 {
        return Err(anyhow!(ReportpubError::Config(
            "max_message_bytes must be greater than zero".to_string()
        )));
    }
    if config.emulator_host.is_none() && config.endpoint.trim().is_empty() {
        return Err(anyhow!(ReportpubError::Config(
            "endpoint cannot be empty".to_string()
        )));
    }
    for key in config.attributes.keys() {
        if key.is_empty() || key.starts_with("goog") {
            return Err(anyhow!(ReportpubError::Config(format!(
                "Invalid attribute key '{}': keys must be non-empty and must not start with 'goog'",
                key
            ))));
        }
    }
    Ok(())
}

/// Copy of `config` safe to log.
fn redacted(config: &Config) -> Config {
    let mut copy = config.clone();
    if copy.access_token.is_some() {
        copy.access_token = Some("<redacted>".to_string());
    }
    copy
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_files() -> Result<()> {
        let temp_dir = tempdir()?;
        fs::create_dir(temp_dir.path().join(".git"))?;
        let config = load_config_layers(&ConfigArgs::default(), None, temp_dir.path())?;
        assert_eq!(config, Config::default());
        assert_eq!(config.source_dir, PathBuf::from("src/build/reports"));
        assert_eq!(config.archive_path, PathBuf::from("test-results-junit.zip"));
        assert_eq!(config.project_id, "gradiator-x-454207");
        assert_eq!(config.topic_id, "dynamic-analysis-result");
        Ok(())
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result: std::result::Result<FileConfig, _> = toml::from_str("topic = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_project_file_found_in_ancestor_and_paths_anchored() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::create_dir(root.join(".git"))?;
        fs::write(
            root.join(PROJECT_CONFIG_FILENAME),
            r#"
            source_dir = "build/reports"
            archive_path = "/tmp/absolute.zip"
            topic_id = "from-file"

            [attributes]
            pipeline = "nightly"
            "#,
        )?;
        let nested = root.join("module/sub");
        fs::create_dir_all(&nested)?;

        let config = load_config_layers(&ConfigArgs::default(), None, &nested)?;
        assert_eq!(config.source_dir, root.join("build/reports"));
        assert_eq!(config.archive_path, PathBuf::from("/tmp/absolute.zip"));
        assert_eq!(config.topic_id, "from-file");
        assert_eq!(config.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(config.attributes.get("pipeline").map(String::as_str), Some("nightly"));
        Ok(())
    }

    #[test]
    fn test_search_stops_at_git_root() -> Result<()> {
        let temp_dir = tempdir()?;
        let outer = temp_dir.path();
        fs::write(outer.join(PROJECT_CONFIG_FILENAME), "topic_id = \"outer\"")?;
        let repo = outer.join("repo");
        fs::create_dir_all(repo.join(".git"))?;

        assert_eq!(find_project_config_path(&repo), None);
        Ok(())
    }

    #[test]
    fn test_precedence_user_then_project_then_args() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::create_dir(root.join(".git"))?;
        let user_file = root.join("user.toml");
        fs::write(
            &user_file,
            "project_id = \"user-project\"\ntopic_id = \"user-topic\"\nmax_message_bytes = 500",
        )?;
        fs::write(root.join(PROJECT_CONFIG_FILENAME), "topic_id = \"project-topic\"")?;

        let args = ConfigArgs {
            project_id: Some("cli-project".to_string()),
            attributes: vec![("branch".to_string(), "main".to_string())],
            submission_id: Some("42".to_string()),
            ..Default::default()
        };
        let config = load_config_layers(&args, Some(&user_file), root)?;

        assert_eq!(config.project_id, "cli-project");
        assert_eq!(config.topic_id, "project-topic");
        assert_eq!(config.max_message_bytes, 500);
        assert_eq!(config.attributes.get("branch").map(String::as_str), Some("main"));
        assert_eq!(config.attributes.get("submissionId").map(String::as_str), Some("42"));
        Ok(())
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let temp_dir = tempdir().unwrap();
        let args = ConfigArgs {
            config: Some(temp_dir.path().join("missing.toml")),
            ..Default::default()
        };
        assert!(load_config_layers(&args, None, temp_dir.path()).is_err());
    }

    #[test]
    fn test_parse_attribute() {
        assert_eq!(
            parse_attribute("key=a=b"),
            Ok(("key".to_string(), "a=b".to_string()))
        );
        assert!(parse_attribute("novalue").is_err());
        assert!(parse_attribute("=value").is_err());
    }

    #[test]
    fn test_topic_checked_only_when_resolved() {
        let config = Config {
            topic_id: "1starts-with-digit".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
        let err = config.topic_name().unwrap_err();
        assert!(err.to_string().contains("Invalid topic id"));
    }

    #[test]
    fn test_validate_rejects_reserved_attribute() {
        let mut config = Config::default();
        config
            .attributes
            .insert("googKey".to_string(), "x".to_string());
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid attribute key"));
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = Config {
            max_message_bytes: 0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_redacted_hides_token() {
        let config = Config {
            access_token: Some("ya29.secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", redacted(&config));
        assert!(!debug.contains("ya29.secret"));
        assert!(debug.contains("<redacted>"));
    }
}
