//! # Pub/Sub Credentials (`common::pubsub::auth`)
//!
//! File: cli/src/common/pubsub/auth.rs
//!
//! ## Overview
//!
//! reportpub does not manage credentials itself. It picks a bearer token from,
//! in order:
//!
//! 1. Nothing at all when talking to the emulator (`PUBSUB_EMULATOR_HOST`).
//! 2. The configured access token (`--access-token` / `REPORTPUB_ACCESS_TOKEN`).
//! 3. `gcloud auth print-access-token`, i.e. whatever identity the CI agent's
//!    Cloud SDK is logged in as.
//!
use crate::common::process;
use crate::core::config::Config;
use crate::core::error::{ReportpubError, Result};
use std::fmt;
use tracing::{debug, info};

const GCLOUD: &str = "gcloud";
const GCLOUD_TOKEN_ARGS: &[&str] = &["auth", "print-access-token"];

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No `Authorization` header (emulator).
    Anonymous,
    /// `Authorization: Bearer <token>`.
    Bearer(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => write!(f, "Anonymous"),
            Credentials::Bearer(_) => write!(f, "Bearer(<redacted>)"),
        }
    }
}

/// Picks the credentials for this run.
///
/// # Errors
///
/// Returns `ReportpubError::Unauthenticated` when no token is configured and
/// `gcloud` is missing, fails, or prints nothing.
pub async fn resolve_credentials(config: &Config) -> Result<Credentials> {
    if config.emulator_host.is_some() {
        debug!("Emulator configured; sending unauthenticated requests.");
        return Ok(Credentials::Anonymous);
    }
    if let Some(token) = config.access_token.as_deref().map(str::trim) {
        if !token.is_empty() {
            debug!("Using configured access token.");
            return Ok(Credentials::Bearer(token.to_string()));
        }
    }

    info!("No access token configured; asking gcloud for one.");
    token_from_command(GCLOUD, GCLOUD_TOKEN_ARGS).await.map(Credentials::Bearer)
}

/// Runs a token-printing command and returns its trimmed output.
async fn token_from_command(cmd: &str, args: &[&str]) -> Result<String> {
    let command_line = format!("{} {}", cmd, args.join(" "));
    let output = process::run_command_capture(cmd, args)
        .await
        .map_err(|e| {
            ReportpubError::Unauthenticated(format!(
                "no access token configured and `{}` failed ({:#}); \
                 set REPORTPUB_ACCESS_TOKEN or run `gcloud auth login`",
                command_line.trim_end(),
                e
            ))
        })?;
    let token = output.trim();
    if token.is_empty() {
        anyhow::bail!(ReportpubError::Unauthenticated(format!(
            "`{}` returned an empty token",
            command_line.trim_end()
        )));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emulator_is_anonymous_even_with_token() -> Result<()> {
        let config = Config {
            emulator_host: Some("localhost:8085".to_string()),
            access_token: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_credentials(&config).await?, Credentials::Anonymous);
        Ok(())
    }

    #[tokio::test]
    async fn test_configured_token_is_trimmed() -> Result<()> {
        let config = Config {
            access_token: Some("  ya29.token\n".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_credentials(&config).await?,
            Credentials::Bearer("ya29.token".to_string())
        );
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_token_is_trimmed() -> Result<()> {
        let token = token_from_command("sh", &["-c", "echo '  ya29.from-cli  '"]).await?;
        assert_eq!(token, "ya29.from-cli");
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_unauthenticated() {
        let err = token_from_command("sh", &["-c", "echo 'not logged in' >&2; exit 1"])
            .await
            .unwrap_err();
        match err.downcast_ref::<ReportpubError>() {
            Some(ReportpubError::Unauthenticated(msg)) => {
                assert!(msg.contains("External command failed"), "{}", msg);
                assert!(msg.contains("REPORTPUB_ACCESS_TOKEN"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_command_output_is_unauthenticated() {
        let err = token_from_command("sh", &["-c", "printf '\\n'"]).await.unwrap_err();
        match err.downcast_ref::<ReportpubError>() {
            Some(ReportpubError::Unauthenticated(msg)) => {
                assert!(msg.contains("empty token"), "{}", msg)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_command_is_unauthenticated() {
        let err = token_from_command("reportpub-no-such-gcloud", GCLOUD_TOKEN_ARGS)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportpubError>(),
            Some(ReportpubError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::Bearer("ya29.secret".to_string());
        assert_eq!(format!("{:?}", creds), "Bearer(<redacted>)");
    }
}
