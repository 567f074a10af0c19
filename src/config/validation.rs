//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (clap and serde handle syntactic)
//! - Reject settings the server cannot start with
//! - Report risky but legal settings as warnings for the startup log
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure: it never touches the network; the asset checks only stat the disk
//! - A missing upstream is a warning, the proxy route answers 500 for it per request

use std::path::Component;
use std::path::Path;

use url::Url;

use crate::config::schema::EdgeConfig;

/// A setting the server refuses to start with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("index document name is empty")]
    EmptyIndex,

    #[error("index document `{0}` must be a plain file name inside the static directory")]
    IndexNotAFileName(String),
}

/// A legal setting worth flagging at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("Basic Auth is not configured; the static front end is publicly reachable")]
    AuthDisabled,

    #[error("Basic Auth has an empty username or password; empty credentials will be accepted")]
    EmptyCredentials,

    #[error("static directory `{0}` does not exist")]
    MissingAssetDir(String),

    #[error("index document `{0}` does not exist")]
    MissingIndex(String),

    #[error("upstream proxy is not configured; the dashboard route will answer 500")]
    UpstreamUnconfigured,

    #[error("upstream URL `{0}` does not parse; the dashboard route will answer 502")]
    UpstreamUrlInvalid(String),

    #[error("upstream timeout is disabled; a hung upstream holds the caller's request open")]
    NoUpstreamTimeout,
}

/// Checks the configuration for settings that prevent startup.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let index = config.assets.index.as_str();
    if index.is_empty() {
        errors.push(ValidationError::EmptyIndex);
    } else if !is_plain_file_name(index) {
        errors.push(ValidationError::IndexNotAFileName(index.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Collects warnings about a configuration that already passed [`validate_config`].
pub fn lint_config(config: &EdgeConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    match &config.basic_auth {
        None => warnings.push(ConfigWarning::AuthDisabled),
        Some(auth) if auth.username.is_empty() || auth.password.is_empty() => {
            warnings.push(ConfigWarning::EmptyCredentials);
        }
        Some(_) => {}
    }

    if !config.assets.dir.is_dir() {
        warnings.push(ConfigWarning::MissingAssetDir(
            config.assets.dir.display().to_string(),
        ));
    } else if !config.assets.index_path().is_file() {
        warnings.push(ConfigWarning::MissingIndex(
            config.assets.index_path().display().to_string(),
        ));
    }

    match config.upstream.target() {
        Ok(target) => {
            if Url::parse(target.api_url).is_err() {
                warnings.push(ConfigWarning::UpstreamUrlInvalid(target.api_url.to_string()));
            }
        }
        Err(_) => warnings.push(ConfigWarning::UpstreamUnconfigured),
    }

    if config.upstream.timeout().is_none() {
        warnings.push(ConfigWarning::NoUpstreamTimeout);
    }

    warnings
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
