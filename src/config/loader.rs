//! Configuration loading from the environment and command line.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{
    AssetsConfig, BasicAuthConfig, EdgeConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    UpstreamConfig,
};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_API_URL: &str = "ESCRITOIR_API_URL";
pub const ENV_AUTH: &str = "ESCRITOIR_AUTH";
pub const ENV_BASIC_USER: &str = "BASIC_USER";
pub const ENV_BASIC_PASS: &str = "BASIC_PASS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("BASIC_USER and BASIC_PASS must be set together")]
    IncompleteCredentials,

    #[error("missing environment configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error(
        "validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),
}

/// Every setting, read from flags first and the environment second.
#[derive(Debug, Parser)]
#[command(name = "escritoir-edge", version)]
#[command(about = "Static front-end server with Basic Auth and an Escritoir dashboard proxy", long_about = None)]
pub struct EnvArgs {
    /// Listening port.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listening interface.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Directory holding the front-end bundle.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Document served for unmatched paths.
    #[arg(long, env = "INDEX_FILE", default_value = "index.html")]
    pub index_file: String,

    /// Upstream dashboard URL.
    #[arg(long, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// `Authorization` header value sent upstream.
    #[arg(long, env = ENV_AUTH, hide_env_values = true)]
    pub api_auth: Option<String>,

    /// Upstream timeout in seconds, 0 for none.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 30)]
    pub upstream_timeout_secs: u64,

    /// Basic Auth username.
    #[arg(long, env = ENV_BASIC_USER)]
    pub basic_user: Option<String>,

    /// Basic Auth password.
    #[arg(long, env = ENV_BASIC_PASS, hide_env_values = true)]
    pub basic_pass: Option<String>,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl EnvArgs {
    /// Convert parsed arguments into the configuration schema.
    pub fn into_config(self) -> Result<EdgeConfig, ConfigError> {
        // An empty variable counts as unset, so `BASIC_USER=` keeps the gate off.
        let basic_user = self.basic_user.filter(|v| !v.is_empty());
        let basic_pass = self.basic_pass.filter(|v| !v.is_empty());
        let basic_auth = match (basic_user, basic_pass) {
            (Some(username), Some(password)) => Some(BasicAuthConfig { username, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteCredentials),
        };

        Ok(EdgeConfig {
            listener: ListenerConfig {
                host: self.host,
                port: self.port,
            },
            assets: AssetsConfig {
                dir: self.static_dir,
                index: self.index_file,
            },
            upstream: UpstreamConfig {
                // An empty variable counts as unset.
                api_url: self.api_url.filter(|v| !v.is_empty()),
                authorization: self.api_auth.filter(|v| !v.is_empty()),
                timeout_secs: self.upstream_timeout_secs,
            },
            basic_auth,
            observability: ObservabilityConfig {
                log_format: self.log_format,
            },
        })
    }
}

/// Load and validate configuration from the process arguments and environment.
pub fn load_config() -> Result<EdgeConfig, ConfigError> {
    load_config_from(std::env::args_os())
}

/// Load and validate configuration from an explicit argument list.
pub fn load_config_from<I, T>(args: I) -> Result<EdgeConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let config = EnvArgs::try_parse_from(args)?.into_config()?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
