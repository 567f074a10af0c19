//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the edge
//! server. All types derive Serde traits so a config can be dumped or built
//! from any serde source; the binary fills it from the environment.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::loader::{ENV_API_URL, ENV_AUTH};
use crate::config::ConfigError;

/// Root configuration for the edge server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EdgeConfig {
    /// Listener configuration (interface, port).
    pub listener: ListenerConfig,

    /// Static front-end bundle.
    pub assets: AssetsConfig,

    /// Upstream Escritoir API.
    pub upstream: UpstreamConfig,

    /// Basic Auth credentials. `None` leaves the static surface open.
    pub basic_auth: Option<BasicAuthConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind. All interfaces by default, for container port forwarding.
    pub host: IpAddr,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// The socket address to bind.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory the front-end bundle is served from.
    pub dir: PathBuf,

    /// File name inside `dir` served for every unmatched path.
    pub index: String,
}

impl AssetsConfig {
    /// Full path of the index document.
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(&self.index)
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public"),
            index: "index.html".to_string(),
        }
    }
}

/// Upstream API configuration.
///
/// Both values are optional at startup; the proxy route reports their absence
/// per request so the rest of the server stays usable.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the dashboard endpoint, possibly with its own query.
    pub api_url: Option<String>,

    /// Literal `Authorization` header value, e.g. `Token xxx` or `Bearer xxx`.
    pub authorization: Option<String>,

    /// Outbound request timeout in seconds. `0` disables the timeout.
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Resolves the values the proxy needs, naming every one that is missing.
    pub fn target(&self) -> Result<UpstreamTarget<'_>, ConfigError> {
        match (self.api_url.as_deref(), self.authorization.as_deref()) {
            (Some(api_url), Some(authorization)) => Ok(UpstreamTarget {
                api_url,
                authorization,
            }),
            (api_url, authorization) => {
                let mut missing = Vec::new();
                if api_url.is_none() {
                    missing.push(ENV_API_URL);
                }
                if authorization.is_none() {
                    missing.push(ENV_AUTH);
                }
                Err(ConfigError::Missing(missing))
            }
        }
    }

    /// Outbound timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            authorization: None,
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_url", &self.api_url)
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Borrowed view of a fully configured upstream.
#[derive(Debug, Clone, Copy)]
pub struct UpstreamTarget<'a> {
    pub api_url: &'a str,
    pub authorization: &'a str,
}

/// Basic Auth credential pair.
#[derive(Clone, Deserialize, Serialize)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces_on_3000() {
        let config = EdgeConfig::default();
        assert_eq!(config.listener.bind_address().to_string(), "0.0.0.0:3000");
        assert_eq!(config.assets.index_path(), PathBuf::from("public/index.html"));
        assert!(config.basic_auth.is_none());
    }

    #[test]
    fn target_names_every_missing_value() {
        let upstream = UpstreamConfig::default();
        match upstream.target() {
            Err(ConfigError::Missing(names)) => {
                assert_eq!(names, vec!["ESCRITOIR_API_URL", "ESCRITOIR_AUTH"]);
            }
            other => panic!("expected missing config, got {other:?}"),
        }

        let upstream = UpstreamConfig {
            api_url: Some("https://api.example.com/dashboard".into()),
            ..UpstreamConfig::default()
        };
        match upstream.target() {
            Err(ConfigError::Missing(names)) => assert_eq!(names, vec!["ESCRITOIR_AUTH"]),
            other => panic!("expected missing config, got {other:?}"),
        }
    }

    #[test]
    fn target_resolves_when_complete() {
        let upstream = UpstreamConfig {
            api_url: Some("https://api.example.com/dashboard".into()),
            authorization: Some("Token abc".into()),
            timeout_secs: 0,
        };
        let target = upstream.target().unwrap();
        assert_eq!(target.api_url, "https://api.example.com/dashboard");
        assert_eq!(target.authorization, "Token abc");
        assert_eq!(upstream.timeout(), None);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let auth = BasicAuthConfig {
            username: "alice".into(),
            password: "secret".into(),
        };
        let upstream = UpstreamConfig {
            authorization: Some("Token abc".into()),
            ..UpstreamConfig::default()
        };
        assert!(!format!("{auth:?}").contains("secret"));
        assert!(!format!("{upstream:?}").contains("abc"));
    }
}
