//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional, dotenvy)
//!     → process environment + command-line flags
//!     → loader.rs (clap parse, env fallbacks)
//!     → validation.rs (semantic checks, startup warnings)
//!     → EdgeConfig (validated, immutable)
//!     → shared via Arc with every handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Every field has a default except the secrets
//! - Upstream settings may be absent; the proxy route reports them per request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_from, ConfigError, EnvArgs};
pub use schema::{
    AssetsConfig, BasicAuthConfig, EdgeConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    UpstreamConfig, UpstreamTarget,
};
pub use validation::{lint_config, validate_config, ConfigWarning, ValidationError};
