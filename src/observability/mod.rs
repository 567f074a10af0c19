//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → tracing events (startup, auth denials, upstream failures)
//!     → request spans from tower-http's TraceLayer, tagged with x-request-id
//!
//! Consumers:
//!     → stdout, pretty or JSON (logging.rs)
//! ```

pub mod logging;

pub use logging::{init_logging, DEFAULT_FILTER};
