//! Escritoir dashboard proxy.
//!
//! # Data Flow
//! ```text
//! GET /api/escritoir/dashboard?<params>
//!     → handler.rs (resolve config, 500 when incomplete)
//!     → upstream.rs (merge query, one outbound GET)
//!     → completed exchange: status, content type and body relayed as-is
//!     → failed exchange: logged, 502 with a fixed JSON error
//! ```
//!
//! # Design Decisions
//! - Publicly reachable, never behind the Basic Auth gate
//! - Upstream 4xx/5xx are answers, not failures

pub mod handler;
pub mod upstream;

pub use handler::{dashboard_handler, UPSTREAM_FAILURE_MESSAGE};
pub use upstream::{
    build_upstream_url, parse_query, UpstreamClient, UpstreamError, UpstreamResponse,
    DEFAULT_CONTENT_TYPE,
};
