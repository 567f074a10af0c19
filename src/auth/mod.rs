//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Request for the static surface
//!     → middleware.rs (axum middleware)
//!     → gate.rs (Authorization header → Allow | Deny)
//!     → Allow: next stage (static assets)
//!     → Deny: 401 with WWW-Authenticate challenge
//! ```
//!
//! # Design Decisions
//! - Stateless per request: no session, cookie, lockout or rate limit
//! - The health check and the dashboard proxy are never behind the gate

pub mod gate;
pub mod middleware;

pub use gate::{AuthDecision, BasicAuthGate, Rejection, REALM};
pub use middleware::basic_auth_middleware;
