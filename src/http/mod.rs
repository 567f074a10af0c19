//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → /health                    → health check
//!     → /api/escritoir/dashboard   → upstream proxy
//!     → anything else              → Basic Auth gate → static assets
//!     → response.rs (shared error bodies)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use response::{json_error, ErrorBody};
pub use server::{
    AppState, HttpServer, ServerError, DASHBOARD_PATH, DASHBOARD_SLASH_PATH, HEALTH_PATH,
};
