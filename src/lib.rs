//! Escritoir edge server library.

// Request surfaces
pub mod assets;
pub mod auth;
pub mod health;
pub mod http;
pub mod proxy;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
