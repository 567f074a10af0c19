//! Liveness probe for uptime monitors and orchestrators.
//!
//! `GET /health` and `HEAD /health` answer 200 with an empty body. The probe
//! sits outside the Basic Auth gate and never touches the upstream, so it
//! only reports that the process is serving requests.

use axum::http::StatusCode;

/// Health check handler.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(health().await, StatusCode::OK);
    }
}
