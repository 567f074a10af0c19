use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::response::json_error;
use crate::http::server::AppState;
use crate::http::request_id;
use crate::proxy::upstream::parse_query;

/// Body message for every failed upstream exchange.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to consult the Escritoir API";

/// `GET /api/escritoir/dashboard`: relay the caller's query to the upstream.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let request_id = request_id(&headers);

    let target = match state.config.upstream.target() {
        Ok(target) => target,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Dashboard proxy is not configured");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let query = parse_query(query.as_deref());

    match state.upstream.fetch(target, &query).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                status = %response.status,
                bytes = response.body.len(),
                "Relaying upstream response"
            );
            response.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream exchange failed");
            json_error(StatusCode::BAD_GATEWAY, UPSTREAM_FAILURE_MESSAGE)
        }
    }
}
