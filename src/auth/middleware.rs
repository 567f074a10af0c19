use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::gate::{AuthDecision, BasicAuthGate};

/// Runs the gate in front of the wrapped service and stops denied requests.
pub async fn basic_auth_middleware(
    State(gate): State<Arc<BasicAuthGate>>,
    request: Request,
    next: Next,
) -> Response {
    match gate.check(request.headers()) {
        AuthDecision::Allow => next.run(request).await,
        AuthDecision::Deny(rejection) => {
            tracing::debug!(
                path = %request.uri().path(),
                reason = rejection.reason(),
                "Basic Auth denied"
            );
            rejection.into_response()
        }
    }
}
