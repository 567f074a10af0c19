//! Basic Auth credential check.

use axum::{
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::config::BasicAuthConfig;

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const REALM: &str = "Escritoir Dashboard";

const CHALLENGE: &str = "Basic realm=\"Escritoir Dashboard\"";

/// Outcome of checking one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny(Rejection),
}

/// Why a request was denied. Every variant answers with the same challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingHeader,
    WrongScheme,
    Malformed,
    BadCredentials,
}

impl Rejection {
    /// Short label for logs.
    pub fn reason(self) -> &'static str {
        match self {
            Rejection::MissingHeader => "missing authorization header",
            Rejection::WrongScheme => "authorization scheme is not Basic",
            Rejection::Malformed => "malformed Basic credentials",
            Rejection::BadCredentials => "credentials do not match",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE))],
            "Authentication required",
        )
            .into_response()
    }
}

/// Stateless gate comparing the `Authorization` header against one credential pair.
#[derive(Debug, Clone)]
pub struct BasicAuthGate {
    credentials: BasicAuthConfig,
}

impl BasicAuthGate {
    pub fn new(credentials: BasicAuthConfig) -> Self {
        Self { credentials }
    }

    /// Decide whether a request carrying `headers` may proceed.
    pub fn check(&self, headers: &HeaderMap) -> AuthDecision {
        match self.verify(headers) {
            Ok(()) => AuthDecision::Allow,
            Err(rejection) => AuthDecision::Deny(rejection),
        }
    }

    fn verify(&self, headers: &HeaderMap) -> Result<(), Rejection> {
        let value = headers
            .get(AUTHORIZATION)
            .ok_or(Rejection::MissingHeader)?
            .to_str()
            .map_err(|_| Rejection::Malformed)?;

        let (scheme, encoded) = value.split_once(' ').unwrap_or((value, ""));
        if !scheme.eq_ignore_ascii_case("Basic") {
            return Err(Rejection::WrongScheme);
        }

        let (username, password) = decode_credentials(encoded.trim())?;

        if username == self.credentials.username && password == self.credentials.password {
            Ok(())
        } else {
            Err(Rejection::BadCredentials)
        }
    }
}

/// Decodes `base64(username:password)`, splitting at the first colon.
fn decode_credentials(encoded: &str) -> Result<(String, String), Rejection> {
    if encoded.is_empty() {
        return Err(Rejection::Malformed);
    }

    let decoded = STANDARD.decode(encoded).map_err(|_| Rejection::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| Rejection::Malformed)?;

    let (username, password) = decoded.split_once(':').ok_or(Rejection::Malformed)?;
    Ok((username.to_string(), password.to_string()))
}
