//! Outbound client for the Escritoir API.
//!
//! # Responsibilities
//! - Overlay the caller's query onto the configured base URL
//! - Issue exactly one GET with the configured authorization
//! - Buffer the upstream reply into an envelope the handler relays unchanged
//!
//! # Design Decisions
//! - Failures are values (`UpstreamError`), never panics
//! - No retries and no caching: every call is a fresh attempt
//! - The timeout comes from config; without one a hung upstream hangs the caller

use axum::{
    body::Bytes,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use url::Url;

use crate::config::{UpstreamConfig, UpstreamTarget};

/// Content type assumed when the upstream sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Why an outbound exchange did not complete.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("upstream authorization is not a valid header value")]
    InvalidAuthorization(#[source] axum::http::header::InvalidHeaderValue),

    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("reading upstream body failed: {0}")]
    Body(#[source] reqwest::Error),
}

/// A completed upstream exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Shared handle to the outbound HTTP client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Build the client, applying the configured timeout.
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Perform one GET against `target` with `query` merged onto its URL.
    pub async fn fetch(
        &self,
        target: UpstreamTarget<'_>,
        query: &[(String, String)],
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = build_upstream_url(target.api_url, query)?;

        let mut authorization =
            HeaderValue::from_str(target.authorization).map_err(UpstreamError::InvalidAuthorization)?;
        authorization.set_sensitive(true);

        tracing::debug!(url = %redacted(&url), "Consulting upstream");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, HeaderValue::from_static(DEFAULT_CONTENT_TYPE))
            .send()
            .await
            .map_err(UpstreamError::Request)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        let body = response.bytes().await.map_err(UpstreamError::Body)?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Overlay `query` onto `base`. Existing keys keep their position and take the
/// new value; new keys are appended. Later pairs win over earlier ones.
pub fn build_upstream_url(base: &str, query: &[(String, String)]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if query.is_empty() {
        return Ok(url);
    }

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    for (key, value) in query {
        set_pair(&mut pairs, key, value);
    }

    url.query_pairs_mut().clear().extend_pairs(&pairs);
    Ok(url)
}

/// Replace the first `key` entry and drop the rest, or append when absent.
fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == key) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut index = 0;
            pairs.retain(|(k, _)| {
                let keep = index <= first || k != key;
                index += 1;
                keep
            });
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

/// Decode a raw query string into ordered pairs.
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|raw| url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// The URL without userinfo, for logs.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    // Cannot-be-a-base URLs reject these setters; such URLs carry no userinfo anyway.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.to_string()
}
