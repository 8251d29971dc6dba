//! GitHub REST client foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout, User-Agent and API base URL
//! - Endpoint URLs built from percent-encoded path segments
//! - Optional bearer token authentication
//! - Status code to `TransportError` mapping (not found, auth, rate limit)

use crate::error::TransportError;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("driftcheck/", env!("CARGO_PKG_VERSION"));

/// Media type requested from the API
const ACCEPT: &str = "application/vnd.github+json";

/// Pinned REST API version
const API_VERSION: &str = "2022-11-28";

/// Service name used in errors
const SERVICE: &str = "GitHub";

/// HTTP client wrapper for the GitHub REST API
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new client with a custom base URL and timeout
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let parsed = Url::parse(base_url).map_err(|e| TransportError::NetworkError {
            url: base_url.to_string(),
            message: format!("invalid API base URL: {}", e),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(TransportError::NetworkError {
                url: base_url.to_string(),
                message: "invalid API base URL: cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| TransportError::NetworkError {
                url: base_url.to_string(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
        })
    }

    /// Authenticate requests with a bearer token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Returns true if a token is configured
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build an absolute URL from path segments, percent-encoding each one
    ///
    /// `#`, `?` and `/` inside a segment are escaped, so branch and file
    /// names can never spill into the query or fragment.
    pub fn url<I, S>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, TransportError> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: url.to_string(),
                }
            } else {
                TransportError::NetworkError {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    /// Perform a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> Result<T, TransportError> {
        let request = self.prepare(self.client.get(url.clone()));
        let response = self.send(request, &url).await?;
        let response = check_status(response, &url, what)?;

        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::invalid_response(SERVICE, what, e.to_string()))
    }

    /// Perform a POST request with a JSON body, returning the success status
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
        what: &str,
    ) -> Result<StatusCode, TransportError> {
        let request = self.prepare(self.client.post(url.clone())).json(body);
        let response = self.send(request, &url).await?;
        let response = check_status(response, &url, what)?;
        Ok(response.status())
    }
}

/// Map a response status to a transport error, passing successes through
fn check_status(response: Response, url: &Url, what: &str) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let rate_limited = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "0")
        .unwrap_or(false);

    Err(classify_status(status, rate_limited, url.as_str(), what))
}

fn classify_status(
    status: StatusCode,
    rate_limited: bool,
    url: &str,
    what: &str,
) -> TransportError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimitExceeded {
            service: SERVICE.to_string(),
        },
        StatusCode::FORBIDDEN if rate_limited => TransportError::RateLimitExceeded {
            service: SERVICE.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportError::AuthenticationError {
            service: SERVICE.to_string(),
            message: format!("HTTP {} for {}", status.as_u16(), what),
        },
        StatusCode::NOT_FOUND => TransportError::not_found(what, SERVICE),
        _ => TransportError::HttpStatus {
            service: SERVICE.to_string(),
            status: status.as_u16(),
            url: url.to_string(),
        },
    }
}
