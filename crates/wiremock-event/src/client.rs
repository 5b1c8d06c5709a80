//! HTTP client for the WireMock admin API.
//!
//! Each [`WiremockClient`] is bound to exactly one endpoint and registers stub
//! mappings with `POST {base}/__admin/mappings`. Uploads are single blocking
//! attempts; nothing is retried.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Admin API path that registers a new stub mapping.
pub const MAPPINGS_PATH: &str = "/__admin/mappings";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest slice of a response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Errors that can occur when delivering a stub mapping
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("connection to {endpoint} failed: {message}")]
    Connection { endpoint: String, message: String },
    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Errors raised while binding a client to an endpoint
#[derive(Error, Debug)]
pub enum ClientBuildError {
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Delivers substituted stub content to one endpoint.
pub trait StubUploader: Send + Sync {
    /// Base address of the endpoint this uploader is bound to.
    fn endpoint(&self) -> &str;

    /// Upload one stub definition. A returned error is one failed attempt.
    fn upload(&self, content: &str) -> Result<(), UploadError>;
}

/// Blocking HTTP client for one WireMock server
#[derive(Debug, Clone)]
pub struct WiremockClient {
    client: Client,
    base_url: String,
    mappings_url: Url,
}

impl WiremockClient {
    /// Create a client with the default timeout
    pub fn new(base_url: &str) -> Result<Self, ClientBuildError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientBuildError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let mappings_url = parse_mappings_url(&base_url)?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            mappings_url,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL stub mappings are posted to
    pub fn mappings_url(&self) -> &Url {
        &self.mappings_url
    }

    fn classify(&self, err: reqwest::Error) -> UploadError {
        if err.is_timeout() {
            UploadError::Timeout {
                endpoint: self.base_url.clone(),
            }
        } else if err.is_connect() {
            UploadError::Connection {
                endpoint: self.base_url.clone(),
                message: err.to_string(),
            }
        } else {
            UploadError::Request(err)
        }
    }
}

impl StubUploader for WiremockClient {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn upload(&self, content: &str) -> Result<(), UploadError> {
        let resp = self
            .client
            .post(self.mappings_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(content.to_string())
            .send()
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().unwrap_or_default();
        Err(UploadError::Status {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

fn parse_mappings_url(base_url: &str) -> Result<Url, ClientBuildError> {
    let invalid = |reason: String| ClientBuildError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    match base.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("unsupported scheme '{scheme}'"))),
    }
    if base.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Url::parse(&format!("{base_url}{MAPPINGS_PATH}")).map_err(|e| invalid(e.to_string()))
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("request failed with status {status}");
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = WiremockClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.endpoint(), "http://localhost:8080");
        assert_eq!(
            client.mappings_url().as_str(),
            "http://localhost:8080/__admin/mappings"
        );
    }

    #[test]
    fn test_new_keeps_context_path() {
        let client = WiremockClient::new("https://stubs.example.com/wiremock").unwrap();
        assert_eq!(
            client.mappings_url().as_str(),
            "https://stubs.example.com/wiremock/__admin/mappings"
        );
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = WiremockClient::new("not a url").unwrap_err();
        assert!(matches!(err, ClientBuildError::InvalidUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_new_rejects_unsupported_scheme() {
        let err = WiremockClient::new("ftp://localhost:21").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_error_message_uses_body() {
        let msg = error_message(reqwest::StatusCode::UNPROCESSABLE_ENTITY, " bad json \n");
        assert_eq!(msg, "bad json");

        let msg = error_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(msg.contains("500"));
    }

    #[test]
    fn test_error_message_truncates_long_body() {
        let body = "x".repeat(MAX_ERROR_BODY * 2);
        let msg = error_message(reqwest::StatusCode::BAD_REQUEST, &body);
        assert_eq!(msg.len(), MAX_ERROR_BODY + 3);
        assert!(msg.ends_with("..."));
    }
}
