//! Printful API client for catalog sync and order submission.
//!
//! # API Reference
//!
//! - Base URL: `https://api.printful.com`
//! - Authentication: private token via `Authorization: Bearer <token>`
//! - Responses are wrapped in a `{code, result, paging}` envelope
//!
//! # Supported Endpoints
//!
//! - `GET /store/products` - paginated sync product listing
//! - `GET /store/products/{id}` - sync product detail with variants
//! - `GET /store/variants/@{external_id}` - external-ID variant lookup
//! - `POST /orders` - order creation (draft unless confirm is set)

mod catalog;
mod orders;
pub mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::PrintfulConfig;

/// Errors that can occur when interacting with the Printful API.
#[derive(Debug, Error)]
pub enum PrintfulError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {reason}: {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    /// Rate limited by Printful.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse a response or build the client.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Printful API client.
///
/// Cheaply cloneable via `Arc`; one instance is shared across handlers and
/// the sync engine.
#[derive(Clone)]
pub struct PrintfulClient {
    inner: Arc<PrintfulClientInner>,
}

struct PrintfulClientInner {
    client: reqwest::Client,
    api_base: String,
    confirm_orders: bool,
}

impl PrintfulClient {
    /// Create a new Printful API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build (e.g., the token
    /// contains bytes invalid in a header value).
    pub fn new(config: &PrintfulConfig) -> Result<Self, PrintfulError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| PrintfulError::Parse(format!("Invalid API token format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(PrintfulClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
                confirm_orders: config.confirm_orders,
            }),
        })
    }

    /// Whether orders should be submitted for immediate fulfillment.
    #[must_use]
    pub fn confirm_orders(&self) -> bool {
        self.inner.confirm_orders
    }

    /// Execute a GET request and unwrap the response envelope.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, PrintfulError> {
        let url = format!("{}{path}", self.inner.api_base);
        let response = self.inner.client.get(&url).send().await?;
        Self::unwrap_response(path, response).await
    }

    /// Execute a POST request with a JSON body and unwrap the envelope.
    pub(crate) async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, PrintfulError> {
        let url = format!("{}{path}", self.inner.api_base);
        let response = self.inner.client.post(&url).json(body).send().await?;
        Self::unwrap_response(path, response).await
    }

    async fn unwrap_response<T: serde::de::DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<Envelope<T>, PrintfulError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(PrintfulError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(PrintfulError::NotFound(path.to_string()));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let (reason, message) = parse_api_error(&body);
            tracing::error!(
                status = %status,
                path = %path,
                reason = %reason,
                "Printful API returned non-success status"
            );
            return Err(PrintfulError::Api {
                status: status.as_u16(),
                reason,
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PrintfulError::Parse(format!(
                "{path}: {e} (body: {})",
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

/// Extract `(reason, message)` from a Printful error body.
///
/// Error bodies look like `{"code":400,"result":"...","error":{"reason":"BadRequest","message":"..."}}`
/// but older endpoints return only `{"code":400,"result":"message"}`.
fn parse_api_error(body: &str) -> (String, String) {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        result: Option<serde_json::Value>,
        #[serde(default)]
        error: Option<ErrorDetail>,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        #[serde(default)]
        reason: String,
        #[serde(default)]
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            if let Some(detail) = parsed.error {
                (detail.reason, detail.message)
            } else {
                let message = match parsed.result {
                    Some(serde_json::Value::String(s)) => s,
                    other => other.map(|v| v.to_string()).unwrap_or_default(),
                };
                ("Unknown".to_string(), message)
            }
        }
        Err(_) => (
            "Unknown".to_string(),
            body.chars().take(200).collect::<String>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_error_with_detail() {
        let body = r#"{"code":400,"result":"Bad request","error":{"reason":"BadRequest","message":"Missing recipient"}}"#;
        let (reason, message) = parse_api_error(body);
        assert_eq!(reason, "BadRequest");
        assert_eq!(message, "Missing recipient");
    }

    #[test]
    fn test_parse_api_error_result_only() {
        let body = r#"{"code":401,"result":"Unauthorized"}"#;
        let (reason, message) = parse_api_error(body);
        assert_eq!(reason, "Unknown");
        assert_eq!(message, "Unauthorized");
    }

    #[test]
    fn test_parse_api_error_garbage() {
        let (reason, message) = parse_api_error("<html>nope</html>");
        assert_eq!(reason, "Unknown");
        assert!(message.contains("nope"));
    }
}
