//! Snipcart webhook support: event envelope types and request-token
//! verification.
//!
//! Snipcart signs nothing; instead every webhook carries an `x-request-token`
//! header that must be echoed back to Snipcart's request-validation endpoint.
//! Verification fails closed: a missing token, an invalid token, or an
//! unreachable validation endpoint all reject the request.

mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::SnipcartConfig;

/// Errors raised while verifying a webhook request token.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The `x-request-token` header was absent.
    #[error("missing x-request-token header")]
    MissingToken,

    /// Snipcart did not recognize the token.
    #[error("invalid request token")]
    InvalidToken,

    /// The validation endpoint could not be reached.
    #[error("token validation failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Verifies webhook request tokens against Snipcart.
#[derive(Clone)]
pub struct WebhookVerifier {
    inner: Arc<WebhookVerifierInner>,
}

struct WebhookVerifierInner {
    client: reqwest::Client,
    validation_base: String,
    secret_key: SecretString,
}

impl WebhookVerifier {
    /// Create a new verifier.
    #[must_use]
    pub fn new(config: &SnipcartConfig) -> Self {
        Self {
            inner: Arc::new(WebhookVerifierInner {
                client: reqwest::Client::new(),
                validation_base: config.validation_base.trim_end_matches('/').to_string(),
                secret_key: config.secret_key.clone(),
            }),
        }
    }

    /// Verify a webhook's request token.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError` unless Snipcart confirms the token; callers must
    /// treat every error as an unauthorized request.
    pub async fn verify(&self, token: Option<&str>) -> Result<(), VerifyError> {
        let token = token.ok_or(VerifyError::MissingToken)?;
        if token.is_empty() {
            return Err(VerifyError::MissingToken);
        }

        let url = format!(
            "{}/api/requestvalidation/{token}",
            self.inner.validation_base
        );
        let response = self
            .inner
            .client
            .get(&url)
            .basic_auth(self.inner.secret_key.expose_secret(), Some(""))
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            tracing::warn!(status = %response.status(), "webhook token rejected by Snipcart");
            Err(VerifyError::InvalidToken)
        }
    }
}
