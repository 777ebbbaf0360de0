//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::printful::PrintfulClient;
use crate::snipcart::WebhookVerifier;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    printful: PrintfulClient,
    verifier: WebhookVerifier,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Printful HTTP client fails to build
    /// (e.g., the API token contains bytes invalid in a header value).
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, crate::printful::PrintfulError> {
        let printful = PrintfulClient::new(&config.printful)?;
        let verifier = WebhookVerifier::new(&config.snipcart);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                printful,
                verifier,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Printful API client.
    #[must_use]
    pub fn printful(&self) -> &PrintfulClient {
        &self.inner.printful
    }

    /// Get a reference to the Snipcart webhook verifier.
    #[must_use]
    pub fn verifier(&self) -> &WebhookVerifier {
        &self.inner.verifier
    }
}
