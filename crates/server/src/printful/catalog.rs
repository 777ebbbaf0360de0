//! Catalog endpoints: sync product listing, detail, and variant lookup.

use tracing::{debug, instrument};

use pressroom_core::PrintfulId;

use super::types::{SyncProductDetail, SyncProductSummary, SyncVariant};
use super::{PrintfulClient, PrintfulError};

impl PrintfulClient {
    /// Fetch one page of the store's sync products.
    ///
    /// An empty result means the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `PrintfulError` on transport or API failure.
    #[instrument(skip(self))]
    pub async fn list_sync_products(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SyncProductSummary>, PrintfulError> {
        let envelope = self
            .get::<Vec<SyncProductSummary>>(&format!(
                "/store/products?offset={offset}&limit={limit}"
            ))
            .await?;

        debug!(
            count = envelope.result.len(),
            total = envelope.paging.map(|p| p.total),
            "fetched sync product page"
        );
        Ok(envelope.result)
    }

    /// Fetch full detail (sync product + sync variants) for one product.
    ///
    /// # Errors
    ///
    /// Returns `PrintfulError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn get_sync_product(
        &self,
        id: PrintfulId,
    ) -> Result<SyncProductDetail, PrintfulError> {
        let envelope = self
            .get::<SyncProductDetail>(&format!("/store/products/{id}"))
            .await?;
        Ok(envelope.result)
    }

    /// Check whether a sync product still exists remotely.
    ///
    /// Race-guard used before deleting a local orphan: the remote catalog may
    /// have changed since the listing was fetched. A 404 means it is gone.
    ///
    /// # Errors
    ///
    /// Returns `PrintfulError` on failures other than not-found.
    #[instrument(skip(self))]
    pub async fn sync_product_exists(&self, id: PrintfulId) -> Result<bool, PrintfulError> {
        match self.get_sync_product(id).await {
            Ok(_) => Ok(true),
            Err(PrintfulError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Resolve an external variant ID (our SKU) to the sync variant.
    ///
    /// Uses Printful's `@` external-ID addressing.
    ///
    /// # Errors
    ///
    /// Returns `PrintfulError::NotFound` if no variant carries the external ID.
    #[instrument(skip(self))]
    pub async fn get_variant_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<SyncVariant, PrintfulError> {
        let envelope = self
            .get::<SyncVariant>(&format!("/store/variants/@{external_id}"))
            .await?;
        Ok(envelope.result)
    }
}
