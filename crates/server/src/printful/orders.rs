//! Order creation endpoint.

use tracing::{info, instrument};

use super::types::{OrderConfirmation, OrderRequest};
use super::{PrintfulClient, PrintfulError};

impl PrintfulClient {
    /// Create an order.
    ///
    /// Orders are created as drafts unless the client was configured with
    /// `confirm_orders`, in which case Printful submits them for fulfillment
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns `PrintfulError` on transport or API failure; no draft is
    /// created server-side on a rejected request.
    #[instrument(skip(self, request), fields(items = request.items.len(), shipping = %request.shipping))]
    pub async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, PrintfulError> {
        let confirm = self.confirm_orders();
        let envelope = self
            .post::<_, OrderConfirmation>(&format!("/orders?confirm={confirm}"), request)
            .await?;

        info!(
            order_id = %envelope.result.id,
            status = %envelope.result.status,
            "Printful order created"
        );
        Ok(envelope.result)
    }
}
