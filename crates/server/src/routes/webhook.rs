//! Snipcart webhook endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::orders::OrderTranslator;
use crate::snipcart::{EVENT_ORDER_COMPLETED, WebhookEvent};
use crate::state::AppState;

/// Handle a Snipcart webhook event.
///
/// Every request must carry a valid `x-request-token` header; verification
/// fails closed. `order.completed` events are translated into Printful
/// orders; every other event name is acknowledged and ignored so Snipcart
/// does not retry it.
#[instrument(skip(state, headers, event), fields(event = %event.event_name))]
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<WebhookEvent>,
) -> Result<Json<Value>> {
    let token = headers
        .get("x-request-token")
        .and_then(|v| v.to_str().ok());
    state
        .verifier()
        .verify(token)
        .await
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    if event.event_name != EVENT_ORDER_COMPLETED {
        tracing::debug!(event = %event.event_name, "ignoring unhandled webhook event");
        return Ok(Json(json!({ "ok": true, "ignored": event.event_name })));
    }

    let content = event
        .order_content()
        .map_err(|e| AppError::BadRequest(format!("malformed order.completed payload: {e}")))?;

    let translator = OrderTranslator::new(state.printful().clone());
    let confirmation = translator.handle_order_completed(&content).await?;

    Ok(Json(json!({ "ok": true, "order": confirmation })))
}
