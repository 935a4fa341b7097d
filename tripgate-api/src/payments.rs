use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use tripgate_shared::models::events::PaymentRecordedEvent;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(create_order))
        .route("/{gateway_order_id}/status", get(order_status))
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount in major units (rupees, dollars).
    pub amount: f64,
    pub currency: Option<String>,
    /// "razorpay" (default) or "paypal".
    pub gateway: Option<String>,
    pub booking_id: Option<uuid::Uuid>,
    #[serde(default)]
    pub booking_details: Value,
}

/// POST /api/payments/order
/// Create a gateway order for a booking amount and persist the payment row.
/// The response carries the public key id the frontend checkout needs.
async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<Value>, AppError> {
    if req.amount <= 0.0 {
        return Err(AppError::ValidationError("Amount is required".to_string()));
    }

    let gateway_name = req.gateway.as_deref().unwrap_or("razorpay");
    let gateway = state
        .gateway(gateway_name)
        .ok_or_else(|| AppError::InternalServerError("Payment service not configured".to_string()))?;

    let currency = req.currency.as_deref().unwrap_or("INR");
    let amount_minor = (req.amount * 100.0).round() as i64;

    let order = gateway
        .create_order(req.booking_id, amount_minor, currency, &req.booking_details)
        .await
        .map_err(|err| {
            error!("Payment order creation failed: {}", err);
            AppError::InternalServerError(err.to_string())
        })?;

    let payment = json!({
        "booking_id": req.booking_id,
        "gateway": gateway.name(),
        "gateway_order_id": &order.id,
        "amount_minor": order.amount_minor,
        "currency": &order.currency,
        "status": &order.status,
    });
    state
        .payments
        .create_payment(&payment)
        .await
        .map_err(|err| AppError::InternalServerError(err.to_string()))?;

    if let Some(booking_id) = req.booking_id {
        let event = PaymentRecordedEvent {
            booking_id,
            gateway: gateway.name().to_string(),
            gateway_order_id: order.id.clone(),
            amount_minor: order.amount_minor,
            currency: order.currency.clone(),
            timestamp: chrono::Utc::now().timestamp(),
        };
        tracing::debug!(?event, "payment order recorded");
    }

    Ok(Json(json!({
        "success": true,
        "order_id": order.id,
        "amount": order.amount_minor,
        "currency": order.currency,
        "key_id": order.key_id,
    })))
}

/// GET /api/payments/{gateway_order_id}/status
/// Probe the gateway for the order's status and persist it.
async fn order_status(
    State(state): State<AppState>,
    Path(gateway_order_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let payment = state
        .payments
        .get_by_gateway_order_id(&gateway_order_id)
        .await
        .map_err(|err| AppError::InternalServerError(err.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Payment not found".to_string()))?;

    let gateway_name = payment["gateway"].as_str().unwrap_or("razorpay");
    let gateway = state
        .gateway(gateway_name)
        .ok_or_else(|| AppError::InternalServerError("Payment service not configured".to_string()))?;

    let status = gateway
        .fetch_status(&gateway_order_id)
        .await
        .map_err(|err| AppError::InternalServerError(err.to_string()))?;

    let status_value = serde_json::to_value(&status).unwrap_or(Value::Null);
    if let Some(status_str) = status_value.as_str() {
        state
            .payments
            .update_status(&gateway_order_id, status_str)
            .await
            .map_err(|err| AppError::InternalServerError(err.to_string()))?;
    }

    Ok(Json(json!({
        "success": true,
        "order_id": gateway_order_id,
        "status": status_value,
    })))
}
