use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Created,
    Attempted,
    Paid,
    Failed,
    Refunded,
}

/// A gateway-side order the frontend checks out against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Provider's order id (e.g. order_xxx)
    pub id: String,
    pub booking_id: Option<Uuid>,
    /// Amount in the gateway's minor unit (paise, cents)
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    /// Public key id the frontend checkout widget needs
    pub key_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Gateway identifier used in payment records ("razorpay", "paypal")
    fn name(&self) -> &'static str;

    /// Create an order/intent with the provider
    async fn create_order(
        &self,
        booking_id: Option<Uuid>,
        amount_minor: i64,
        currency: &str,
        notes: &serde_json::Value,
    ) -> Result<PaymentOrder, Box<dyn std::error::Error + Send + Sync>>;

    /// Retrieve the provider-side status of an order
    async fn fetch_status(
        &self,
        order_id: &str,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>>;
}
