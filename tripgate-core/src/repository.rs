use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use tripgate_shared::models::events::SearchLoggedEvent;

/// Repository trait for booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(
        &self,
        booking: &Value,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_by_partner_order_id(
        &self,
        partner_order_id: &str,
    ) -> Result<Option<Value>, Box<dyn std::error::Error + Send + Sync>>;

    /// Partial update keyed by the supplier-facing order id. Only the fields
    /// present in `update` are written.
    async fn update_by_partner_order_id(
        &self,
        partner_order_id: &str,
        update: &Value,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Value>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for payment records
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create_payment(
        &self,
        payment: &Value,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Value>, Box<dyn std::error::Error + Send + Sync>>;

    async fn update_status(
        &self,
        gateway_order_id: &str,
        status: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for the search-history analytics log
#[async_trait]
pub trait SearchHistoryRepository: Send + Sync {
    async fn log_search(
        &self,
        event: &SearchLoggedEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
