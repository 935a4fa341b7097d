use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use tripgate_core::PaymentRepository;

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    booking_id: Option<Uuid>,
    gateway: String,
    gateway_order_id: String,
    gateway_payment_id: Option<String>,
    amount_minor: i64,
    currency: String,
    status: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PaymentRow {
    fn into_json(self) -> Value {
        json!({
            "id": self.id,
            "booking_id": self.booking_id,
            "gateway": self.gateway,
            "gateway_order_id": self.gateway_order_id,
            "gateway_payment_id": self.gateway_payment_id,
            "amount_minor": self.amount_minor,
            "currency": self.currency,
            "status": self.status,
            "created_at": self.created_at.map(|t| t.to_rfc3339()),
            "updated_at": self.updated_at.map(|t| t.to_rfc3339()),
        })
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create_payment(
        &self,
        payment: &Value,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let id = Uuid::new_v4();
        let booking_id = payment["booking_id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok());
        let gateway_order_id = payment["gateway_order_id"]
            .as_str()
            .ok_or("Missing gateway_order_id")?;

        sqlx::query(
            r#"
            INSERT INTO payments
                (id, booking_id, gateway, gateway_order_id, gateway_payment_id,
                 amount_minor, currency, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(booking_id)
        .bind(payment["gateway"].as_str().unwrap_or("razorpay"))
        .bind(gateway_order_id)
        .bind(payment["gateway_payment_id"].as_str())
        .bind(payment["amount_minor"].as_i64().unwrap_or(0))
        .bind(payment["currency"].as_str().unwrap_or("INR"))
        .bind(payment["status"].as_str().unwrap_or("CREATED"))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Value>, Box<dyn std::error::Error + Send + Sync>> {
        let row: Option<PaymentRow> = sqlx::query_as(
            "SELECT id, booking_id, gateway, gateway_order_id, gateway_payment_id, amount_minor, \
             currency, status, created_at, updated_at FROM payments WHERE gateway_order_id = $1",
        )
        .bind(gateway_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PaymentRow::into_json))
    }

    async fn update_status(
        &self,
        gateway_order_id: &str,
        status: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            "UPDATE payments SET status = $1, updated_at = NOW() WHERE gateway_order_id = $2",
        )
        .bind(status)
        .bind(gateway_order_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
