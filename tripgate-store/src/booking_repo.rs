use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use tripgate_core::BookingRepository;
use tripgate_shared::models::events::BookingStatusChangedEvent;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    partner_order_id: String,
    user_id: Option<String>,
    hotel_id: Option<String>,
    hotel_name: Option<String>,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    rooms: Option<i32>,
    guests: Option<Value>,
    customer_email: Option<String>,
    total_amount: Option<f64>,
    currency: Option<String>,
    status: String,
    booking_response: Option<Value>,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl BookingRow {
    fn into_json(self) -> Value {
        json!({
            "id": self.id,
            "partner_order_id": self.partner_order_id,
            "user_id": self.user_id,
            "hotel_id": self.hotel_id,
            "hotel_name": self.hotel_name,
            "check_in": self.check_in.map(|d| d.to_string()),
            "check_out": self.check_out.map(|d| d.to_string()),
            "rooms": self.rooms,
            "guests": self.guests,
            "customer_email": self.customer_email,
            "total_amount": self.total_amount,
            "currency": self.currency,
            "status": self.status,
            "booking_response": self.booking_response,
            "created_at": self.created_at.map(|t| t.to_rfc3339()),
            "updated_at": self.updated_at.map(|t| t.to_rfc3339()),
        })
    }
}

const SELECT_COLUMNS: &str = "id, partner_order_id, user_id, hotel_id, hotel_name, check_in, \
     check_out, rooms, guests, customer_email, total_amount, currency, status, booking_response, \
     created_at, updated_at";

fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(
        &self,
        booking: &Value,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let id = Uuid::new_v4();
        let partner_order_id = booking["partner_order_id"]
            .as_str()
            .ok_or("Missing partner_order_id")?;
        let status = booking["status"].as_str().unwrap_or("created");

        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, partner_order_id, user_id, hotel_id, hotel_name, check_in, check_out,
                 rooms, guests, customer_email, total_amount, currency, status, booking_response)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(id)
        .bind(partner_order_id)
        .bind(booking["user_id"].as_str())
        .bind(booking["hotel_id"].as_str().unwrap_or(""))
        .bind(booking["hotel_name"].as_str().unwrap_or(""))
        .bind(parse_date(&booking["check_in"]))
        .bind(parse_date(&booking["check_out"]))
        .bind(booking["rooms"].as_i64().unwrap_or(1) as i32)
        .bind(booking["guests"].clone())
        .bind(booking["customer_email"].as_str())
        .bind(booking["total_amount"].as_f64().unwrap_or(0.0))
        .bind(booking["currency"].as_str().unwrap_or("INR"))
        .bind(status)
        .bind(booking["booking_response"].clone())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_by_partner_order_id(
        &self,
        partner_order_id: &str,
    ) -> Result<Option<Value>, Box<dyn std::error::Error + Send + Sync>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE partner_order_id = $1",
            SELECT_COLUMNS
        ))
        .bind(partner_order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BookingRow::into_json))
    }

    async fn update_by_partner_order_id(
        &self,
        partner_order_id: &str,
        update: &Value,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let status = update["status"].as_str();
        let booking_response = match &update["booking_response"] {
            Value::Null => None,
            other => Some(other.clone()),
        };
        let customer_email = update["customer_email"].as_str();

        if let Some(status) = status {
            let event = BookingStatusChangedEvent {
                partner_order_id: partner_order_id.to_string(),
                from_status: None,
                to_status: status.to_string(),
                timestamp: chrono::Utc::now().timestamp(),
            };
            debug!(?event, "booking status update");
        }

        sqlx::query(
            r#"
            UPDATE bookings
            SET status = COALESCE($2, status),
                booking_response = COALESCE($3, booking_response),
                customer_email = COALESCE($4, customer_email),
                updated_at = NOW()
            WHERE partner_order_id = $1
            "#,
        )
        .bind(partner_order_id)
        .bind(status)
        .bind(booking_response)
        .bind(customer_email)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Value>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookingRow::into_json).collect())
    }
}
