use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tripgate_shared::pii::Masked;

/// Booking status in the confirmation lifecycle.
///
/// `created` is the row as written after the supplier accepts the booking
/// form; `processing` means the finish call went out and the supplier is
/// confirming asynchronously; `pending` is the parking state when the
/// supplier cannot give a final answer inside the polling budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Created,
    Processing,
    Confirmed,
    Cancelled,
    Failed,
    Pending,
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Created => "created",
            BookingStatus::Processing => "processing",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Failed => "failed",
            BookingStatus::Pending => "pending",
            BookingStatus::Expired => "expired",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created" => Some(BookingStatus::Created),
            "processing" => Some(BookingStatus::Processing),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "failed" => Some(BookingStatus::Failed),
            "pending" => Some(BookingStatus::Pending),
            "expired" => Some(BookingStatus::Expired),
            _ => None,
        }
    }

    /// Terminal states never transition again (a confirmed stay can still be
    /// cancelled).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Failed | BookingStatus::Expired
        )
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match self {
            Created => matches!(next, Processing | Cancelled | Failed | Expired),
            Processing => matches!(next, Confirmed | Failed | Pending | Cancelled | Expired),
            Pending => matches!(next, Confirmed | Failed | Cancelled),
            Confirmed => matches!(next, Cancelled),
            Cancelled | Failed | Expired => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub first_name: String,
    pub last_name: String,
}

/// A stored hotel booking, keyed for the supplier by partner_order_id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub partner_order_id: String,
    pub user_id: Option<String>,
    pub hotel_id: String,
    pub hotel_name: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub rooms: i32,
    pub guests: Vec<Guest>,
    pub customer_email: Option<Masked<String>>,
    pub total_amount: f64,
    pub currency: String,
    pub status: BookingStatus,
    /// Raw supplier response for the most recent lifecycle call.
    pub booking_response: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn update_status(&mut self, next: BookingStatus) -> Result<(), BookingError> {
        if !self.status.can_transition_to(next) {
            return Err(BookingError::InvalidTransition {
                from: self.status.as_str(),
                to: next.as_str(),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_with(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            partner_order_id: "TG-20260201120000-ABCDEF01".to_string(),
            user_id: None,
            hotel_id: "test_hotel".to_string(),
            hotel_name: "Test Hotel".to_string(),
            check_in: None,
            check_out: None,
            rooms: 1,
            guests: vec![],
            customer_email: None,
            total_amount: 5000.0,
            currency: "INR".to_string(),
            status,
            booking_response: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut booking = booking_with(BookingStatus::Created);
        booking.update_status(BookingStatus::Processing).unwrap();
        booking.update_status(BookingStatus::Confirmed).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        // confirmed stays can still be cancelled
        booking.update_status(BookingStatus::Cancelled).unwrap();
        assert!(booking.status.is_terminal());
    }

    #[test]
    fn test_pending_can_still_confirm() {
        let mut booking = booking_with(BookingStatus::Processing);
        booking.update_status(BookingStatus::Pending).unwrap();
        booking.update_status(BookingStatus::Confirmed).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut booking = booking_with(BookingStatus::Created);
        // cannot confirm a booking that never started processing
        assert!(booking.update_status(BookingStatus::Confirmed).is_err());

        let mut failed = booking_with(BookingStatus::Failed);
        assert!(failed.update_status(BookingStatus::Processing).is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            BookingStatus::Created,
            BookingStatus::Processing,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Failed,
            BookingStatus::Pending,
            BookingStatus::Expired,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("nonsense"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&BookingStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
