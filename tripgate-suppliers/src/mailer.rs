use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct MailerConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub sender_name: String,
    pub sender_email: String,
}

/// Details rendered into the confirmation mail.
#[derive(Debug, Clone, Serialize)]
pub struct BookingEmail {
    pub booking_id: String,
    pub customer_name: String,
    pub hotel_name: String,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail provider not configured")]
    NotConfigured,

    #[error("Mail provider rejected the message: {0}")]
    Rejected(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Client for the transactional-email provider.
pub struct MailerClient {
    http: reqwest::Client,
    config: MailerConfig,
}

impl MailerClient {
    pub fn new(config: MailerConfig) -> Self {
        if config.api_key.is_none() {
            warn!("Mail API key not configured, confirmation emails will be skipped");
        }
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send a plain-text booking confirmation.
    pub async fn send_booking_confirmation(
        &self,
        to: &str,
        details: &BookingEmail,
    ) -> Result<(), MailError> {
        let api_key = self.config.api_key.as_deref().ok_or(MailError::NotConfigured)?;

        let subject = format!("Booking Confirmation - {}", details.booking_id);
        let body = confirmation_body(details);

        let response = self
            .http
            .post(&self.config.api_url)
            .header("accept", "application/json")
            .header("api-key", api_key)
            .json(&json!({
                "sender": {
                    "name": &self.config.sender_name,
                    "email": &self.config.sender_email,
                },
                "to": [{"email": to}],
                "subject": subject,
                "textContent": body,
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(booking_id = %details.booking_id, to, "confirmation email sent");
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(MailError::Rejected(format!("{}: {}", status, text)))
        }
    }
}

fn confirmation_body(details: &BookingEmail) -> String {
    format!(
        "Dear {name},\n\n\
         Your hotel booking is confirmed.\n\n\
         Booking reference: {id}\n\
         Hotel: {hotel}\n\
         Check-in: {checkin}\n\
         Check-out: {checkout}\n\
         Total amount: {currency} {amount:.2}\n\n\
         Please present this reference at the hotel reception.\n\n\
         Safe travels,\nThe TripGate team",
        name = details.customer_name,
        id = details.booking_id,
        hotel = details.hotel_name,
        checkin = details.checkin.as_deref().unwrap_or("-"),
        checkout = details.checkout.as_deref().unwrap_or("-"),
        currency = details.currency,
        amount = details.amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_body_contains_key_fields() {
        let body = confirmation_body(&BookingEmail {
            booking_id: "TG-20260201120000-ABCDEF01".to_string(),
            customer_name: "John Doe".to_string(),
            hotel_name: "Grand Palace Hotel".to_string(),
            checkin: Some("2026-02-01".to_string()),
            checkout: Some("2026-02-05".to_string()),
            amount: 5000.0,
            currency: "INR".to_string(),
        });

        assert!(body.contains("TG-20260201120000-ABCDEF01"));
        assert!(body.contains("Grand Palace Hotel"));
        assert!(body.contains("INR 5000.00"));
        assert!(body.contains("2026-02-05"));
    }

    #[test]
    fn test_unconfigured_mailer() {
        let mailer = MailerClient::new(MailerConfig {
            api_url: "https://api.mail.example/v3/smtp/email".to_string(),
            api_key: None,
            sender_name: "TripGate".to_string(),
            sender_email: "info@tripgate.example".to_string(),
        });
        assert!(!mailer.is_available());
    }
}
