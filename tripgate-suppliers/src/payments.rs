use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use tripgate_core::{PaymentGateway, PaymentOrder, PaymentStatus};

const RAZORPAY_API: &str = "https://api.razorpay.com/v1";

/// Razorpay REST integration (no SDK dependency).
pub struct RazorpayGateway {
    http: reqwest::Client,
    pub key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id,
            key_secret,
        }
    }

    fn map_status(raw: &str) -> PaymentStatus {
        match raw {
            "created" => PaymentStatus::Created,
            "attempted" => PaymentStatus::Attempted,
            "paid" => PaymentStatus::Paid,
            _ => PaymentStatus::Failed,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    async fn create_order(
        &self,
        booking_id: Option<Uuid>,
        amount_minor: i64,
        currency: &str,
        notes: &Value,
    ) -> Result<PaymentOrder, Box<dyn std::error::Error + Send + Sync>> {
        let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
        let resp: Value = self
            .http
            .post(format!("{}/orders", RAZORPAY_API))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": amount_minor,
                "currency": currency,
                "receipt": receipt,
                "notes": notes,
            }))
            .send()
            .await?
            .json()
            .await?;

        let order_id = resp["id"]
            .as_str()
            .ok_or_else(|| format!("Razorpay order creation failed: {resp}"))?;

        info!(order_id, amount_minor, currency, "razorpay order created");

        Ok(PaymentOrder {
            id: order_id.to_string(),
            booking_id,
            amount_minor: resp["amount"].as_i64().unwrap_or(amount_minor),
            currency: currency.to_string(),
            status: Self::map_status(resp["status"].as_str().unwrap_or("created")),
            key_id: Some(self.key_id.clone()),
            created_at: Utc::now(),
        })
    }

    async fn fetch_status(
        &self,
        order_id: &str,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>> {
        let resp: Value = self
            .http
            .get(format!("{}/orders/{}", RAZORPAY_API, order_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?
            .json()
            .await?;

        match resp["status"].as_str() {
            Some(status) => Ok(Self::map_status(status)),
            None => Err(format!("Razorpay status fetch failed: {resp}").into()),
        }
    }
}

/// PayPal Orders v2 integration: OAuth token per call, then the order API.
pub struct PaypalGateway {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

impl PaypalGateway {
    pub fn new(client_id: String, client_secret: String, mode: &str) -> Self {
        let base_url = if mode == "live" {
            "https://api-m.paypal.com".to_string()
        } else {
            "https://api-m.sandbox.paypal.com".to_string()
        };
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            base_url,
        }
    }

    async fn access_token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let resp: Value = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .json()
            .await?;

        resp["access_token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| format!("PayPal token request failed: {resp}").into())
    }

    fn map_status(raw: &str) -> PaymentStatus {
        match raw {
            "CREATED" | "SAVED" | "PAYER_ACTION_REQUIRED" => PaymentStatus::Created,
            "APPROVED" => PaymentStatus::Attempted,
            "COMPLETED" => PaymentStatus::Paid,
            _ => PaymentStatus::Failed,
        }
    }

    /// PayPal wants decimal major-unit strings ("52.80"), not minor units.
    fn format_amount(amount_minor: i64) -> String {
        format!("{}.{:02}", amount_minor / 100, amount_minor % 100)
    }
}

#[async_trait]
impl PaymentGateway for PaypalGateway {
    fn name(&self) -> &'static str {
        "paypal"
    }

    async fn create_order(
        &self,
        booking_id: Option<Uuid>,
        amount_minor: i64,
        currency: &str,
        notes: &Value,
    ) -> Result<PaymentOrder, Box<dyn std::error::Error + Send + Sync>> {
        let token = self.access_token().await?;

        let resp: Value = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(token)
            .json(&json!({
                "intent": "CAPTURE",
                "purchase_units": [{
                    "amount": {
                        "currency_code": currency,
                        "value": Self::format_amount(amount_minor),
                    },
                    "description": notes["hotel_name"].as_str().unwrap_or("Hotel booking"),
                }],
            }))
            .send()
            .await?
            .json()
            .await?;

        let order_id = resp["id"].as_str().ok_or_else(|| {
            error!("paypal order creation failed: {}", resp);
            format!("PayPal order creation failed: {resp}")
        })?;

        info!(order_id, amount_minor, currency, "paypal order created");

        Ok(PaymentOrder {
            id: order_id.to_string(),
            booking_id,
            amount_minor,
            currency: currency.to_string(),
            status: Self::map_status(resp["status"].as_str().unwrap_or("CREATED")),
            key_id: Some(self.client_id.clone()),
            created_at: Utc::now(),
        })
    }

    async fn fetch_status(
        &self,
        order_id: &str,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>> {
        let token = self.access_token().await?;
        let resp: Value = self
            .http
            .get(format!("{}/v2/checkout/orders/{}", self.base_url, order_id))
            .bearer_auth(token)
            .send()
            .await?
            .json()
            .await?;

        match resp["status"].as_str() {
            Some(status) => Ok(Self::map_status(status)),
            None => Err(format!("PayPal status fetch failed: {resp}").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_razorpay_status_mapping() {
        assert_eq!(RazorpayGateway::map_status("created"), PaymentStatus::Created);
        assert_eq!(RazorpayGateway::map_status("attempted"), PaymentStatus::Attempted);
        assert_eq!(RazorpayGateway::map_status("paid"), PaymentStatus::Paid);
        assert_eq!(RazorpayGateway::map_status("weird"), PaymentStatus::Failed);
    }

    #[test]
    fn test_paypal_status_mapping() {
        assert_eq!(PaypalGateway::map_status("CREATED"), PaymentStatus::Created);
        assert_eq!(PaypalGateway::map_status("APPROVED"), PaymentStatus::Attempted);
        assert_eq!(PaypalGateway::map_status("COMPLETED"), PaymentStatus::Paid);
        assert_eq!(PaypalGateway::map_status("VOIDED"), PaymentStatus::Failed);
    }

    #[test]
    fn test_paypal_amount_formatting() {
        assert_eq!(PaypalGateway::format_amount(5280), "52.80");
        assert_eq!(PaypalGateway::format_amount(100), "1.00");
        assert_eq!(PaypalGateway::format_amount(5), "0.05");
    }

    #[test]
    fn test_sandbox_vs_live_base_url() {
        let sandbox = PaypalGateway::new("id".into(), "secret".into(), "sandbox");
        assert!(sandbox.base_url.contains("sandbox"));
        let live = PaypalGateway::new("id".into(), "secret".into(), "live");
        assert!(!live.base_url.contains("sandbox"));
    }
}
