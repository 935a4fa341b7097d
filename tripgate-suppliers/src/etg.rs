use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use tripgate_core::search::RoomOccupancy;
use tripgate_core::{HotelSupplier, SupplierResponse};

/// Search responses are capped server-side; ask for the maximum.
const SEARCH_LIMIT: i64 = 500;
/// Hotel-id searches accept at most 300 ids per request.
const MAX_HOTEL_IDS: usize = 300;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct EtgConfig {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
    /// Egress proxy for static-IP whitelisting with the supplier.
    pub proxy_url: Option<String>,
    /// Contact address the supplier writes into every booking form.
    pub corporate_email: String,
}

/// Client for the hotel-inventory B2B v3 JSON API.
pub struct EtgClient {
    http: reqwest::Client,
    config: EtgConfig,
}

impl EtgClient {
    pub fn new(config: EtgConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
            info!("Supplier egress proxy configured");
        }

        if config.key_id.is_empty() || config.key_secret.is_empty() {
            warn!("Supplier API credentials not configured, hotel features will be limited");
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.config.key_id, self.config.key_secret);
        format!("Basic {}", BASE64.encode(credentials))
    }

    async fn post(&self, endpoint: &str, body: Value) -> SupplierResponse {
        self.request(endpoint, Some(body)).await
    }

    async fn get(&self, endpoint: &str) -> SupplierResponse {
        self.request(endpoint, None).await
    }

    async fn request(&self, endpoint: &str, body: Option<Value>) -> SupplierResponse {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let started = Instant::now();

        debug!(endpoint, body = ?body, "supplier request");

        let request = match &body {
            Some(payload) => self.http.post(&url).json(payload),
            None => self.http.get(&url),
        };

        let result = request
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await;

        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let payload: Value = response.json().await.unwrap_or(Value::Null);
                info!(endpoint, status, duration_ms, "supplier response");

                if (200..300).contains(&status) {
                    SupplierResponse::ok(payload, status)
                } else {
                    let error = payload["error"]
                        .as_str()
                        .map(str::to_string)
                        .or_else(|| {
                            payload["debug"]["validation_error"].as_str().map(str::to_string)
                        })
                        .unwrap_or_else(|| format!("HTTP {} for {}", status, endpoint));
                    SupplierResponse {
                        success: false,
                        data: payload,
                        status_code: status,
                        error: Some(error),
                    }
                }
            }
            Err(err) if err.is_timeout() => {
                warn!(endpoint, duration_ms, "supplier request timed out");
                SupplierResponse::err("Request timeout", 408)
            }
            Err(err) => {
                warn!(endpoint, duration_ms, error = %err, "supplier request failed");
                SupplierResponse::err(err.to_string(), 500)
            }
        }
    }
}

#[async_trait]
impl HotelSupplier for EtgClient {
    async fn multicomplete(&self, query: &str, language: &str) -> SupplierResponse {
        self.post(
            "/search/multicomplete/",
            json!({"query": query, "language": language}),
        )
        .await
    }

    async fn search_by_region(
        &self,
        region_id: i64,
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
        residency: &str,
    ) -> SupplierResponse {
        self.post(
            "/search/serp/region/",
            json!({
                "checkin": checkin,
                "checkout": checkout,
                "residency": residency,
                "language": "en",
                "guests": guests,
                "region_id": region_id,
                "currency": currency,
                // API versions disagree on the paging key
                "limit": SEARCH_LIMIT,
                "page_size": SEARCH_LIMIT,
                "rows": SEARCH_LIMIT,
            }),
        )
        .await
    }

    async fn search_by_geo(
        &self,
        latitude: f64,
        longitude: f64,
        radius: i64,
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
    ) -> SupplierResponse {
        self.post(
            "/search/serp/geo/",
            json!({
                "checkin": checkin,
                "checkout": checkout,
                "residency": "gb",
                "language": "en",
                "guests": guests,
                "latitude": latitude,
                "longitude": longitude,
                "radius": radius,
                "currency": currency,
                "limit": SEARCH_LIMIT,
                "page_size": SEARCH_LIMIT,
                "rows": SEARCH_LIMIT,
            }),
        )
        .await
    }

    async fn search_by_hotels(
        &self,
        hotel_ids: &[String],
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
    ) -> SupplierResponse {
        let ids: Vec<&String> = hotel_ids.iter().take(MAX_HOTEL_IDS).collect();
        self.post(
            "/search/serp/hotels/",
            json!({
                "checkin": checkin,
                "checkout": checkout,
                "residency": "gb",
                "language": "en",
                "guests": guests,
                "ids": ids,
                "currency": currency,
            }),
        )
        .await
    }

    async fn hotel_page(
        &self,
        hotel_id: &str,
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
    ) -> SupplierResponse {
        self.post(
            "/search/hp/",
            json!({
                "id": hotel_id,
                "checkin": checkin,
                "checkout": checkout,
                "residency": "in",
                "language": "en",
                "guests": guests,
                "currency": currency,
            }),
        )
        .await
    }

    async fn hotel_static(&self, hotel_id: &str) -> SupplierResponse {
        self.get(&format!("/hotel/static/?id={}&language=en", hotel_id))
            .await
    }

    async fn hotels_info(&self, hotel_ids: &[String]) -> SupplierResponse {
        self.post(
            "/hotel/info/",
            json!({"ids": hotel_ids, "language": "en"}),
        )
        .await
    }

    async fn prebook(&self, book_hash: &str, price_increase_percent: i64) -> SupplierResponse {
        self.post(
            "/hotel/prebook/",
            json!({
                "hash": book_hash,
                "price_increase_percent": price_increase_percent,
            }),
        )
        .await
    }

    async fn booking_form(
        &self,
        book_hash: &str,
        partner_order_id: &str,
        guests: &Value,
        user_ip: &str,
        user_comment: Option<&str>,
    ) -> SupplierResponse {
        let mut body = json!({
            "hash": book_hash,
            "partner_order_id": partner_order_id,
            "payment_type": {"type": "now"},
            "user_ip": user_ip,
            "rooms": [{"guests": guests}],
            "user": {
                "email": &self.config.corporate_email,
                // Placeholder contact block required by the booking form
                "phone": "0000000000",
                "first_name": "TripGate",
                "last_name": "Bookings"
            },
        });
        if let Some(comment) = user_comment {
            body["user_comment"] = json!(comment);
        }
        self.post("/hotel/order/booking/form/", body).await
    }

    async fn booking_finish(&self, partner_order_id: &str) -> SupplierResponse {
        self.post(
            "/hotel/order/booking/finish/",
            json!({"partner_order_id": partner_order_id}),
        )
        .await
    }

    async fn finish_status(&self, partner_order_id: &str) -> SupplierResponse {
        self.post(
            "/hotel/order/booking/finish/status/",
            json!({"partner_order_id": partner_order_id}),
        )
        .await
    }

    async fn order_info(&self, partner_order_id: &str) -> SupplierResponse {
        self.post(
            "/hotel/order/info/",
            json!({"partner_order_id": partner_order_id}),
        )
        .await
    }

    async fn order_cancel(&self, partner_order_id: &str) -> SupplierResponse {
        self.post(
            "/hotel/order/cancel/",
            json!({"partner_order_id": partner_order_id}),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> EtgClient {
        EtgClient::new(EtgConfig {
            base_url: "https://api.example.net/api/b2b/v3".to_string(),
            key_id: "1234".to_string(),
            key_secret: "secret".to_string(),
            proxy_url: None,
            corporate_email: "bookings@tripgate.example".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_basic_auth_header() {
        // base64("1234:secret")
        assert_eq!(client().auth_header(), "Basic MTIzNDpzZWNyZXQ=");
    }

    #[test]
    fn test_hotel_id_cap() {
        let ids: Vec<String> = (0..400).map(|i| format!("hotel_{}", i)).collect();
        assert_eq!(ids.iter().take(MAX_HOTEL_IDS).count(), 300);
    }
}
