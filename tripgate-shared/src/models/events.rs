#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct SearchLoggedEvent {
    pub search_type: String,
    pub search_params: serde_json::Value,
    pub results_count: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingStatusChangedEvent {
    pub partner_order_id: String,
    pub from_status: Option<String>,
    pub to_status: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct PaymentRecordedEvent {
    pub booking_id: uuid::Uuid,
    pub gateway: String,
    pub gateway_order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub timestamp: i64,
}
