use async_trait::async_trait;
use serde_json::Value;

use crate::search::RoomOccupancy;

/// Uniform wrapper around every inventory-supplier call.
///
/// Transport failures are folded into the wrapper instead of bubbling up as
/// errors so that route code can branch on `success`/`status_code` the same
/// way it branches on supplier-level error payloads.
#[derive(Debug, Clone)]
pub struct SupplierResponse {
    pub success: bool,
    pub data: Value,
    pub status_code: u16,
    pub error: Option<String>,
}

impl SupplierResponse {
    pub fn ok(data: Value, status_code: u16) -> Self {
        Self {
            success: true,
            data,
            status_code,
            error: None,
        }
    }

    pub fn err(error: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            data: Value::Null,
            status_code,
            error: Some(error.into()),
        }
    }

    /// Supplier payloads wrap the useful body one level down ("data.data").
    /// Returns the inner object when present, the outer one otherwise.
    pub fn inner_data(&self) -> &Value {
        match self.data.get("data") {
            Some(inner) if !inner.is_null() => inner,
            _ => &self.data,
        }
    }
}

/// The hotel-inventory B2B API surface this service depends on.
///
/// The api crate talks to the supplier exclusively through this trait so the
/// booking flow can be exercised against a scripted mock.
#[async_trait]
pub trait HotelSupplier: Send + Sync {
    async fn multicomplete(&self, query: &str, language: &str) -> SupplierResponse;

    async fn search_by_region(
        &self,
        region_id: i64,
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
        residency: &str,
    ) -> SupplierResponse;

    async fn search_by_geo(
        &self,
        latitude: f64,
        longitude: f64,
        radius: i64,
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
    ) -> SupplierResponse;

    async fn search_by_hotels(
        &self,
        hotel_ids: &[String],
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
    ) -> SupplierResponse;

    /// Hotel page with bookable rates.
    async fn hotel_page(
        &self,
        hotel_id: &str,
        checkin: &str,
        checkout: &str,
        guests: &[RoomOccupancy],
        currency: &str,
    ) -> SupplierResponse;

    /// Static content for a single hotel (policies, room groups).
    async fn hotel_static(&self, hotel_id: &str) -> SupplierResponse;

    /// Batch static content, used to enrich search results with names/images.
    async fn hotels_info(&self, hotel_ids: &[String]) -> SupplierResponse;

    async fn prebook(&self, book_hash: &str, price_increase_percent: i64) -> SupplierResponse;

    async fn booking_form(
        &self,
        book_hash: &str,
        partner_order_id: &str,
        guests: &Value,
        user_ip: &str,
        user_comment: Option<&str>,
    ) -> SupplierResponse;

    async fn booking_finish(&self, partner_order_id: &str) -> SupplierResponse;

    async fn finish_status(&self, partner_order_id: &str) -> SupplierResponse;

    async fn order_info(&self, partner_order_id: &str) -> SupplierResponse;

    async fn order_cancel(&self, partner_order_id: &str) -> SupplierResponse;
}
