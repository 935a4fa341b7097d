use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use tripgate_core::HotelSupplier;

use crate::models::BookingStatus;

/// Polling cadence recommended by the supplier: 2.5 s between probes, 180 s
/// total budget. The countdown starts after the finish call is accepted.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2500),
            max_attempts: 72,
        }
    }
}

/// Classification of one `/finish/status/` probe, per the supplier's
/// certification table for that endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Confirmed,
    Processing,
    /// One of the supplier's enumerated hard failures.
    KnownFailure {
        code: &'static str,
        message: &'static str,
    },
    /// `timeout` / `unknown`: the booking may still confirm on the supplier
    /// side; park it as pending and follow up by email.
    SupplierPending,
    /// A final status we have no mapping for; persisted verbatim.
    Unrecognized(String),
}

/// Supplier error code → user-facing message.
const FAILURE_MESSAGES: [(&str, &str); 8] = [
    (
        "block",
        "Payment was blocked by your bank. Please contact your bank or try a different card.",
    ),
    (
        "charge",
        "Payment charge failed. Please try again or use a different payment method.",
    ),
    ("3ds", "3D Secure verification failed. Please try again."),
    (
        "soldout",
        "This room was sold out while processing your booking. Please select a different room.",
    ),
    (
        "provider",
        "The hotel provider encountered an error. Please try again later.",
    ),
    (
        "book_limit",
        "Booking limit reached for this property. Please try a different hotel.",
    ),
    (
        "not_allowed",
        "This booking is not permitted at this time. Please contact support.",
    ),
    (
        "booking_finish_did_not_succeed",
        "Booking could not be completed. Please try again or select a different room.",
    ),
];

/// Classify one status probe. `error` takes precedence over `status` as the
/// lookup key when present.
pub fn classify_poll(status: &str, error: &str) -> PollOutcome {
    if status == "processing" {
        return PollOutcome::Processing;
    }
    if status == "ok" {
        return PollOutcome::Confirmed;
    }

    let key = if error.is_empty() { status } else { error };

    for (code, message) in FAILURE_MESSAGES {
        if key == code {
            return PollOutcome::KnownFailure { code, message };
        }
    }

    if key == "timeout" || key == "unknown" {
        return PollOutcome::SupplierPending;
    }

    PollOutcome::Unrecognized(status.to_string())
}

/// Final result of a full polling run.
#[derive(Debug, Clone)]
pub enum PollResult {
    Confirmed {
        data: Value,
    },
    Failed {
        code: String,
        message: String,
        data: Value,
    },
    /// The supplier reported timeout/unknown: booking parked as pending.
    SupplierPending {
        data: Value,
    },
    /// A final status outside the certification table.
    Unrecognized {
        status: String,
        data: Value,
    },
    /// The 180 s budget ran out with the supplier still processing.
    BudgetExhausted,
}

impl PollResult {
    pub fn booking_status(&self) -> BookingStatus {
        match self {
            PollResult::Confirmed { .. } => BookingStatus::Confirmed,
            PollResult::Failed { .. } => BookingStatus::Failed,
            PollResult::SupplierPending { .. } | PollResult::BudgetExhausted => {
                BookingStatus::Pending
            }
            PollResult::Unrecognized { status, .. } => {
                BookingStatus::parse(status).unwrap_or(BookingStatus::Pending)
            }
        }
    }
}

/// Poll `/finish/status/` until the booking reaches a final state or the
/// budget runs out. Sleeps are async; a long poll holds no worker thread.
pub async fn poll_booking(
    supplier: &dyn HotelSupplier,
    partner_order_id: &str,
    schedule: &PollSchedule,
) -> PollResult {
    let mut attempt = 0;

    while attempt < schedule.max_attempts {
        let response = supplier.finish_status(partner_order_id).await;

        if response.success {
            let data = response.inner_data().clone();
            let status = data["status"].as_str().unwrap_or_default();
            let error = data["error"].as_str().unwrap_or_default();

            match classify_poll(status, error) {
                PollOutcome::Processing => {}
                PollOutcome::Confirmed => return PollResult::Confirmed { data },
                PollOutcome::KnownFailure { code, message } => {
                    return PollResult::Failed {
                        code: code.to_uppercase(),
                        message: message.to_string(),
                        data,
                    }
                }
                PollOutcome::SupplierPending => return PollResult::SupplierPending { data },
                PollOutcome::Unrecognized(status) => {
                    return PollResult::Unrecognized { status, data }
                }
            }
        } else if response.status_code >= 500 {
            // The supplier may still be processing; keep polling
            warn!(
                partner_order_id,
                attempt, "5xx during booking status poll, continuing"
            );
        }

        attempt += 1;
        tokio::time::sleep(schedule.interval).await;
    }

    PollResult::BudgetExhausted
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use tripgate_core::search::RoomOccupancy;
    use tripgate_core::SupplierResponse;

    #[test]
    fn test_classify_success_and_processing() {
        assert_eq!(classify_poll("ok", ""), PollOutcome::Confirmed);
        assert_eq!(classify_poll("processing", ""), PollOutcome::Processing);
    }

    #[test]
    fn test_classify_known_failures() {
        for code in [
            "block",
            "charge",
            "3ds",
            "soldout",
            "provider",
            "book_limit",
            "not_allowed",
            "booking_finish_did_not_succeed",
        ] {
            match classify_poll("error", code) {
                PollOutcome::KnownFailure { code: got, .. } => assert_eq!(got, code),
                other => panic!("expected failure for {}, got {:?}", code, other),
            }
        }
    }

    #[test]
    fn test_classify_error_key_falls_back_to_status() {
        // Some responses carry the code in status with no error field
        assert!(matches!(
            classify_poll("soldout", ""),
            PollOutcome::KnownFailure { code: "soldout", .. }
        ));
    }

    #[test]
    fn test_classify_timeout_and_unknown_park_as_pending() {
        assert_eq!(classify_poll("error", "timeout"), PollOutcome::SupplierPending);
        assert_eq!(classify_poll("unknown", ""), PollOutcome::SupplierPending);
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(
            classify_poll("weird_status", ""),
            PollOutcome::Unrecognized("weird_status".to_string())
        );
    }

    /// Scripted supplier: returns each queued finish_status response in order.
    struct ScriptedSupplier {
        responses: Mutex<Vec<SupplierResponse>>,
    }

    impl ScriptedSupplier {
        fn new(mut responses: Vec<SupplierResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl HotelSupplier for ScriptedSupplier {
        async fn multicomplete(&self, _: &str, _: &str) -> SupplierResponse {
            unimplemented!()
        }
        async fn search_by_region(
            &self,
            _: i64,
            _: &str,
            _: &str,
            _: &[RoomOccupancy],
            _: &str,
            _: &str,
        ) -> SupplierResponse {
            unimplemented!()
        }
        async fn search_by_geo(
            &self,
            _: f64,
            _: f64,
            _: i64,
            _: &str,
            _: &str,
            _: &[RoomOccupancy],
            _: &str,
        ) -> SupplierResponse {
            unimplemented!()
        }
        async fn search_by_hotels(
            &self,
            _: &[String],
            _: &str,
            _: &str,
            _: &[RoomOccupancy],
            _: &str,
        ) -> SupplierResponse {
            unimplemented!()
        }
        async fn hotel_page(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: &[RoomOccupancy],
            _: &str,
        ) -> SupplierResponse {
            unimplemented!()
        }
        async fn hotel_static(&self, _: &str) -> SupplierResponse {
            unimplemented!()
        }
        async fn hotels_info(&self, _: &[String]) -> SupplierResponse {
            unimplemented!()
        }
        async fn prebook(&self, _: &str, _: i64) -> SupplierResponse {
            unimplemented!()
        }
        async fn booking_form(
            &self,
            _: &str,
            _: &str,
            _: &Value,
            _: &str,
            _: Option<&str>,
        ) -> SupplierResponse {
            unimplemented!()
        }
        async fn booking_finish(&self, _: &str) -> SupplierResponse {
            unimplemented!()
        }
        async fn finish_status(&self, _: &str) -> SupplierResponse {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| SupplierResponse::err("script exhausted", 500))
        }
        async fn order_info(&self, _: &str) -> SupplierResponse {
            unimplemented!()
        }
        async fn order_cancel(&self, _: &str) -> SupplierResponse {
            unimplemented!()
        }
    }

    fn fast_schedule(max_attempts: u32) -> PollSchedule {
        PollSchedule {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_poll_confirms_after_processing() {
        let supplier = ScriptedSupplier::new(vec![
            SupplierResponse::ok(json!({"data": {"status": "processing"}}), 200),
            SupplierResponse::ok(json!({"data": {"status": "processing"}}), 200),
            SupplierResponse::ok(
                json!({"data": {"status": "ok", "order_id": 991}}),
                200,
            ),
        ]);

        let result = poll_booking(&supplier, "TG-1", &fast_schedule(10)).await;
        match result {
            PollResult::Confirmed { data } => assert_eq!(data["order_id"], 991),
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_poll_maps_soldout_to_failure() {
        let supplier = ScriptedSupplier::new(vec![SupplierResponse::ok(
            json!({"data": {"status": "error", "error": "soldout"}}),
            200,
        )]);

        let result = poll_booking(&supplier, "TG-1", &fast_schedule(10)).await;
        match result {
            PollResult::Failed { code, message, .. } => {
                assert_eq!(code, "SOLDOUT");
                assert!(message.contains("sold out"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(
            PollResult::BudgetExhausted.booking_status(),
            BookingStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_poll_survives_transient_5xx() {
        let supplier = ScriptedSupplier::new(vec![
            SupplierResponse::err("bad gateway", 502),
            SupplierResponse::ok(json!({"data": {"status": "ok"}}), 200),
        ]);

        let result = poll_booking(&supplier, "TG-1", &fast_schedule(10)).await;
        assert!(matches!(result, PollResult::Confirmed { .. }));
    }

    #[tokio::test]
    async fn test_poll_budget_exhaustion() {
        let supplier = ScriptedSupplier::new(
            (0..5)
                .map(|_| SupplierResponse::ok(json!({"data": {"status": "processing"}}), 200))
                .collect(),
        );

        let result = poll_booking(&supplier, "TG-1", &fast_schedule(3)).await;
        assert!(matches!(result, PollResult::BudgetExhausted));
    }
}
