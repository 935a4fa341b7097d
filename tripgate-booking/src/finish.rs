use tripgate_core::SupplierResponse;

use crate::models::BookingStatus;

/// Outcome of the supplier's `/booking/finish/` call, per its certification
/// table for that endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum FinishOutcome {
    /// Finish accepted: booking is processing, client should poll.
    Accepted,
    /// 5xx from the supplier: retry the call once before giving up.
    ServerError,
    /// `timeout` / `unknown`: the supplier may still be processing; treat the
    /// booking as processing and poll.
    PollAnyway,
    /// Booking form expired: the session is gone, the user must search again.
    SessionExpired,
    /// The rate vanished between prebook and finish.
    RateNotFound,
    /// 3-D Secure / additional payment verification required.
    VerificationRequired,
    /// Anything else: surface the supplier error.
    Failed(String),
}

impl FinishOutcome {
    /// Booking status to persist for this outcome, when one applies.
    pub fn booking_status(&self) -> Option<BookingStatus> {
        match self {
            FinishOutcome::Accepted | FinishOutcome::PollAnyway => Some(BookingStatus::Processing),
            FinishOutcome::SessionExpired => Some(BookingStatus::Expired),
            FinishOutcome::RateNotFound => Some(BookingStatus::Failed),
            FinishOutcome::ServerError
            | FinishOutcome::VerificationRequired
            | FinishOutcome::Failed(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            FinishOutcome::SessionExpired => Some("SESSION_EXPIRED"),
            FinishOutcome::RateNotFound => Some("RATE_NOT_FOUND"),
            FinishOutcome::VerificationRequired => Some("VERIFICATION_REQUIRED"),
            FinishOutcome::Failed(_) => Some("FINISH_FAILED"),
            _ => None,
        }
    }

    pub fn user_message(&self) -> Option<String> {
        match self {
            FinishOutcome::SessionExpired => Some(
                "Your booking session has expired. Please search again and select a new room."
                    .to_string(),
            ),
            FinishOutcome::RateNotFound => Some(
                "This room is no longer available. Please go back and select a different room."
                    .to_string(),
            ),
            FinishOutcome::VerificationRequired => {
                Some("Additional payment verification is required.".to_string())
            }
            FinishOutcome::Failed(err) => {
                Some(format!("Booking finalization failed: {}", err))
            }
            _ => None,
        }
    }
}

/// Classify a `/booking/finish/` response.
pub fn classify_finish(response: &SupplierResponse) -> FinishOutcome {
    if response.success {
        return FinishOutcome::Accepted;
    }

    if (500..600).contains(&response.status_code) {
        return FinishOutcome::ServerError;
    }

    let error = response
        .error
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    if error.contains("timeout") || error.contains("unknown") {
        FinishOutcome::PollAnyway
    } else if error.contains("booking_form_expired") {
        FinishOutcome::SessionExpired
    } else if error.contains("rate_not_found") {
        FinishOutcome::RateNotFound
    } else if error.contains("return_path_required") {
        FinishOutcome::VerificationRequired
    } else {
        FinishOutcome::Failed(response.error.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_means_processing() {
        let outcome = classify_finish(&SupplierResponse::ok(json!({"status": "ok"}), 200));
        assert_eq!(outcome, FinishOutcome::Accepted);
        assert_eq!(outcome.booking_status(), Some(BookingStatus::Processing));
    }

    #[test]
    fn test_server_error_is_retryable() {
        let outcome = classify_finish(&SupplierResponse::err("502 Bad Gateway", 502));
        assert_eq!(outcome, FinishOutcome::ServerError);
        assert_eq!(outcome.booking_status(), None);
    }

    #[test]
    fn test_timeout_and_unknown_poll_anyway() {
        for error in ["timeout", "error: unknown"] {
            let outcome = classify_finish(&SupplierResponse::err(error, 400));
            assert_eq!(outcome, FinishOutcome::PollAnyway);
            assert_eq!(outcome.booking_status(), Some(BookingStatus::Processing));
        }
    }

    #[test]
    fn test_expired_form_maps_to_expired() {
        let outcome = classify_finish(&SupplierResponse::err("booking_form_expired", 400));
        assert_eq!(outcome, FinishOutcome::SessionExpired);
        assert_eq!(outcome.booking_status(), Some(BookingStatus::Expired));
        assert_eq!(outcome.error_code(), Some("SESSION_EXPIRED"));
    }

    #[test]
    fn test_rate_not_found_fails_booking() {
        let outcome = classify_finish(&SupplierResponse::err("rate_not_found", 400));
        assert_eq!(outcome, FinishOutcome::RateNotFound);
        assert_eq!(outcome.booking_status(), Some(BookingStatus::Failed));
    }

    #[test]
    fn test_verification_required() {
        let outcome = classify_finish(&SupplierResponse::err("return_path_required", 400));
        assert_eq!(outcome, FinishOutcome::VerificationRequired);
        assert_eq!(outcome.error_code(), Some("VERIFICATION_REQUIRED"));
    }

    #[test]
    fn test_generic_failure_carries_error() {
        let outcome = classify_finish(&SupplierResponse::err("double_booking", 400));
        assert_eq!(outcome, FinishOutcome::Failed("double_booking".to_string()));
        assert!(outcome.user_message().unwrap().contains("double_booking"));
    }
}
