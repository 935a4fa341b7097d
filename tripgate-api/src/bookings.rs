use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use tripgate_booking::{
    classify_finish, generate_partner_order_id, poll_booking, validate_booking_cutoff,
    BookingStatus, CutoffCheck, FinishOutcome, PollResult, PollSchedule,
};
use tripgate_suppliers::BookingEmail;

use crate::error::AppError;
use crate::hotels::envelope;
use crate::middleware::auth::customer_auth_middleware;
use crate::state::AppState;

/// The supplier's order-info endpoint can lag confirmation by up to a minute;
/// inside that window the cached record is authoritative.
const ORDER_INFO_MIN_GAP_SECONDS: i64 = 60;

pub fn routes(state: AppState) -> Router<AppState> {
    let authed = Router::new()
        .route("/user/{user_id}/bookings", get(user_bookings))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            customer_auth_middleware,
        ));

    Router::new()
        .route("/prebook", post(prebook))
        .route("/book", post(create_booking))
        .route("/book/finish", post(finish_booking))
        .route("/book/status", post(booking_status))
        .route("/book/poll", post(poll_booking_status))
        .route("/booking/cancel", post(cancel_booking))
        .route("/booking/resend-email", post(resend_email))
        .route("/booking/send-confirmation", post(send_confirmation))
        .route("/booking/{partner_order_id}", get(get_booking))
        .merge(authed)
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PrebookRequest {
    pub book_hash: String,
    pub price_increase_percent: Option<i64>,
    pub checkin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub book_hash: String,
    pub guests: Vec<Value>,
    pub user_id: Option<String>,
    pub hotel_id: Option<String>,
    pub hotel_name: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub total_amount: Option<f64>,
    pub currency: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartnerOrderRequest {
    pub partner_order_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ResendEmailRequest {
    pub partner_order_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendConfirmationRequest {
    pub partner_order_id: String,
    pub email: String,
    pub hotel_name: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub guests: Option<String>,
    pub total_amount: Option<f64>,
}

// ============================================================================
// Helpers
// ============================================================================

fn cutoff_rejection(checkin: Option<&str>) -> Option<Response> {
    let checkin = checkin?;
    match validate_booking_cutoff(checkin, Utc::now()) {
        CutoffCheck::CutoffReached { hours_remaining } => Some(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Booking cut-off reached. Bookings must be made at least 6 hours \
                              before check-in time (2:00 PM). Please select a later check-in date.",
                    "error_code": "BOOKING_CUTOFF",
                    "hours_remaining": hours_remaining,
                })),
            )
                .into_response(),
        ),
        _ => None,
    }
}

fn client_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    headers
        .get("x-real-ip")
        .or_else(|| headers.get("x-forwarded-for"))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string())
}

async fn persist_status(
    state: &AppState,
    partner_order_id: &str,
    status: BookingStatus,
    booking_response: Option<&Value>,
) {
    let mut update = json!({"status": status.as_str()});
    if let Some(response) = booking_response {
        update["booking_response"] = response.clone();
    }
    if let Err(err) = state
        .bookings
        .update_by_partner_order_id(partner_order_id, &update)
        .await
    {
        error!(partner_order_id, "failed to persist booking status: {}", err);
    }
}

// ============================================================================
// Prebook / Book
// ============================================================================

/// POST /api/hotels/prebook
/// Availability and final-price check, after the booking cut-off gate.
async fn prebook(
    State(state): State<AppState>,
    Json(req): Json<PrebookRequest>,
) -> Result<Response, AppError> {
    if let Some(rejection) = cutoff_rejection(req.checkin.as_deref()) {
        return Ok(rejection);
    }

    let resp = state
        .supplier
        .prebook(&req.book_hash, req.price_increase_percent.unwrap_or(5))
        .await;

    Ok(Json(envelope(&resp)).into_response())
}

/// POST /api/hotels/book
/// Create the supplier booking form and persist the booking row. Demo and
/// places-fallback hashes never reach the supplier.
async fn create_booking(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Response, AppError> {
    if req.guests.is_empty() {
        return Err(AppError::missing_field("guests"));
    }
    if let Some(rejection) = cutoff_rejection(req.checkin.as_deref()) {
        return Ok(rejection);
    }

    let partner_order_id = generate_partner_order_id();

    let is_demo = ["demo_", "test_", "google_"]
        .iter()
        .any(|prefix| req.book_hash.starts_with(prefix));

    if is_demo {
        let booking = json!({
            "partner_order_id": &partner_order_id,
            "user_id": req.user_id,
            "hotel_id": req.hotel_id.clone().unwrap_or_default(),
            "hotel_name": req.hotel_name.clone().unwrap_or_default(),
            "check_in": req.checkin,
            "check_out": req.checkout,
            "rooms": req.guests.len(),
            "guests": req.guests,
            "total_amount": req.total_amount.unwrap_or(0.0),
            "currency": req.currency.clone().unwrap_or_else(|| "INR".to_string()),
            // Demo bookings skip the supplier flow entirely
            "status": "confirmed",
            "booking_response": {"demo": true, "message": "Demo booking created successfully"},
        });

        let booking_id = state
            .bookings
            .create_booking(&booking)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        return Ok(Json(json!({
            "success": true,
            "partner_order_id": partner_order_id,
            "booking_id": booking_id,
            "demo": true,
            "message": "Demo booking created successfully",
        }))
        .into_response());
    }

    // The frontend already ran prebook; calling it again here would waste
    // quota and slow the flow. Trust the hash.
    info!("Proceeding to booking form with validated hash: {:.50}...", req.book_hash);

    let user_ip = client_ip(&headers, &addr);
    let supplier_resp = state
        .supplier
        .booking_form(
            &req.book_hash,
            &partner_order_id,
            &Value::Array(req.guests.clone()),
            &user_ip,
            req.special_requests.as_deref(),
        )
        .await;

    if !supplier_resp.success {
        let error_msg = supplier_resp.error.clone().unwrap_or_default();
        error!("Supplier booking failed: {}", error_msg);

        if supplier_resp.status_code == 400 || error_msg.contains("Bad Request") {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Unable to create booking with the hotel. The room may no longer \
                              be available. Please try a different room or hotel.",
                    "error_code": "BOOKING_FAILED",
                    "details": error_msg,
                })),
            )
                .into_response());
        }

        return Ok((StatusCode::BAD_REQUEST, Json(envelope(&supplier_resp))).into_response());
    }

    let booking = json!({
        "partner_order_id": &partner_order_id,
        "user_id": req.user_id,
        "hotel_id": req.hotel_id.clone().unwrap_or_default(),
        "hotel_name": req.hotel_name.clone().unwrap_or_default(),
        "check_in": req.checkin,
        "check_out": req.checkout,
        "rooms": req.guests.len(),
        "guests": req.guests,
        "total_amount": req.total_amount.unwrap_or(0.0),
        "currency": req.currency.clone().unwrap_or_else(|| "INR".to_string()),
        "status": "created",
        "booking_response": supplier_resp.data,
    });

    let booking_id = state
        .bookings
        .create_booking(&booking)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "partner_order_id": partner_order_id,
        "supplier_response": booking["booking_response"],
        "booking_id": booking_id,
    }))
    .into_response())
}

// ============================================================================
// Finish / Status / Poll
// ============================================================================

/// POST /api/hotels/book/finish
/// Start the supplier's asynchronous confirmation, mapping its documented
/// finish responses onto booking statuses.
async fn finish_booking(
    State(state): State<AppState>,
    Json(req): Json<PartnerOrderRequest>,
) -> Result<Response, AppError> {
    let partner_order_id = &req.partner_order_id;

    let mut resp = state.supplier.booking_finish(partner_order_id).await;
    let mut outcome = classify_finish(&resp);

    if outcome == FinishOutcome::ServerError {
        warn!("Supplier 5xx on finish, retrying once...");
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        resp = state.supplier.booking_finish(partner_order_id).await;
        outcome = classify_finish(&resp);

        if !matches!(outcome, FinishOutcome::Accepted) {
            // Retry failed; the booking may still be processing on the
            // supplier side, so proceed to polling
            persist_status(&state, partner_order_id, BookingStatus::Processing, None).await;
            return Ok(Json(json!({
                "success": true,
                "message": "Server error during finalization. Booking may still be processing.",
                "should_poll": true,
            }))
            .into_response());
        }
    }

    if let Some(status) = outcome.booking_status() {
        persist_status(&state, partner_order_id, status, None).await;
    }

    match &outcome {
        FinishOutcome::Accepted => Ok(Json(envelope(&resp)).into_response()),
        FinishOutcome::PollAnyway => Ok(Json(json!({
            "success": true,
            "message": "Booking is being processed. Please wait...",
            "should_poll": true,
        }))
        .into_response()),
        FinishOutcome::SessionExpired
        | FinishOutcome::RateNotFound
        | FinishOutcome::VerificationRequired
        | FinishOutcome::Failed(_) => Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": outcome.user_message(),
                "error_code": outcome.error_code(),
            })),
        )
            .into_response()),
        FinishOutcome::ServerError => unreachable!("handled by retry above"),
    }
}

/// POST /api/hotels/book/status
/// Single status probe; persists the mapped status.
async fn booking_status(
    State(state): State<AppState>,
    Json(req): Json<PartnerOrderRequest>,
) -> Result<Json<Value>, AppError> {
    let resp = state.supplier.finish_status(&req.partner_order_id).await;

    if resp.success {
        let data = resp.inner_data();
        let status_str = data["status"].as_str().unwrap_or("unknown");
        let mapped = if status_str == "ok" {
            BookingStatus::Confirmed
        } else {
            BookingStatus::parse(status_str).unwrap_or(BookingStatus::Pending)
        };
        persist_status(&state, &req.partner_order_id, mapped, Some(data)).await;
    }

    Ok(Json(envelope(&resp)))
}

/// POST /api/hotels/book/poll
/// Poll the supplier until the booking reaches a final state (2.5 s cadence,
/// 180 s budget). Sleeps are async; the long poll holds no worker thread.
async fn poll_booking_status(
    State(state): State<AppState>,
    Json(req): Json<PartnerOrderRequest>,
) -> Result<Response, AppError> {
    let partner_order_id = &req.partner_order_id;
    let schedule = PollSchedule::default();

    let result = poll_booking(state.supplier.as_ref(), partner_order_id, &schedule).await;
    persist_status(
        &state,
        partner_order_id,
        result.booking_status(),
        match &result {
            PollResult::Confirmed { data }
            | PollResult::Failed { data, .. }
            | PollResult::SupplierPending { data }
            | PollResult::Unrecognized { data, .. } => Some(data),
            PollResult::BudgetExhausted => None,
        },
    )
    .await;

    match result {
        PollResult::Confirmed { data } => Ok(Json(json!({
            "success": true,
            "status": "confirmed",
            "data": data,
        }))
        .into_response()),
        PollResult::Failed { code, message, .. } => Ok(Json(json!({
            "success": false,
            "status": "failed",
            "error": message,
            "error_code": code,
        }))
        .into_response()),
        PollResult::SupplierPending { .. } => Ok(Json(json!({
            "success": false,
            "status": "pending",
            "error": "Your booking is still being processed. We will send you a confirmation \
                      email once it is finalized.",
            "error_code": "PENDING",
        }))
        .into_response()),
        PollResult::Unrecognized { status, data } => {
            let confirmed = status == "ok";
            Ok(Json(json!({
                "success": confirmed,
                "status": if confirmed { "confirmed".to_string() } else { status },
                "data": data,
            }))
            .into_response())
        }
        PollResult::BudgetExhausted => Ok((
            // 202: the booking is still processing on the supplier side
            StatusCode::ACCEPTED,
            Json(json!({
                "success": false,
                "error": "Your booking is still being processed by the hotel. We will email \
                          you a confirmation once it is finalized.",
                "status": "pending",
                "error_code": "TIMEOUT_PENDING",
            })),
        )
            .into_response()),
    }
}

// ============================================================================
// Post-booking
// ============================================================================

/// GET /api/hotels/booking/{partner_order_id}
/// Order info with the supplier's sync-lag rules: within 60 s of
/// confirmation (or when the supplier returns blank) the cached row wins.
async fn get_booking(
    State(state): State<AppState>,
    Path(partner_order_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let cached = state
        .bookings
        .get_by_partner_order_id(&partner_order_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let seconds_since_update = cached.as_ref().and_then(|record| {
        record["updated_at"]
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|updated_at| (Utc::now() - updated_at.with_timezone(&Utc)).num_seconds())
    });

    if let Some(elapsed) = seconds_since_update {
        if elapsed < ORDER_INFO_MIN_GAP_SECONDS {
            let remaining = ORDER_INFO_MIN_GAP_SECONDS - elapsed;
            info!(
                "Only {}s since confirmation, returning cached data ({}s remaining)",
                elapsed, remaining
            );
            return Ok(Json(json!({
                "success": true,
                "source": "cache",
                "reason": format!(
                    "Supplier data sync in progress - using cached data ({}s until order info is available)",
                    remaining
                ),
                "data": cached,
                "retry_after_seconds": remaining,
            })));
        }
    }

    let resp = state.supplier.order_info(&partner_order_id).await;

    // A blank order-info response does not mean the booking is gone; the
    // supplier just hasn't synced yet.
    let is_blank = !resp.success
        || resp.data.is_null()
        || resp
            .data
            .get("data")
            .map(|inner| inner.is_null())
            .unwrap_or(false);

    if is_blank {
        info!("Order info returned blank, falling back to cached booking record");
        return Ok(Json(json!({
            "success": true,
            "source": "cache",
            "reason": "Supplier order info not yet available - booking confirmed, using cached data",
            "data": cached,
        })));
    }

    Ok(Json(json!({
        "success": true,
        "source": "supplier",
        "data": resp.data,
    })))
}

/// POST /api/hotels/booking/cancel
async fn cancel_booking(
    State(state): State<AppState>,
    Json(req): Json<PartnerOrderRequest>,
) -> Result<Json<Value>, AppError> {
    let resp = state.supplier.order_cancel(&req.partner_order_id).await;

    if resp.success {
        persist_status(&state, &req.partner_order_id, BookingStatus::Cancelled, None).await;
    }

    Ok(Json(envelope(&resp)))
}

/// POST /api/hotels/booking/resend-email
async fn resend_email(
    State(state): State<AppState>,
    Json(req): Json<ResendEmailRequest>,
) -> Result<Response, AppError> {
    let booking = state
        .bookings
        .get_by_partner_order_id(&req.partner_order_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

    let recipient = req
        .email
        .or_else(|| booking["customer_email"].as_str().map(str::to_string));
    let Some(recipient) = recipient else {
        return Err(AppError::ValidationError(
            "No email address found for this booking".to_string(),
        ));
    };

    let details = BookingEmail {
        booking_id: req.partner_order_id.clone(),
        customer_name: guest_names(&booking["guests"]).unwrap_or_else(|| "Valued Customer".to_string()),
        hotel_name: booking["hotel_name"].as_str().unwrap_or("Hotel").to_string(),
        checkin: booking["check_in"].as_str().map(str::to_string),
        checkout: booking["check_out"].as_str().map(str::to_string),
        amount: booking["total_amount"].as_f64().unwrap_or(0.0),
        currency: booking["currency"].as_str().unwrap_or("INR").to_string(),
    };

    match state.mailer.send_booking_confirmation(&recipient, &details).await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Confirmation email sent successfully",
        }))
        .into_response()),
        Err(err) => {
            error!("Failed to resend confirmation email: {}", err);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to send email. Please check email configuration.",
                })),
            )
                .into_response())
        }
    }
}

/// POST /api/hotels/booking/send-confirmation
/// Called by the frontend once a booking confirms. The booking is already
/// final, so mail failures are reported but never fail the request.
async fn send_confirmation(
    State(state): State<AppState>,
    Json(req): Json<SendConfirmationRequest>,
) -> Result<Json<Value>, AppError> {
    let details = BookingEmail {
        booking_id: req.partner_order_id.clone(),
        customer_name: req.guests.clone().unwrap_or_else(|| "Valued Customer".to_string()),
        hotel_name: req.hotel_name.clone().unwrap_or_else(|| "Hotel".to_string()),
        checkin: req.checkin.clone(),
        checkout: req.checkout.clone(),
        amount: req.total_amount.unwrap_or(0.0),
        currency: "INR".to_string(),
    };

    info!("Sending booking confirmation to {}", req.email);

    // Store the address so resend works later
    let _ = state
        .bookings
        .update_by_partner_order_id(&req.partner_order_id, &json!({"customer_email": &req.email}))
        .await;

    match state.mailer.send_booking_confirmation(&req.email, &details).await {
        Ok(()) => Ok(Json(json!({
            "success": true,
            "message": "Booking confirmed and email sent",
            "email_sent": true,
        }))),
        Err(err) => {
            warn!("Confirmation email failed for {}: {}", req.partner_order_id, err);
            Ok(Json(json!({
                "success": true,
                "message": "Booking confirmed (email failed)",
                "email_sent": false,
            })))
        }
    }
}

/// GET /api/hotels/user/{user_id}/bookings
async fn user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let bookings = state
        .bookings
        .list_for_user(&user_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": bookings,
    })))
}

fn guest_names(guests: &Value) -> Option<String> {
    let names: Vec<String> = guests
        .as_array()?
        .iter()
        .filter_map(|guest| {
            let first = guest["first_name"].as_str()?;
            let last = guest["last_name"].as_str().unwrap_or_default();
            Some(format!("{} {}", first, last).trim().to_string())
        })
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}
